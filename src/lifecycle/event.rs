//! Control-plane event model

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use strum_macros::EnumString;

/// Lifecycle event kinds delivered by the control plane
///
/// Unrecognized tags are kept verbatim in [`EventType::Other`] and handled
/// the same way as [`EventType::Invoke`].
#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
pub enum EventType {
    #[strum(serialize = "INVOKE")]
    Invoke,
    #[strum(serialize = "SHUTDOWN")]
    Shutdown,
    #[strum(default)]
    Other(String),
}

impl EventType {
    /// The wire tag for this event type
    pub fn as_str(&self) -> &str {
        match self {
            Self::Invoke => "INVOKE",
            Self::Shutdown => "SHUTDOWN",
            Self::Other(tag) => tag,
        }
    }

    pub fn is_shutdown(&self) -> bool {
        matches!(self, Self::Shutdown)
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EventType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        EventType::from_str(&tag).map_err(serde::de::Error::custom)
    }
}

/// A single event returned by the next-event call
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub event_type: EventType,
    #[serde(default)]
    pub deadline_ms: Option<u64>,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub invoked_function_arn: Option<String>,
    #[serde(default)]
    pub shutdown_reason: Option<String>,
}

impl Event {
    /// Build a bare event of the given type
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            deadline_ms: None,
            request_id: None,
            invoked_function_arn: None,
            shutdown_reason: None,
        }
    }
}

/// Registration request body
#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub events: &'a [EventType],
}

/// Outcome of a successful registration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registration {
    /// Opaque identifier the control plane uses to address this extension
    pub extension_id: String,
    pub function_name: Option<String>,
    pub function_version: Option<String>,
    pub handler: Option<String>,
}

/// Optional body of the registration response
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisterResponse {
    #[serde(default)]
    pub function_name: Option<String>,
    #[serde(default)]
    pub function_version: Option<String>,
    #[serde(default)]
    pub handler: Option<String>,
}
