//! HTTP client for the extensions control plane

use super::event::{RegisterRequest, RegisterResponse};
use super::{ControlPlane, Event, EventType, LifecycleError, Registration, Result};
use async_trait::async_trait;
use std::sync::OnceLock;
use tokio_util::sync::CancellationToken;

/// Header carrying the extension name on registration
pub const EXTENSION_NAME_HEADER: &str = "Lambda-Extension-Name";

/// Header carrying the identifier assigned by the control plane
pub const EXTENSION_ID_HEADER: &str = "Lambda-Extension-Identifier";

const API_VERSION: &str = "2020-01-01";

const SUBSCRIBED_EVENTS: &[EventType] = &[EventType::Invoke, EventType::Shutdown];

/// Control-plane client
///
/// Holds one reusable HTTP transport for the life of the process. The
/// identifier returned by registration is stored once and attached to every
/// later request.
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    extension_id: OnceLock<String>,
}

impl Client {
    /// Create a client for the control plane listening at `runtime_api`
    /// (`host:port`, as handed to the process by the platform)
    pub fn new(runtime_api: &str) -> Result<Self> {
        // No request timeout: next-event is a long poll bounded by the platform.
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| LifecycleError::setup(format!("building http client: {e}")))?;

        Ok(Self {
            http,
            base_url: format!("http://{runtime_api}/{API_VERSION}/extension"),
            extension_id: OnceLock::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The identifier captured at registration, if registration happened
    pub fn extension_id(&self) -> Option<&str> {
        self.extension_id.get().map(String::as_str)
    }
}

#[async_trait]
impl ControlPlane for Client {
    async fn register(&self, cancel: &CancellationToken, name: &str) -> Result<Registration> {
        let url = format!("{}/register", self.base_url);
        tracing::debug!(%url, name, "registering extension");

        let request = self
            .http
            .post(&url)
            .header(EXTENSION_NAME_HEADER, name)
            .json(&RegisterRequest {
                events: SUBSCRIBED_EVENTS,
            });

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(LifecycleError::Cancelled),
            response = request.send() => response
                .map_err(|e| LifecycleError::registration(e.to_string()))?,
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LifecycleError::registration(format!(
                "control plane returned {status}: {body}"
            )));
        }

        let extension_id = response
            .headers()
            .get(EXTENSION_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| {
                LifecycleError::registration(format!("response is missing {EXTENSION_ID_HEADER}"))
            })?;

        // The body only describes the function; an empty or odd body is not fatal.
        let details: RegisterResponse = match response.bytes().await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read registration response body");
                RegisterResponse::default()
            }
        };

        self.extension_id
            .set(extension_id.clone())
            .map_err(|_| LifecycleError::registration("extension is already registered"))?;

        Ok(Registration {
            extension_id,
            function_name: details.function_name,
            function_version: details.function_version,
            handler: details.handler,
        })
    }

    async fn next_event(&self, cancel: &CancellationToken) -> Result<Event> {
        let extension_id = self
            .extension_id
            .get()
            .ok_or_else(|| LifecycleError::poll("extension is not registered"))?;
        let url = format!("{}/event/next", self.base_url);

        let request = self
            .http
            .get(&url)
            .header(EXTENSION_ID_HEADER, extension_id.as_str());

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(LifecycleError::Cancelled),
            response = request.send() => response
                .map_err(|e| LifecycleError::poll(e.to_string()))?,
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LifecycleError::poll(format!(
                "control plane returned {status}: {body}"
            )));
        }

        let body = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(LifecycleError::Cancelled),
            body = response.bytes() => body
                .map_err(|e| LifecycleError::poll(e.to_string()))?,
        };

        serde_json::from_slice(&body)
            .map_err(|e| LifecycleError::poll(format!("malformed event: {e}")))
    }
}
