mod templates;

pub use templates::{DataSource, TemplateConfig};

use crate::error::{ExtensionError, Result};
use std::env;
use std::ffi::OsString;
use std::str::FromStr;
use strum_macros::{Display, EnumString};

/// Variable the platform uses to hand out the control-plane address
pub const RUNTIME_API_VAR: &str = "AWS_LAMBDA_RUNTIME_API";
pub const EXTENSION_NAME_VAR: &str = "EXTENSION_NAME";
pub const LOG_FORMAT_VAR: &str = "LOG_FORMAT";

/// Variables with this prefix configure templates and must be valid UTF-8
const TEMPLATE_VAR_PREFIX: &str = "GOMPLATE_";

/// Registered name when `EXTENSION_NAME` is not set; must match the file
/// name the extension is installed under
pub const DEFAULT_EXTENSION_NAME: &str = "template-lambda-extension";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Process settings, read from the environment once at startup
#[derive(Debug, Clone)]
pub struct Settings {
    pub runtime_api: String,
    pub extension_name: String,
    pub log_format: LogFormat,
    /// Snapshot of the environment used to resolve templates
    pub environment: Vec<(String, String)>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(collect_env(env::vars_os())?)
    }

    pub fn from_vars(environment: Vec<(String, String)>) -> Result<Self> {
        let lookup = |name: &str| {
            environment
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.trim())
                .filter(|value| !value.is_empty())
        };

        let runtime_api = lookup(RUNTIME_API_VAR)
            .ok_or_else(|| ExtensionError::MissingEnv {
                name: RUNTIME_API_VAR.to_string(),
            })?
            .to_string();

        let extension_name = lookup(EXTENSION_NAME_VAR)
            .unwrap_or(DEFAULT_EXTENSION_NAME)
            .to_string();

        let log_format = match lookup(LOG_FORMAT_VAR) {
            Some(value) => LogFormat::from_str(value).map_err(|_| ExtensionError::InvalidEnv {
                name: LOG_FORMAT_VAR.to_string(),
                value: value.to_string(),
            })?,
            None => LogFormat::default(),
        };

        Ok(Self {
            runtime_api,
            extension_name,
            log_format,
            environment,
        })
    }
}

/// Keep the UTF-8 variables of the environment
///
/// Other variables are skipped with a warning, except template variables,
/// which must not silently disappear.
fn collect_env<I>(vars: I) -> Result<Vec<(String, String)>>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let mut environment = Vec::new();
    for (key, value) in vars {
        match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => environment.push((key, value)),
            (key, value) => {
                let key = key.unwrap_or_else(|k| k.to_string_lossy().into_owned());
                let value = value.unwrap_or_else(|v| v.to_string_lossy().into_owned());
                if key.starts_with(TEMPLATE_VAR_PREFIX) {
                    return Err(ExtensionError::InvalidEnv { name: key, value });
                }
                tracing::warn!(name = %key, "skipping non UTF-8 environment variable");
            }
        }
    }
    Ok(environment)
}
