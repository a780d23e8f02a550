//! # template-lambda-extension
//!
//! A serverless extension that renders configuration templates once at
//! cold start and then follows the platform's extension lifecycle until the
//! execution environment shuts down.
//!
//! ## Flow
//!
//! 1. Register with the control plane at `AWS_LAMBDA_RUNTIME_API`
//! 2. Render the templates configured through `GOMPLATE_*` variables
//! 3. Long-poll for events until `SHUTDOWN`, SIGTERM or SIGINT
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use template_lambda_extension::config::Settings;
//! use template_lambda_extension::lifecycle::SignalWatcher;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() {
//!     let settings = Settings::from_env().unwrap();
//!     let cancel = CancellationToken::new();
//!     SignalWatcher::new(cancel.clone()).spawn();
//!
//!     template_lambda_extension::run(settings, cancel).await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod render;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{Settings, TemplateConfig};
pub use error::{ExtensionError, Result};
pub use lifecycle::{Extension, LifecycleError, Termination};

use chrono::SecondsFormat;
use lifecycle::Client;
use render::TemplateInit;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

/// Version details stamped at build time
#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: &'static str,
    pub commit: &'static str,
    pub date: String,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            commit: option_env!("GIT_COMMIT").unwrap_or("development"),
            date: option_env!("BUILD_DATE")
                .map(str::to_owned)
                .unwrap_or_else(|| chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
        }
    }
}

/// Register, initialize and poll until the extension terminates
pub async fn run(settings: Settings, cancel: CancellationToken) -> lifecycle::Result<Termination> {
    let client = Client::new(&settings.runtime_api)?;

    Extension::builder(client)
        .name(settings.extension_name)
        .init_hook(TemplateInit::new(settings.environment))
        .cancellation(cancel)
        .build()
        .run()
        .await
}

/// Log how the extension ended and map it to the process exit status
///
/// Shutdown and cancellation are clean exits; any error is a failure.
pub fn exit_code(result: &lifecycle::Result<Termination>) -> ExitCode {
    match result {
        Ok(termination) => {
            tracing::info!(?termination, "extension stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(phase = e.phase(), error = %e, "extension failed");
            ExitCode::FAILURE
        }
    }
}
