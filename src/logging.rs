//! Tracing subscriber setup

use crate::config::LogFormat;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber
///
/// `RUST_LOG` overrides the default `info` filter. Output goes to stderr,
/// which the platform forwards to the function's log stream.
pub fn init(format: LogFormat) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder
            .json()
            .with_target(true)
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to install json subscriber: {e}")),
        LogFormat::Text => builder
            .with_target(false)
            .with_ansi(false)
            .compact()
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to install subscriber: {e}")),
    }
}
