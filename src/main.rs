use std::process::ExitCode;
use template_lambda_extension::config::Settings;
use template_lambda_extension::lifecycle::SignalWatcher;
use template_lambda_extension::{BuildInfo, logging};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> ExitCode {
    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("error loading extension settings: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(settings.log_format) {
        eprintln!("{e:#}");
        return ExitCode::FAILURE;
    }

    let build = BuildInfo::current();
    tracing::info!(
        name = %settings.extension_name,
        version = build.version,
        commit = build.commit,
        "starting extension"
    );

    let cancel = CancellationToken::new();
    let _watcher = SignalWatcher::new(cancel.clone()).spawn();

    let result = template_lambda_extension::run(settings, cancel).await;
    template_lambda_extension::exit_code(&result)
}
