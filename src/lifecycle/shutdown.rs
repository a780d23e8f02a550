//! Signal-driven cancellation
//!
//! Turns OS termination signals into a cancelled [`CancellationToken`].

use tokio::signal;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Watches for SIGINT/SIGTERM and cancels a token when one arrives
///
/// The watcher runs on its own task and shares nothing with the lifecycle
/// driver except the token. Cancelling is idempotent, so a second signal is
/// harmless.
///
/// # Example
///
/// ```rust,ignore
/// use template_lambda_extension::lifecycle::SignalWatcher;
/// use tokio_util::sync::CancellationToken;
///
/// let cancel = CancellationToken::new();
/// let _watcher = SignalWatcher::new(cancel.clone()).spawn();
/// ```
pub struct SignalWatcher {
    cancel: CancellationToken,
}

impl SignalWatcher {
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    /// Spawn the watcher on the current runtime
    ///
    /// The task also ends quietly if the token is cancelled by someone else.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown_signal() => {
                    tracing::info!("cancelling extension lifecycle");
                    self.cancel.cancel();
                }
                _ = self.cancel.cancelled() => {}
            }
        })
    }
}

/// Create a future that completes when a termination signal is received
///
/// If a handler cannot be installed the corresponding branch never
/// completes; the other signal and the platform's own shutdown event still
/// end the process.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }
}
