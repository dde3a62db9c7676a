use tokio::signal;
use tracing::{error, warn};

/// Wait for a shutdown signal (Ctrl+C or SIGTERM).
///
/// If a handler cannot be installed the failure is logged and that signal is
/// simply never observed; the other one still triggers shutdown.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
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
                error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => warn!("Received Ctrl+C, shutting down"),
        () = terminate => warn!("Received SIGTERM, shutting down"),
    }
}
