//! OS signal handling.
//!
//! Translates SIGINT/SIGTERM into a trigger on the shutdown coordinator.
//! Repeated signals are not special-cased: shutdown is monotonic.

use tokio::signal;

use crate::lifecycle::shutdown::Shutdown;

/// Resolve when a termination signal (Ctrl+C or SIGTERM) is received.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Spawn a background task that triggers the coordinator on the first
/// termination signal.
pub fn listen(shutdown: &Shutdown) {
    let token = shutdown.token();
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("termination signal received");
        token.cancel();
    });
}
