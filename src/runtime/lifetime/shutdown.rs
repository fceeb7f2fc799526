use tokio::signal;
use tracing::{info, warn};

/// 等待 Ctrl+C 信号
///
/// If the signal handler cannot be installed this never returns, leaving the
/// process to be stopped externally.
pub async fn listen_for_shutdown() {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received");
        }
        Err(e) => {
            warn!("Failed to listen for Ctrl+C: {}. Graceful shutdown disabled.", e);
            std::future::pending::<()>().await;
        }
    }
}
