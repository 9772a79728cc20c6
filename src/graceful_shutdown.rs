use std::time::Duration;

use tokio::signal;
use tracing::{error, info, warn};

use crate::use_cases::trends::TrendCache;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    CtrlC,
    Terminate,
}

/// Resolves on the first Ctrl+C or SIGTERM. A listener that cannot be
/// installed is logged and never fires.
pub async fn shutdown_signal() -> ShutdownReason {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("🛑 Ctrl+C received, initiating shutdown...");
            ShutdownReason::CtrlC
        },
        _ = terminate => {
            warn!("🛑 SIGTERM received, initiating shutdown...");
            ShutdownReason::Terminate
        }
    }
}

/// Runs after the HTTP server has stopped accepting requests.
pub async fn drain_background_work(trend_cache: &TrendCache, grace: Duration) {
    trend_cache.shutdown(grace).await;
    info!("Background work drained");
}
