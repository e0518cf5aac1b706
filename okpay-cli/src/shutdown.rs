//! Signal handling for aborting a running command.

use tokio::sync::watch;

/// Creates a future that completes when a shutdown signal is received.
///
/// Listens for SIGTERM and SIGINT (Ctrl+C) on unix, Ctrl+C elsewhere.
#[cfg(unix)]
pub async fn shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::select! {
        _ = sigterm.recv() => {
            tracing::info!("Received SIGTERM, aborting");
        }
        _ = sigint.recv() => {
            tracing::info!("Received SIGINT, aborting");
        }
    }
    Ok(())
}

#[cfg(not(unix))]
pub async fn shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await?;
    tracing::info!("Received Ctrl+C, aborting");
    Ok(())
}

/// Spawns a task that flips the returned receiver to `true` on shutdown.
///
/// If the handlers cannot be installed the receiver simply never flips.
pub fn spawn_shutdown_watch() -> watch::Receiver<bool> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        match shutdown_signal().await {
            Ok(()) => {
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                tracing::error!("Failed to install signal handlers: {}", e);
                shutdown_tx.closed().await;
            }
        }
    });

    shutdown_rx
}
