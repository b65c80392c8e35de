use std::io;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Cancel `cancel` when the process receives SIGTERM or SIGINT.
///
/// The signal handlers are registered before this returns, so a signal
/// delivered right after the call is already observed. Must be called
/// from within a tokio runtime.
#[cfg(unix)]
pub fn spawn_shutdown_listener(cancel: CancellationToken) -> io::Result<JoinHandle<()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    Ok(tokio::spawn(async move {
        tokio::select! {
            _ = sigterm.recv() => info!("received SIGTERM, initiating shutdown"),
            _ = sigint.recv() => info!("received SIGINT, initiating shutdown"),
            _ = cancel.cancelled() => return,
        }
        cancel.cancel();
    }))
}

/// Cancel `cancel` on Ctrl-C.
#[cfg(not(unix))]
pub fn spawn_shutdown_listener(cancel: CancellationToken) -> io::Result<JoinHandle<()>> {
    Ok(tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    tracing::warn!(error = %e, "cannot listen for Ctrl-C");
                    return;
                }
                info!("received Ctrl-C, initiating shutdown");
            }
            _ = cancel.cancelled() => return,
        }
        cancel.cancel();
    }))
}
