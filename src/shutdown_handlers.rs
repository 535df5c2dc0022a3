use tracing::{debug, warn};

use crate::shutdown::{ShutdownSender, request_shutdown, wait_for_shutdown};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Waits for SIGINT (or SIGTERM on unix) and raises the shutdown flag.
///
/// The task also exits once anything else raises the flag, so the caller
/// can stop it after a run that finished on its own.
pub fn setup_signal_shutdown_handler(shutdown_tx: &ShutdownSender) -> tokio::task::JoinHandle<()> {
    let shutdown_tx = shutdown_tx.clone();
    let mut shutdown_rx = shutdown_tx.subscribe();
    tokio::spawn(async move {
        #[cfg(unix)]
        let mut term_signal = match signal(SignalKind::terminate()) {
            Ok(signal) => Some(signal),
            Err(err) => {
                warn!("Failed to register SIGTERM handler: {}", err);
                None
            }
        };

        #[cfg(unix)]
        {
            tokio::select! {
                () = wait_for_shutdown(&mut shutdown_rx) => {
                    debug!("Signal handler released");
                }
                _ = tokio::signal::ctrl_c() => {
                    warn!("Received interruption signal, cancelling test...");
                    request_shutdown(&shutdown_tx);
                }
                () = async {
                    if let Some(signal) = term_signal.as_mut() {
                        signal.recv().await;
                    } else {
                        std::future::pending::<()>().await;
                    }
                } => {
                    warn!("Received termination signal, cancelling test...");
                    request_shutdown(&shutdown_tx);
                }
            }
        }

        #[cfg(not(unix))]
        {
            tokio::select! {
                () = wait_for_shutdown(&mut shutdown_rx) => {
                    debug!("Signal handler released");
                }
                _ = tokio::signal::ctrl_c() => {
                    warn!("Received interruption signal, cancelling test...");
                    request_shutdown(&shutdown_tx);
                }
            }
        }
    })
}
