use tokio::{sync::mpsc, task::JoinHandle};
use tracing::debug;

use crate::shutdown::{ShutdownReceiver, wait_for_shutdown};

/// One unit of permission to perform a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Token(u64);

impl Token {
    pub(super) const fn sequence(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct DispatchReport {
    pub(super) dispatched: u64,
    pub(super) cancelled: bool,
}

/// Emits `requests` tokens, then drops the sender so workers see the
/// source as exhausted. Stops early when shutdown fires or every worker is
/// gone.
pub(super) fn spawn_dispatcher(
    requests: u64,
    tokens_tx: mpsc::Sender<Token>,
    mut shutdown_rx: ShutdownReceiver,
) -> JoinHandle<DispatchReport> {
    tokio::spawn(async move {
        let mut dispatched: u64 = 0;
        while dispatched < requests {
            let send_result = tokio::select! {
                biased;
                () = wait_for_shutdown(&mut shutdown_rx) => {
                    debug!("Dispatcher cancelled after {} of {} tokens", dispatched, requests);
                    return DispatchReport {
                        dispatched,
                        cancelled: true,
                    };
                }
                result = tokens_tx.send(Token(dispatched)) => result,
            };
            if send_result.is_err() {
                debug!("All workers exited; dispatcher stopping early");
                break;
            }
            dispatched = dispatched.saturating_add(1);
        }

        debug!("Dispatcher emitted {} tokens", dispatched);
        DispatchReport {
            dispatched,
            cancelled: false,
        }
    })
}
