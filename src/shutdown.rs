//! Cancellation flag shared by the engine tasks and the signal handler.
//!
//! The flag is level-triggered: once raised it stays raised, so a task that
//! starts waiting after the signal still observes it.
use tokio::sync::watch;

pub type ShutdownSender = watch::Sender<bool>;
pub type ShutdownReceiver = watch::Receiver<bool>;

#[must_use]
pub fn shutdown_channel() -> (ShutdownSender, ShutdownReceiver) {
    watch::channel(false)
}

/// Raises the flag. Stays set even when no receiver exists yet.
pub fn request_shutdown(shutdown_tx: &ShutdownSender) {
    shutdown_tx.send_replace(true);
}

#[must_use]
pub fn is_shutdown_requested(shutdown_rx: &ShutdownReceiver) -> bool {
    *shutdown_rx.borrow()
}

/// Resolves once the flag is raised, immediately if it already is. Never
/// resolves when the sender is gone without raising it.
pub async fn wait_for_shutdown(shutdown_rx: &mut ShutdownReceiver) {
    let closed = shutdown_rx.wait_for(|raised| *raised).await.is_err();
    if closed {
        std::future::pending::<()>().await;
    }
}
