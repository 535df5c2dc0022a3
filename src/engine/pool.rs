use std::sync::Arc;

use tokio::{
    sync::{Mutex, mpsc},
    task::JoinHandle,
};
use tracing::{debug, trace};

use crate::{
    domain::{RequestSpec, RunConfig},
    http::Transport,
    metrics::Outcome,
    shutdown::{ShutdownReceiver, ShutdownSender, wait_for_shutdown},
};

use super::dispatcher::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct WorkerReport {
    pub(super) completed: u64,
    pub(super) cancelled: bool,
}

impl WorkerReport {
    const fn cancelled(completed: u64) -> Self {
        Self {
            completed,
            cancelled: true,
        }
    }
}

/// Shared handles every worker needs.
pub(super) struct PoolContext<'ctx> {
    pub(super) config: &'ctx Arc<RunConfig>,
    pub(super) transport: &'ctx Arc<dyn Transport>,
    pub(super) outcomes_tx: &'ctx mpsc::Sender<Outcome>,
    pub(super) shutdown_tx: &'ctx ShutdownSender,
}

/// Spawns `count` workers pulling from one shared token queue.
///
/// Each worker holds a clone of the outcome sender; the stream closes once
/// the last worker exits and the caller drops its own sender.
pub(super) fn spawn_workers(
    count: usize,
    tokens_rx: mpsc::Receiver<Token>,
    context: &PoolContext<'_>,
) -> Vec<JoinHandle<WorkerReport>> {
    let tokens = Arc::new(Mutex::new(tokens_rx));
    let mut handles = Vec::with_capacity(count);

    for worker_id in 0..count {
        let tokens = Arc::clone(&tokens);
        let config = Arc::clone(context.config);
        let transport = Arc::clone(context.transport);
        let outcomes_tx = context.outcomes_tx.clone();
        let shutdown_rx = context.shutdown_tx.subscribe();

        handles.push(tokio::spawn(async move {
            let report = run_worker(&tokens, &config, transport.as_ref(), &outcomes_tx, shutdown_rx).await;
            debug!(
                "Worker {} finished after {} requests (cancelled: {})",
                worker_id, report.completed, report.cancelled
            );
            report
        }));
    }

    handles
}

async fn run_worker(
    tokens: &Mutex<mpsc::Receiver<Token>>,
    config: &RunConfig,
    transport: &dyn Transport,
    outcomes_tx: &mpsc::Sender<Outcome>,
    mut shutdown_rx: ShutdownReceiver,
) -> WorkerReport {
    let mut completed: u64 = 0;

    loop {
        let next = tokio::select! {
            biased;
            () = wait_for_shutdown(&mut shutdown_rx) => return WorkerReport::cancelled(completed),
            token = next_token(tokens) => token,
        };
        let Some(token) = next else {
            break;
        };
        trace!("Token {} taken", token.sequence());

        let spec = RequestSpec::from_config(config);
        let outcome = tokio::select! {
            biased;
            () = wait_for_shutdown(&mut shutdown_rx) => return WorkerReport::cancelled(completed),
            outcome = perform_with_timeout(transport, &spec) => outcome,
        };

        // A finished call is handed off even if shutdown is already raised;
        // the next token fetch observes the flag.
        let sent = tokio::select! {
            biased;
            result = outcomes_tx.send(outcome) => result,
            () = wait_for_shutdown(&mut shutdown_rx) => return WorkerReport::cancelled(completed),
        };
        if sent.is_err() {
            debug!("Outcome stream closed; worker stopping");
            break;
        }
        completed = completed.saturating_add(1);
    }

    WorkerReport {
        completed,
        cancelled: false,
    }
}

async fn next_token(tokens: &Mutex<mpsc::Receiver<Token>>) -> Option<Token> {
    tokens.lock().await.recv().await
}

/// Bounds a transport call by the request timeout, whatever the transport
/// does internally.
async fn perform_with_timeout(transport: &dyn Transport, spec: &RequestSpec) -> Outcome {
    tokio::time::timeout(spec.timeout, transport.perform(spec))
        .await
        .unwrap_or_else(|_elapsed| Outcome::timed_out(spec.timeout))
}
