use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{Semaphore, mpsc};
use tracing::{info, warn};

use crate::{
    domain::RunConfig,
    error::AppResult,
    http::Transport,
    metrics::{Summary, spawn_aggregator},
    shutdown::ShutdownSender,
};

use super::dispatcher::spawn_dispatcher;
use super::pool::{PoolContext, spawn_workers};

/// Runs load tests against an injected [`Transport`].
#[derive(Clone)]
pub struct Engine {
    transport: Arc<dyn Transport>,
}

impl Engine {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Validates `config`, runs the dispatcher, the worker pool and the
    /// aggregator to completion and returns the summary.
    ///
    /// Raising the flag behind `shutdown_tx`, before or during the run,
    /// cancels it; the summary then covers the calls that completed and has
    /// `cancelled` set.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any task is spawned when `config`
    /// is invalid, or a join error if an engine task panicked.
    pub async fn run(&self, config: RunConfig, shutdown_tx: &ShutdownSender) -> AppResult<Summary> {
        config.validate()?;

        let requests = config.requests;
        let workers = config.effective_concurrency();
        let capacity = channel_capacity(requests);
        let config = Arc::new(config);

        let (tokens_tx, tokens_rx) = mpsc::channel(capacity);
        let (outcomes_tx, outcomes_rx) = mpsc::channel(capacity);

        info!(
            "Starting {} {} requests against {} with {} workers",
            requests,
            config.method.as_str(),
            config.url,
            workers
        );
        let started = Instant::now();

        let aggregator = spawn_aggregator(config.verbose, outcomes_rx);
        let dispatcher = spawn_dispatcher(requests, tokens_tx, shutdown_tx.subscribe());
        let pool = spawn_workers(
            workers,
            tokens_rx,
            &PoolContext {
                config: &config,
                transport: &self.transport,
                outcomes_tx: &outcomes_tx,
                shutdown_tx,
            },
        );
        drop(outcomes_tx);

        let mut workers_cancelled = false;
        for handle in pool {
            let report = handle.await?;
            workers_cancelled |= report.cancelled;
        }
        let dispatch = dispatcher.await?;
        let aggregate = aggregator.await?;

        let mut summary = aggregate.finish(started.elapsed());
        summary.requested = requests;
        summary.dispatched = dispatch.dispatched;
        summary.workers = workers;
        summary.cancelled = workers_cancelled || dispatch.cancelled;

        if summary.cancelled {
            warn!(
                "Run cancelled: {} of {} requests completed",
                summary.total_outcomes, requests
            );
        } else {
            info!(
                "Completed {} requests in {:?}",
                summary.total_outcomes, summary.elapsed
            );
        }
        Ok(summary)
    }
}

/// Runs one load test with `transport`.
///
/// # Errors
///
/// See [`Engine::run`].
pub async fn run_load_test(
    config: RunConfig,
    transport: Arc<dyn Transport>,
    shutdown_tx: &ShutdownSender,
) -> AppResult<Summary> {
    Engine::new(transport).run(config, shutdown_tx).await
}

fn channel_capacity(requests: u64) -> usize {
    usize::try_from(requests)
        .unwrap_or(usize::MAX)
        .clamp(1, Semaphore::MAX_PERMITS)
}
