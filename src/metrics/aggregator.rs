use std::collections::BTreeMap;
use std::time::Duration;

use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, warn};

use super::{LatencyHistogram, Outcome, Summary};

/// Maximum failure messages kept for the report.
pub const ERROR_DETAILS_CAP: usize = 10;

/// Running fold over the outcome stream.
///
/// Memory is bounded by the number of distinct status codes plus the fixed
/// error-detail cap; outcomes are never retained.
#[derive(Debug)]
pub struct Aggregator {
    verbose: bool,
    total: u64,
    status_codes: BTreeMap<u16, u64>,
    failures: u64,
    timeouts: u64,
    successes: u64,
    duration_sum_ns: u128,
    min: Option<Duration>,
    max: Duration,
    total_bytes: u64,
    error_details: Vec<String>,
    suppressed_errors: u64,
    histogram: Option<LatencyHistogram>,
}

impl Aggregator {
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        let histogram = LatencyHistogram::new()
            .inspect_err(|err| warn!("Failed to initialize latency histogram: {}", err))
            .ok();

        Self {
            verbose,
            total: 0,
            status_codes: BTreeMap::new(),
            failures: 0,
            timeouts: 0,
            successes: 0,
            duration_sum_ns: 0,
            min: None,
            max: Duration::ZERO,
            total_bytes: 0,
            error_details: Vec::new(),
            suppressed_errors: 0,
            histogram,
        }
    }

    pub fn record(&mut self, outcome: Outcome) {
        self.total = self.total.saturating_add(1);
        let count = self.status_codes.entry(outcome.status).or_insert(0);
        *count = count.saturating_add(1);

        if outcome.is_success() {
            self.successes = self.successes.saturating_add(1);
        }
        if outcome.timed_out {
            self.timeouts = self.timeouts.saturating_add(1);
        }

        self.duration_sum_ns = self
            .duration_sum_ns
            .saturating_add(outcome.elapsed.as_nanos());
        self.min = Some(
            self.min
                .map_or(outcome.elapsed, |current| current.min(outcome.elapsed)),
        );
        self.max = self.max.max(outcome.elapsed);
        self.total_bytes = self.total_bytes.saturating_add(outcome.response_bytes);

        if let Some(histogram) = self.histogram.as_mut() {
            let latency_us = u64::try_from(outcome.elapsed.as_micros()).unwrap_or(u64::MAX);
            if let Err(err) = histogram.record(latency_us) {
                warn!("Disabling latency histogram after error: {}", err);
                self.histogram = None;
            }
        }

        if let Some(error) = outcome.error {
            self.failures = self.failures.saturating_add(1);
            if self.verbose {
                self.push_error_detail(error);
            }
        }
    }

    /// Folds another partial aggregate into this one.
    ///
    /// Counts, sums and extremes combine independently of order. Error
    /// details keep this aggregate's entries first.
    pub fn merge(&mut self, other: Aggregator) {
        self.total = self.total.saturating_add(other.total);
        for (status, count) in other.status_codes {
            let entry = self.status_codes.entry(status).or_insert(0);
            *entry = entry.saturating_add(count);
        }
        self.failures = self.failures.saturating_add(other.failures);
        self.timeouts = self.timeouts.saturating_add(other.timeouts);
        self.successes = self.successes.saturating_add(other.successes);
        self.duration_sum_ns = self.duration_sum_ns.saturating_add(other.duration_sum_ns);
        self.min = match (self.min, other.min) {
            (Some(left), Some(right)) => Some(left.min(right)),
            (left, right) => left.or(right),
        };
        self.max = self.max.max(other.max);
        self.total_bytes = self.total_bytes.saturating_add(other.total_bytes);

        self.histogram = match (self.histogram.take(), other.histogram) {
            (Some(mut left), Some(right)) => match left.merge(&right) {
                Ok(()) => Some(left),
                Err(err) => {
                    warn!("Disabling latency histogram after error: {}", err);
                    None
                }
            },
            (Some(_) | None, None) | (None, Some(_)) => None,
        };

        for detail in other.error_details {
            self.push_error_detail(detail);
        }
        self.suppressed_errors = self
            .suppressed_errors
            .saturating_add(other.suppressed_errors);
    }

    #[must_use]
    pub const fn total_outcomes(&self) -> u64 {
        self.total
    }

    /// Derives averages, percentiles and throughput. `elapsed` is the wall
    /// clock time of the whole run.
    #[must_use]
    pub fn finish(self, elapsed: Duration) -> Summary {
        let avg_duration = if self.total > 0 {
            let avg_ns = self
                .duration_sum_ns
                .checked_div(u128::from(self.total))
                .unwrap_or(0);
            Duration::from_nanos(u64::try_from(avg_ns).unwrap_or(u64::MAX))
        } else {
            Duration::ZERO
        };

        let throughput_x100 = if self.total > 0 {
            let elapsed_us = elapsed.as_micros().max(1);
            let scaled = u128::from(self.total)
                .saturating_mul(100_000_000)
                .checked_div(elapsed_us)
                .unwrap_or(0);
            u64::try_from(scaled).unwrap_or(u64::MAX)
        } else {
            0
        };

        let (p50, p90, p99) = self
            .histogram
            .as_ref()
            .map_or((0, 0, 0), LatencyHistogram::percentiles);

        Summary {
            total_outcomes: self.total,
            elapsed,
            status_codes: self.status_codes,
            total_errors: self.failures,
            timeouts: self.timeouts,
            success_count: self.successes,
            avg_duration,
            min_duration: self.min.unwrap_or(Duration::ZERO),
            max_duration: self.max,
            p50_duration: Duration::from_micros(p50),
            p90_duration: Duration::from_micros(p90),
            p99_duration: Duration::from_micros(p99),
            throughput_x100,
            total_bytes: self.total_bytes,
            error_details: self.error_details,
            suppressed_errors: self.suppressed_errors,
            ..Summary::default()
        }
    }

    fn push_error_detail(&mut self, detail: String) {
        if self.error_details.len() < ERROR_DETAILS_CAP {
            self.error_details.push(detail);
        } else {
            self.suppressed_errors = self.suppressed_errors.saturating_add(1);
        }
    }
}

/// Spawns the single task that owns the fold. It drains `outcomes_rx` until
/// every sender is dropped and hands the aggregate back through the handle.
#[must_use]
pub fn spawn_aggregator(verbose: bool, mut outcomes_rx: mpsc::Receiver<Outcome>) -> JoinHandle<Aggregator> {
    tokio::spawn(async move {
        let mut aggregator = Aggregator::new(verbose);
        while let Some(outcome) = outcomes_rx.recv().await {
            aggregator.record(outcome);
        }
        debug!(
            "Outcome stream closed after {} outcomes",
            aggregator.total_outcomes()
        );
        aggregator
    })
}
