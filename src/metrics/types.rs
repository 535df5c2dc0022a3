use std::collections::BTreeMap;
use std::time::Duration;

/// Result of one request attempt. A status of 0 means no response arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub status: u16,
    pub elapsed: Duration,
    pub error: Option<String>,
    pub timed_out: bool,
    pub response_bytes: u64,
}

impl Outcome {
    /// A response was received and fully read.
    #[must_use]
    pub const fn response(status: u16, elapsed: Duration, response_bytes: u64) -> Self {
        Self {
            status,
            elapsed,
            error: None,
            timed_out: false,
            response_bytes,
        }
    }

    /// No response was obtained.
    #[must_use]
    pub fn failed(elapsed: Duration, error: impl Into<String>) -> Self {
        Self {
            status: 0,
            elapsed,
            error: Some(error.into()),
            timed_out: false,
            response_bytes: 0,
        }
    }

    #[must_use]
    pub fn timed_out(timeout: Duration) -> Self {
        Self {
            status: 0,
            elapsed: timeout,
            error: Some(format!("request timed out after {:?}", timeout)),
            timed_out: true,
            response_bytes: 0,
        }
    }

    #[must_use]
    pub const fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error.is_none() && self.status >= 200 && self.status < 300
    }
}

/// Aggregate statistics for a completed or cancelled run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Summary {
    /// Configured request count.
    pub requested: u64,
    /// Tokens the dispatcher queued before it finished or was cancelled.
    /// The queue holds the whole run, so a cancelled run can have queued
    /// tokens that no worker took; `total_outcomes` counts completed calls.
    pub dispatched: u64,
    /// Workers spawned for the run.
    pub workers: usize,
    pub total_outcomes: u64,
    pub elapsed: Duration,
    pub status_codes: BTreeMap<u16, u64>,
    pub total_errors: u64,
    pub timeouts: u64,
    /// Outcomes with a 2xx status.
    pub success_count: u64,
    pub avg_duration: Duration,
    pub min_duration: Duration,
    pub max_duration: Duration,
    pub p50_duration: Duration,
    pub p90_duration: Duration,
    pub p99_duration: Duration,
    /// Outcomes per second of wall-clock time, scaled by 100.
    pub throughput_x100: u64,
    pub total_bytes: u64,
    /// First failure messages in arrival order, capped; empty unless verbose.
    pub error_details: Vec<String>,
    /// Failures that were not kept in `error_details`.
    pub suppressed_errors: u64,
    pub cancelled: bool,
}

impl Summary {
    /// Success rate (2xx) in hundredths of a percent; 0 when nothing completed.
    #[must_use]
    pub fn success_rate_x100(&self) -> u64 {
        ratio_x100(self.success_count, self.total_outcomes)
    }

    /// Share of all outcomes that carried `status`, in hundredths of a percent.
    #[must_use]
    pub fn status_share_x100(&self, status: u16) -> u64 {
        let count = self.status_codes.get(&status).copied().unwrap_or(0);
        ratio_x100(count, self.total_outcomes)
    }
}

fn ratio_x100(part: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    let scaled = u128::from(part)
        .saturating_mul(10_000)
        .checked_div(u128::from(total))
        .unwrap_or(0);
    u64::try_from(scaled).unwrap_or(u64::MAX)
}
