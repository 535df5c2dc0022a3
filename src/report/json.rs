use serde_json::{Map, Number, Value, json};

use crate::{error::AppResult, metrics::Summary};

use super::{format_x100, micros};

/// Machine-readable report. Durations are integer microseconds; rates keep
/// two decimals.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json(summary: &Summary) -> AppResult<String> {
    let status_codes: Map<String, Value> = summary
        .status_codes
        .iter()
        .map(|(status, count)| (status.to_string(), json!(count)))
        .collect();

    let value = json!({
        "requested": summary.requested,
        "dispatched": summary.dispatched,
        "workers": summary.workers,
        "total_requests": summary.total_outcomes,
        "total_time_us": micros(summary.elapsed),
        "requests_per_second": format_x100(summary.throughput_x100).parse::<Number>()?,
        "total_errors": summary.total_errors,
        "timeouts": summary.timeouts,
        "success_count": summary.success_count,
        "success_rate_percent": format_x100(summary.success_rate_x100()).parse::<Number>()?,
        "bytes_received": summary.total_bytes,
        "latency_us": {
            "avg": micros(summary.avg_duration),
            "min": micros(summary.min_duration),
            "max": micros(summary.max_duration),
            "p50": micros(summary.p50_duration),
            "p90": micros(summary.p90_duration),
            "p99": micros(summary.p99_duration),
        },
        "status_codes": status_codes,
        "error_details": summary.error_details,
        "suppressed_errors": summary.suppressed_errors,
        "cancelled": summary.cancelled,
    });

    Ok(serde_json::to_string_pretty(&value)?)
}
