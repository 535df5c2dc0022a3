use http::StatusCode;

use crate::{domain::RunConfig, metrics::Summary};

use super::format_x100;

const RULE: &str = "===============================================";

/// Lines printed before the run starts.
#[must_use]
pub fn render_run_header(config: &RunConfig) -> String {
    [
        format!("Starting load test against {}", config.url.trim()),
        format!("• Method:       {}", config.method.as_str()),
        format!("• Requests:     {}", config.requests),
        format!("• Concurrency:  {}", config.effective_concurrency()),
        format!("• Timeout:      {:?}", config.timeout),
    ]
    .join("\n")
}

#[must_use]
pub fn render_text(summary: &Summary) -> String {
    let mut lines: Vec<String> = vec![
        String::new(),
        RULE.to_owned(),
        "           LOAD TEST REPORT".to_owned(),
        RULE.to_owned(),
        String::new(),
        "GENERAL STATISTICS:".to_owned(),
        format!("• Total requests:       {}", summary.total_outcomes),
        format!("• Total time:           {:?}", summary.elapsed),
        format!(
            "• Requests per second:  {}",
            format_x100(summary.throughput_x100)
        ),
        format!("• Total errors:         {}", summary.total_errors),
        format!("• Timeouts:             {}", summary.timeouts),
        format!("• Bytes received:       {}", summary.total_bytes),
        String::new(),
        "RESPONSE TIME STATISTICS:".to_owned(),
        format!("• Average time:         {:?}", summary.avg_duration),
        format!("• Minimum time:         {:?}", summary.min_duration),
        format!("• Maximum time:         {:?}", summary.max_duration),
        format!(
            "• P50/P90/P99:          {:?} / {:?} / {:?}",
            summary.p50_duration, summary.p90_duration, summary.p99_duration
        ),
        String::new(),
        "HTTP STATUS CODE DISTRIBUTION:".to_owned(),
    ];

    if summary.status_codes.is_empty() {
        lines.push("• none".to_owned());
    }
    for (status, count) in &summary.status_codes {
        lines.push(format!(
            "• {}: {} requests ({}%)",
            status_label(*status),
            count,
            format_x100(summary.status_share_x100(*status))
        ));
    }

    lines.push(String::new());
    if summary.total_outcomes == 0 {
        lines.push("SUCCESS RATE: No requests completed".to_owned());
    } else {
        lines.push(format!(
            "SUCCESS RATE: {}% ({} out of {} requests)",
            format_x100(summary.success_rate_x100()),
            summary.success_count,
            summary.total_outcomes
        ));
    }

    if !summary.error_details.is_empty() {
        lines.push(String::new());
        lines.push("ERROR DETAILS:".to_owned());
        for detail in &summary.error_details {
            lines.push(format!("• {}", detail));
        }
        if summary.suppressed_errors > 0 {
            lines.push(format!("... and {} more errors", summary.suppressed_errors));
        }
    }

    if summary.cancelled {
        lines.push(String::new());
        lines.push(format!(
            "Run cancelled: {} of {} requests completed",
            summary.total_outcomes, summary.requested
        ));
    }

    lines.push(String::new());
    lines.push(RULE.to_owned());
    lines.join("\n")
}

fn status_label(status: u16) -> String {
    if status == 0 {
        return "No response".to_owned();
    }
    let reason = StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or("Unknown");
    format!("HTTP {} ({})", status, reason)
}

