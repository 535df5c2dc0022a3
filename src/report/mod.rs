//! Rendering of a finished run for stdout.
mod json;
mod text;


use std::time::Duration;

use crate::{args::OutputFormat, error::AppResult, metrics::Summary};

pub use json::render_json;
pub use text::{render_run_header, render_text};

/// Renders `summary` in the requested output format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render(summary: &Summary, format: OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Text => Ok(render_text(summary)),
        OutputFormat::Json => render_json(summary),
    }
}

/// Formats a value scaled by 100 with two decimals.
pub(crate) fn format_x100(value: u64) -> String {
    format!("{}.{:02}", value / 100, value % 100)
}

pub(crate) fn micros(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}
