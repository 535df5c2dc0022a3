use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Env var consulted before `RUST_LOG`.
pub const LOG_ENV: &str = "VOLLEY_LOG";

/// Installs the global subscriber. Logs go to stderr so the report on
/// stdout stays machine-readable.
pub fn init_logging(verbose: bool, no_color: bool) {
    let directive = log_directive(
        std::env::var(LOG_ENV).ok().as_deref(),
        std::env::var("RUST_LOG").ok().as_deref(),
        verbose,
    );
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}

fn log_directive(volley_log: Option<&str>, rust_log: Option<&str>, verbose: bool) -> String {
    let non_empty = |value: &&str| !value.trim().is_empty();
    volley_log
        .filter(non_empty)
        .or_else(|| rust_log.filter(non_empty))
        .map_or_else(
            || if verbose { "debug" } else { "info" }.to_owned(),
            str::to_owned,
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, AppResult};

    #[test]
    fn init_logging_is_idempotent() {
        init_logging(false, true);
        init_logging(true, true);
    }

    #[test]
    fn directive_prefers_volley_log() -> AppResult<()> {
        let cases = [
            (Some("warn"), Some("error"), false, "warn"),
            (None, Some("error"), true, "error"),
            (None, None, true, "debug"),
            (None, None, false, "info"),
            (Some(" "), None, false, "info"),
            (Some(""), Some("trace"), false, "trace"),
        ];
        for (volley_log, rust_log, verbose, expected) in cases {
            let directive = log_directive(volley_log, rust_log, verbose);
            if directive != expected {
                return Err(AppError::validation(format!(
                    "Expected '{}', got '{}'",
                    expected, directive
                )));
            }
        }
        Ok(())
    }
}
