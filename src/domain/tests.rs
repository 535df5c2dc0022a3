use super::{RequestSpec, RunConfig};
use crate::args::{HttpMethod, TesterArgs};
use crate::error::{AppError, AppResult, ValidationError};
use clap::Parser;
use std::time::Duration;

fn valid_config() -> RunConfig {
    RunConfig::new("http://localhost:8080/api", 10, 2, Duration::from_secs(1))
}

fn expect_validation(config: &RunConfig, label: &'static str) -> AppResult<ValidationError> {
    match config.validate() {
        Err(AppError::Validation(err)) => Ok(err),
        Err(err) => Err(AppError::validation(format!("{}: unexpected error {}", label, err))),
        Ok(()) => Err(AppError::validation(label)),
    }
}

#[test]
fn valid_config_passes() -> AppResult<()> {
    valid_config().validate()
}

#[test]
fn rejects_empty_target() -> AppResult<()> {
    let mut config = valid_config();
    config.url = "   ".to_owned();
    let err = expect_validation(&config, "Expected empty target to be rejected")?;
    if !matches!(err, ValidationError::EmptyTarget) {
        return Err(AppError::validation(format!("Unexpected error: {}", err)));
    }
    Ok(())
}

#[test]
fn rejects_zero_requests_and_concurrency() -> AppResult<()> {
    let mut config = valid_config();
    config.requests = 0;
    let err = expect_validation(&config, "Expected zero requests to be rejected")?;
    if !matches!(err, ValidationError::RequestCountZero) {
        return Err(AppError::validation(format!("Unexpected error: {}", err)));
    }

    let mut config = valid_config();
    config.concurrency = 0;
    let err = expect_validation(&config, "Expected zero concurrency to be rejected")?;
    if !matches!(err, ValidationError::ConcurrencyZero) {
        return Err(AppError::validation(format!("Unexpected error: {}", err)));
    }
    Ok(())
}

#[test]
fn rejects_bad_urls() -> AppResult<()> {
    let mut config = valid_config();
    config.url = "not a url".to_owned();
    let err = expect_validation(&config, "Expected malformed url to be rejected")?;
    if !matches!(err, ValidationError::InvalidUrl { .. }) {
        return Err(AppError::validation(format!("Unexpected error: {}", err)));
    }

    config.url = "ftp://example.com/file".to_owned();
    let err = expect_validation(&config, "Expected ftp url to be rejected")?;
    if !matches!(err, ValidationError::UnsupportedScheme { .. }) {
        return Err(AppError::validation(format!("Unexpected error: {}", err)));
    }
    Ok(())
}

#[test]
fn rejects_invalid_header_name() -> AppResult<()> {
    let mut config = valid_config();
    config.insert_header("Bad Header".to_owned(), "x".to_owned());
    let err = expect_validation(&config, "Expected invalid header name to be rejected")?;
    if !matches!(err, ValidationError::InvalidHeaderName { .. }) {
        return Err(AppError::validation(format!("Unexpected error: {}", err)));
    }
    Ok(())
}

#[test]
fn effective_concurrency_is_clamped_to_requests() -> AppResult<()> {
    let config = RunConfig::new("http://localhost", 3, 50, Duration::from_secs(1));
    if config.effective_concurrency() != 3 {
        return Err(AppError::validation(format!(
            "Unexpected effective concurrency: {}",
            config.effective_concurrency()
        )));
    }
    let config = RunConfig::new("http://localhost", 100, 8, Duration::from_secs(1));
    if config.effective_concurrency() != 8 {
        return Err(AppError::validation("Expected concurrency to stay at 8"));
    }
    Ok(())
}

#[test]
fn from_args_merges_header_sources() -> AppResult<()> {
    let args = TesterArgs::try_parse_from([
        "volley",
        "-u",
        "http://localhost",
        "--headers",
        "api_key:abc123,x-trace:1,broken",
        "-H",
        "X-Trace: 2",
        "-X",
        "put",
        "-d",
        "payload",
    ])?;

    let config = RunConfig::from_args(&args)?;
    if config.headers.len() != 2 {
        return Err(AppError::validation(format!(
            "Unexpected headers: {:?}",
            config.headers
        )));
    }
    if config.headers.get("X-Trace").map(String::as_str) != Some("2") {
        return Err(AppError::validation("Expected -H to replace --headers entry"));
    }
    if config.headers.get("api_key").map(String::as_str) != Some("abc123") {
        return Err(AppError::validation("Expected api_key header"));
    }
    if config.method != HttpMethod::Put || config.body.as_deref() != Some("payload") {
        return Err(AppError::validation("Unexpected method/body"));
    }
    Ok(())
}

#[test]
fn from_args_requires_url() -> AppResult<()> {
    let args = TesterArgs::try_parse_from(["volley", "-n", "5"])?;
    match RunConfig::from_args(&args) {
        Err(AppError::Validation(ValidationError::MissingUrl)) => Ok(()),
        Err(err) => Err(AppError::validation(format!("Unexpected error: {}", err))),
        Ok(_) => Err(AppError::validation("Expected missing url error")),
    }
}

#[test]
fn request_spec_copies_config() -> AppResult<()> {
    let mut config = valid_config();
    config.insert_header("Accept".to_owned(), "text/plain".to_owned());
    config.body = Some("hello".to_owned());

    let spec = RequestSpec::from_config(&config);
    if spec.url != config.url
        || spec.headers != config.headers
        || spec.body != config.body
        || spec.timeout != config.timeout
        || spec.method != config.method
    {
        return Err(AppError::validation(format!("Unexpected spec: {:?}", spec)));
    }
    Ok(())
}
