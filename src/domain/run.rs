use std::collections::BTreeMap;
use std::time::Duration;

use http::header::{HeaderName, HeaderValue};
use tracing::warn;
use url::Url;

use crate::args::{HttpMethod, TesterArgs, parse_header_list};
use crate::error::{AppError, AppResult, ValidationError};

/// Immutable description of one load-test run.
///
/// Built once before the engine starts and shared read-only by every worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub url: String,
    pub requests: u64,
    pub concurrency: usize,
    pub timeout: Duration,
    pub headers: BTreeMap<String, String>,
    pub method: HttpMethod,
    pub body: Option<String>,
    pub verbose: bool,
}

impl RunConfig {
    /// Creates a GET configuration with no headers or body.
    #[must_use]
    pub fn new(url: impl Into<String>, requests: u64, concurrency: usize, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            requests,
            concurrency,
            timeout,
            headers: BTreeMap::new(),
            method: HttpMethod::Get,
            body: None,
            verbose: false,
        }
    }

    /// Builds a run configuration from parsed CLI arguments.
    ///
    /// Headers from `--headers` are applied first, then each `-H`. A later
    /// header replaces an earlier one with the same (case-insensitive) name.
    ///
    /// # Errors
    ///
    /// Returns `MissingUrl` when neither the CLI nor the config set a URL.
    pub fn from_args(args: &TesterArgs) -> AppResult<Self> {
        let url = args
            .url
            .clone()
            .ok_or_else(|| AppError::validation(ValidationError::MissingUrl))?;

        let mut config = Self::new(
            url,
            args.requests.get(),
            args.concurrency.get(),
            args.request_timeout,
        );
        config.method = args.method;
        config.body = args.data.clone().filter(|body| !body.is_empty());
        config.verbose = args.verbose;

        if let Some(list) = args.header_list.as_deref() {
            let (headers, skipped) = parse_header_list(list);
            for entry in skipped {
                warn!("Ignoring malformed header entry '{}'", entry);
            }
            for (name, value) in headers {
                config.insert_header(name, value);
            }
        }
        for (name, value) in &args.headers {
            config.insert_header(name.clone(), value.clone());
        }

        Ok(config)
    }

    /// Inserts a header, replacing any existing entry whose name matches
    /// case-insensitively.
    pub fn insert_header(&mut self, name: String, value: String) {
        self.headers
            .retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
        self.headers.insert(name, value);
    }

    /// Rejects configurations that must not start a run.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty or malformed target, a zero
    /// request count, zero concurrency, a zero timeout, or headers that are
    /// not valid HTTP.
    pub fn validate(&self) -> AppResult<()> {
        let target = self.url.trim();
        if target.is_empty() {
            return Err(AppError::validation(ValidationError::EmptyTarget));
        }
        if self.requests == 0 {
            return Err(AppError::validation(ValidationError::RequestCountZero));
        }
        if self.concurrency == 0 {
            return Err(AppError::validation(ValidationError::ConcurrencyZero));
        }
        if self.timeout.is_zero() {
            return Err(AppError::validation(ValidationError::TimeoutZero));
        }

        let parsed = Url::parse(target).map_err(|err| {
            AppError::validation(ValidationError::InvalidUrl {
                url: target.to_owned(),
                source: err,
            })
        })?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(AppError::validation(ValidationError::UnsupportedScheme {
                    scheme: other.to_owned(),
                }));
            }
        }
        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(AppError::validation(ValidationError::UrlMissingHost {
                url: target.to_owned(),
            }));
        }

        for (name, value) in &self.headers {
            HeaderName::from_bytes(name.as_bytes()).map_err(|err| {
                AppError::validation(ValidationError::InvalidHeaderName {
                    header: name.clone(),
                    source: err,
                })
            })?;
            HeaderValue::from_str(value).map_err(|err| {
                AppError::validation(ValidationError::InvalidHeaderValue {
                    header: name.clone(),
                    source: err,
                })
            })?;
        }

        Ok(())
    }

    /// Number of workers actually spawned: never more than the request count.
    #[must_use]
    pub fn effective_concurrency(&self) -> usize {
        let requests = usize::try_from(self.requests).unwrap_or(usize::MAX);
        self.concurrency.min(requests)
    }
}

/// One outgoing call, built by the worker that sends it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
    pub timeout: Duration,
}

impl RequestSpec {
    #[must_use]
    pub fn from_config(config: &RunConfig) -> Self {
        Self {
            method: config.method,
            url: config.url.trim().to_owned(),
            headers: config.headers.clone(),
            body: config.body.clone(),
            timeout: config.timeout,
        }
    }
}
