use std::collections::BTreeMap;
use std::error::Error as _;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{
    Client, Method, Request,
    header::{HeaderMap, HeaderName, HeaderValue},
};

use crate::{
    args::HttpMethod,
    domain::{RequestSpec, RunConfig},
    error::AppResult,
    metrics::Outcome,
};

use super::build_client;

/// Performs one request and reports it as an [`Outcome`].
///
/// Ordinary failures (refused connection, timeout, broken response) are
/// outcomes with a failure detail, never errors. Cancellation is delivered
/// by dropping the returned future.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn perform(&self, spec: &RequestSpec) -> Outcome;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(config: &RunConfig) -> AppResult<Self> {
        Ok(Self::from_client(build_client(config)?))
    }

    #[must_use]
    pub const fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn perform(&self, spec: &RequestSpec) -> Outcome {
        let started = Instant::now();
        let request = match build_request(&self.client, spec) {
            Ok(request) => request,
            Err(err) => return Outcome::failed(started.elapsed(), err),
        };

        match self.client.execute(request).await {
            Ok(response) => {
                let status = response.status().as_u16();
                // A timeout mid-body is reported like any other timeout, so the
                // outcome does not depend on which timer fires first.
                match drain_response_body(response).await {
                    Ok(bytes) => Outcome::response(status, started.elapsed(), bytes),
                    Err(err) if err.is_timeout() => Outcome::timed_out(spec.timeout),
                    Err(err) => Outcome {
                        status,
                        elapsed: started.elapsed(),
                        error: Some(format!(
                            "failed to read response body: {}",
                            describe_error(&err, spec.timeout)
                        )),
                        timed_out: false,
                        response_bytes: 0,
                    },
                }
            }
            Err(err) if err.is_timeout() => Outcome::timed_out(spec.timeout),
            Err(err) => Outcome::failed(started.elapsed(), describe_error(&err, spec.timeout)),
        }
    }
}

pub(super) const fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Head => Method::HEAD,
    }
}

pub(super) fn header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, String> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|err| format!("invalid header name '{}': {}", name, err))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|err| format!("invalid value for header '{}': {}", name, err))?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

fn build_request(client: &Client, spec: &RequestSpec) -> Result<Request, String> {
    let headers = header_map(&spec.headers)?;
    let mut builder = client
        .request(to_reqwest_method(spec.method), spec.url.as_str())
        .timeout(spec.timeout)
        .headers(headers);
    if let Some(body) = spec.body.as_ref() {
        builder = builder.body(body.clone());
    }
    builder
        .build()
        .map_err(|err| format!("invalid request: {}", err))
}

async fn drain_response_body(response: reqwest::Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}

/// Renders a reqwest error with its innermost cause, which carries the
/// useful part ("Connection refused", "dns error", ...).
fn describe_error(err: &reqwest::Error, timeout: Duration) -> String {
    if err.is_timeout() {
        return format!("request timed out after {:?}", timeout);
    }

    let mut root: Option<String> = None;
    let mut source = err.source();
    while let Some(cause) = source {
        root = Some(cause.to_string());
        source = cause.source();
    }
    let detail = root.map_or_else(|| err.to_string(), |cause| format!("{}: {}", err, cause));

    if err.is_connect() {
        format!("connection failed: {}", detail)
    } else {
        format!("request failed: {}", detail)
    }
}
