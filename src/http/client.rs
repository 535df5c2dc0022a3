use reqwest::Client;

use crate::{
    args::DEFAULT_USER_AGENT,
    domain::RunConfig,
    error::{AppError, AppResult, HttpError},
};

/// Builds the shared HTTP client for one run.
///
/// The idle pool is sized to the worker count so keep-alive connections are
/// reused across requests instead of being reopened.
///
/// # Errors
///
/// Returns an error when the client cannot be built.
pub fn build_client(config: &RunConfig) -> AppResult<Client> {
    Client::builder()
        .timeout(config.timeout)
        .user_agent(DEFAULT_USER_AGENT)
        .pool_max_idle_per_host(config.effective_concurrency())
        .build()
        .map_err(|source| AppError::http(HttpError::BuildClientFailed { source }))
}
