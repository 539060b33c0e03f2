use std::time::Duration;

use reqwest::{
    Client, Error,
    header::{HeaderMap, USER_AGENT},
};

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use reqwest_tracing::TracingMiddleware;

// Uploading a large nightly artifact on a slow CI runner can take
// a while, so the response timeout is much longer than what a plain
// JSON API call would need.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/*
    Adds middleware for:

    - Retrying failed requests with exponential backoff
    - Tracing of HTTP requests
*/
fn add_client_middleware(client: Client) -> ClientWithMiddleware {
    ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(
            ExponentialBackoff::builder().build_with_max_retries(3),
        ))
        .with(TracingMiddleware::default())
        .build()
}

/**
    Creates a client for the GitHub API with:

    - HTTPS only
    - Timeouts for connection and response
    - All common compression algorithms enabled
    - The given default headers (authorization, api version)
    - User agent set to `<crate_name>/<crate_version> (<repository_url>)`
*/
pub(super) fn create_client(mut default_headers: HeaderMap) -> Result<ClientWithMiddleware, Error> {
    let user_agent = format!(
        "{}/{} ({})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_REPOSITORY"),
    );

    default_headers.insert(USER_AGENT, user_agent.parse().unwrap());

    let client = Client::builder()
        .default_headers(default_headers)
        .https_only(true)
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(RESPONSE_TIMEOUT)
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()?;

    Ok(add_client_middleware(client))
}
