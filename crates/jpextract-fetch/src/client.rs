//! HTTP client for the Justice Courts public extract endpoint.

use std::time::Duration;

use jpextract_core::{CodeError, ExtractRequest, ExtractTable};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{RetryPolicy, parse_extract};

pub const EXTRACT_URL: &str =
    "https://jpwebsite.harriscountytx.gov/PublicExtracts/GetExtractData";

/// Longest server error body carried into an error message.
const MAX_ERROR_BODY: usize = 200;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status} after {attempts} attempt(s): {body}")]
    Server {
        status: u16,
        attempts: u32,
        body: String,
    },
    #[error("malformed XML response: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("invalid extract request: {0}")]
    Request(#[from] CodeError),
}

/// Settings for one retrieval run.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub url: String,
    pub retry: RetryPolicy,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            url: EXTRACT_URL.to_string(),
            retry: RetryPolicy::default(),
            timeout: Duration::from_secs(120),
            user_agent: concat!("jpextract/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Extract API client.
///
/// Holds one `reqwest::Client`, and with it one connection pool, for its
/// whole lifetime; build one per run and issue every request through it.
pub struct ExtractClient {
    client: reqwest::Client,
    config: FetchConfig,
}

impl ExtractClient {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Issue one extract request.
    ///
    /// Server errors in the retry policy are retried up to its attempt budget;
    /// any other non-success status fails at once. `None` means the court had
    /// no rows for the requested dates.
    pub async fn get_extract(
        &self,
        request: &ExtractRequest,
    ) -> Result<Option<ExtractTable>, FetchError> {
        let params = request.params();
        let retry = &self.config.retry;

        let mut attempt = 0;
        let resp = loop {
            attempt += 1;
            let resp = self
                .client
                .get(&self.config.url)
                .query(&params)
                .send()
                .await?;
            let status = resp.status();
            if status.is_success() {
                break resp;
            }
            if retry.should_retry(status.as_u16(), attempt) {
                let delay = retry.backoff(attempt);
                warn!(
                    status = status.as_u16(),
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    court = %request.court(),
                    "server error; retrying"
                );
                tokio::time::sleep(delay).await;
                continue;
            }
            let mut body = resp.text().await.unwrap_or_default();
            truncate_at_char_boundary(&mut body, MAX_ERROR_BODY);
            return Err(FetchError::Server {
                status: status.as_u16(),
                attempts: attempt,
                body,
            });
        };

        debug!(attempts = attempt, "parsing response");
        let body = resp.text().await?;
        parse_extract(&body, request.court())
    }
}

fn truncate_at_char_boundary(s: &mut String, max: usize) {
    if s.len() <= max {
        return;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s.truncate(end);
}
