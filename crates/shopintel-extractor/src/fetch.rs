//! Page retrieval with timeout, retry, and connection reuse.
//!
//! Ordinary HTTP failure (404, timeout, connection refused) is data, not an
//! error: it maps to a [`FetchStatus`] on the returned [`FetchResult`] so
//! parsers can treat a missing page as a normal outcome. Only a malformed
//! URL is a hard error.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::redirect::Policy;
use shopintel_core::AppConfig;

use crate::error::ExtractError;

/// How a single page retrieval concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Ok,
    NotFound,
    /// A non-2xx status other than 404, e.g. 403 or 503.
    HttpError(u16),
    TimedOut,
    /// Connection-level failure: refused, reset, DNS, TLS.
    NetworkError,
}

impl std::fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchStatus::Ok => write!(f, "ok"),
            FetchStatus::NotFound => write!(f, "not found"),
            FetchStatus::HttpError(status) => write!(f, "http {status}"),
            FetchStatus::TimedOut => write!(f, "timed out"),
            FetchStatus::NetworkError => write!(f, "network error"),
        }
    }
}

/// The outcome of fetching one URL. Ephemeral: consumed immediately by a
/// parser, never persisted.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub url: String,
    pub status: FetchStatus,
    /// Response body; empty unless `status` is [`FetchStatus::Ok`].
    pub body: String,
    pub content_type: Option<String>,
}

impl FetchResult {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == FetchStatus::Ok
    }

    pub(crate) fn failed(url: &str, status: FetchStatus) -> Self {
        Self {
            url: url.to_owned(),
            status,
            body: String::new(),
            content_type: None,
        }
    }
}

/// Injectable page-retrieval capability. The assembler owns one
/// implementation per request; tests substitute instrumented stubs.
#[async_trait]
pub trait PageFetch: Send + Sync {
    /// Retrieves `url`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::InvalidUrl`] when `url` does not parse;
    /// every other failure mode is reported through
    /// [`FetchResult::status`].
    async fn fetch(&self, url: &str) -> Result<FetchResult, ExtractError>;
}

/// HTTP implementation of [`PageFetch`] over a pooled `reqwest::Client`.
///
/// Transient outcomes (network failure, timeout, 429, 5xx) are retried with
/// exponential backoff up to `max_retries` additional attempts; other 4xx
/// statuses are returned as-is without retrying. When retries are exhausted
/// the final status is still returned as a [`FetchResult`], never as an
/// error.
pub struct HttpFetcher {
    client: reqwest::Client,
    max_retries: u32,
    backoff_base_ms: u64,
}

/// One attempt either settles the fetch or reports a retriable status.
enum Attempt {
    Done(FetchResult),
    Transient(FetchStatus),
}

impl HttpFetcher {
    /// Builds a fetcher with the configured timeout, redirect limit, and
    /// `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: &AppConfig) -> Result<Self, ExtractError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::limited(config.max_redirects))
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries: config.max_retries,
            backoff_base_ms: config.retry_backoff_base_ms,
        })
    }

    async fn attempt(&self, url: &reqwest::Url) -> Attempt {
        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(err) if err.is_timeout() => return Attempt::Transient(FetchStatus::TimedOut),
            Err(_) => return Attempt::Transient(FetchStatus::NetworkError),
        };

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Attempt::Done(FetchResult::failed(url.as_str(), FetchStatus::NotFound));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            return Attempt::Transient(FetchStatus::HttpError(status.as_u16()));
        }
        if !status.is_success() {
            return Attempt::Done(FetchResult::failed(
                url.as_str(),
                FetchStatus::HttpError(status.as_u16()),
            ));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        match response.text().await {
            Ok(body) => Attempt::Done(FetchResult {
                url: url.to_string(),
                status: FetchStatus::Ok,
                body,
                content_type,
            }),
            Err(err) if err.is_timeout() => Attempt::Transient(FetchStatus::TimedOut),
            Err(_) => Attempt::Transient(FetchStatus::NetworkError),
        }
    }
}

#[async_trait]
impl PageFetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResult, ExtractError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| ExtractError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;

        let mut attempt = 0u32;
        loop {
            match self.attempt(&parsed).await {
                Attempt::Done(result) => return Ok(result),
                Attempt::Transient(status) => {
                    if attempt >= self.max_retries {
                        return Ok(FetchResult::failed(url, status));
                    }
                    let delay = backoff_delay(self.backoff_base_ms, attempt);
                    tracing::warn!(
                        url,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        status = %status,
                        "transient fetch failure — retrying after backoff"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

/// Exponential backoff: `base_ms * 2^attempt` milliseconds, saturating.
fn backoff_delay(base_ms: u64, attempt: u32) -> Duration {
    Duration::from_millis(base_ms.saturating_mul(1u64 << attempt.min(20)))
}
