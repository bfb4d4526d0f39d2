//! HTTP client for the VitiBrasil report site.
//!
//! One shared `reqwest::Client` with a per-request timeout. Transient
//! failures (connect/timeout errors and 5xx responses) are retried with
//! exponential backoff; a non-retryable HTTP status fails the fetch
//! immediately. The exhausted-retries error carries the last underlying
//! cause so callers see why the remote kept failing.

use std::time::Duration;

use anyhow::anyhow;
use tracing::{debug, warn};
use url::Url;

use crate::scraper::errors::ScrapeError;

/// Outcome of a single fetch attempt, steering the retry loop.
pub enum AttemptError {
    /// Worth retrying: network failure or 5xx-class response.
    Transient(anyhow::Error),
    /// Not worth retrying: surfaced to the caller as-is.
    Fatal(ScrapeError),
}

/// Bounded retry schedule: `attempts` tries, base delay doubling after each.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Backoff before retrying after the `attempt`-th failure (1-based):
    /// 2s, 4s, 8s with the defaults.
    fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }

    /// Run `attempt` up to `self.attempts` times, sleeping between transient
    /// failures. Fatal attempt errors short-circuit.
    pub async fn run<T, F, Fut>(&self, url: &Url, mut attempt: F) -> Result<T, ScrapeError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, AttemptError>>,
    {
        let mut last_cause = None;
        for n in 1..=self.attempts {
            match attempt(n).await {
                Ok(value) => return Ok(value),
                Err(AttemptError::Fatal(e)) => return Err(e),
                Err(AttemptError::Transient(cause)) => {
                    warn!(
                        url = %url,
                        attempt = n,
                        max_attempts = self.attempts,
                        error = %cause,
                        "fetch attempt failed"
                    );
                    last_cause = Some(cause);
                    if n < self.attempts {
                        tokio::time::sleep(self.delay_after(n)).await;
                    }
                }
            }
        }

        Err(ScrapeError::Fetch {
            url: url.to_string(),
            attempts: self.attempts,
            source: last_cause.unwrap_or_else(|| anyhow!("no attempts were made")),
        })
    }
}

/// Client for fetching report pages from the VitiBrasil site.
pub struct EmbrapaClient {
    http: reqwest::Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl EmbrapaClient {
    pub fn new(base_url: Url, retry: RetryPolicy, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            retry,
        })
    }

    /// Deterministic report URL: `{base}?ano={year}&opcao={opt}[&subopcao={sub}]`.
    pub fn report_url(&self, year: i32, option: &str, suboption: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("ano", &year.to_string());
            pairs.append_pair("opcao", option);
            if let Some(sub) = suboption {
                pairs.append_pair("subopcao", sub);
            }
        }
        url
    }

    /// Fetch the raw HTML of one report page, retrying transient failures.
    pub async fn fetch(
        &self,
        year: i32,
        option: &str,
        suboption: Option<&str>,
    ) -> Result<String, ScrapeError> {
        let url = self.report_url(year, option, suboption);
        debug!(url = %url, "fetching report page");

        self.retry
            .run(&url, |_| {
                let url = url.clone();
                async move {
                    let response = self
                        .http
                        .get(url.clone())
                        .send()
                        .await
                        .map_err(|e| AttemptError::Transient(e.into()))?;

                    let status = response.status();
                    if status.is_server_error() {
                        return Err(AttemptError::Transient(anyhow!(
                            "server error {status} from {url}"
                        )));
                    }
                    if !status.is_success() {
                        return Err(AttemptError::Fatal(ScrapeError::FetchStatus {
                            url: url.to_string(),
                            status: status.as_u16(),
                        }));
                    }

                    response
                        .text()
                        .await
                        .map_err(|e| AttemptError::Transient(e.into()))
                }
            })
            .await
    }
}

#[async_trait::async_trait]
impl crate::scraper::PageFetcher for EmbrapaClient {
    async fn fetch_page(
        &self,
        year: i32,
        option: &str,
        suboption: Option<&str>,
    ) -> Result<String, ScrapeError> {
        self.fetch(year, option, suboption).await
    }
}
