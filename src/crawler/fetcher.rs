//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with user agent, timeouts and redirect limit
//! - Single-attempt page retrieval behind the [`Transport`] trait
//! - Retry with exponential backoff around any transport
//! - Error classification

use crate::config::FetchConfig;
use reqwest::{redirect::Policy, Client};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Why a single fetch attempt failed
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("too many redirects")]
    RedirectLimit,

    #[error("HTTP status {0}")]
    Status(u16),
}

/// One attempt at retrieving a page body
///
/// Implementations report every non-success outcome as a [`FetchError`];
/// retrying is layered on top by [`fetch_with_retry`].
pub trait Transport {
    fn get(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Page transport backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await.map_err(classify_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response.text().await.map_err(classify_error)
    }
}

/// Maps a reqwest error onto the fetch error taxonomy
fn classify_error(e: reqwest::Error) -> FetchError {
    if e.is_redirect() {
        FetchError::RedirectLimit
    } else if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Network(e.to_string())
    }
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed transparently up to `max_redirects` hops; one more
/// hop turns the request into [`FetchError::RedirectLimit`].
///
/// # Example
///
/// ```no_run
/// use link_mapper::config::FetchConfig;
/// use link_mapper::crawler::build_http_client;
///
/// let client = build_http_client(&FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(config.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Attempt budget and backoff schedule for one URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,

    /// Delay after the first failed attempt
    pub initial_backoff: Duration,

    /// Factor applied to the delay after each further failure
    pub multiplier: u32,
}

impl RetryPolicy {
    pub fn from_config(config: &FetchConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            multiplier: config.backoff_multiplier,
        }
    }

    /// The full sequence of delays a URL that never succeeds will wait through
    pub fn delays(&self) -> Vec<Duration> {
        let mut backoff = Backoff::new(self);
        std::iter::from_fn(|| backoff.on_failure()).collect()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&FetchConfig::default())
    }
}

/// Retry state for a single URL
///
/// Tracks how many attempts have failed and what the next delay is. Each
/// call to [`Backoff::on_failure`] consumes one attempt.
#[derive(Debug, Clone)]
pub struct Backoff {
    failed_attempts: u32,
    max_attempts: u32,
    next_delay: Duration,
    multiplier: u32,
}

impl Backoff {
    pub fn new(policy: &RetryPolicy) -> Self {
        Self {
            failed_attempts: 0,
            max_attempts: policy.max_attempts,
            next_delay: policy.initial_backoff,
            multiplier: policy.multiplier,
        }
    }

    /// Records a failed attempt
    ///
    /// Returns the delay to wait before the next attempt, or `None` once the
    /// attempt budget is spent.
    pub fn on_failure(&mut self) -> Option<Duration> {
        self.failed_attempts += 1;
        if self.failed_attempts >= self.max_attempts {
            return None;
        }

        let delay = self.next_delay;
        self.next_delay = self.next_delay.saturating_mul(self.multiplier);
        Some(delay)
    }

    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }
}

/// Final result of fetching one URL with retries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page body was retrieved
    Fetched { body: String, attempts: u32 },

    /// Every attempt failed; `error` is the last one seen
    Failed { error: FetchError, attempts: u32 },
}

/// Fetches a URL, retrying failed attempts with exponential backoff
///
/// # Retry Logic
///
/// | Attempt | Outcome  | Action                              |
/// |---------|----------|-------------------------------------|
/// | any     | success  | return `Fetched`                    |
/// | < max   | failure  | sleep current delay, double it      |
/// | max     | failure  | log, return `Failed`                |
///
/// Sleeping is non-blocking, so other pipelines in the same round keep
/// making progress. Errors never escape this function.
pub async fn fetch_with_retry<T: Transport>(
    transport: &T,
    url: &str,
    policy: &RetryPolicy,
) -> FetchOutcome {
    let mut backoff = Backoff::new(policy);

    loop {
        match transport.get(url).await {
            Ok(body) => {
                return FetchOutcome::Fetched {
                    body,
                    attempts: backoff.failed_attempts() + 1,
                }
            }
            Err(error) => match backoff.on_failure() {
                Some(delay) => {
                    tracing::debug!(
                        "Attempt {} for {} failed ({}), retrying in {:?}",
                        backoff.failed_attempts(),
                        url,
                        error,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                None => {
                    tracing::warn!(
                        "Failed to fetch {} after {} attempts: {}",
                        url,
                        backoff.failed_attempts(),
                        error
                    );
                    return FetchOutcome::Failed {
                        error,
                        attempts: backoff.failed_attempts(),
                    };
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// Fails a fixed number of times, then serves a body
    struct FlakyTransport {
        failures: u32,
        calls: Mutex<Vec<Instant>>,
    }

    impl FlakyTransport {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_times(&self) -> Vec<Instant> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Transport for FlakyTransport {
        async fn get(&self, _url: &str) -> Result<String, FetchError> {
            let mut calls = self.calls.lock().unwrap();
            calls.push(Instant::now());
            if calls.len() as u32 <= self.failures {
                Err(FetchError::Status(503))
            } else {
                Ok("<html></html>".to_string())
            }
        }
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&FetchConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.initial_backoff, Duration::from_millis(1000));
        assert_eq!(policy.multiplier, 2);
    }

    #[test]
    fn test_delays_double() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.delays(),
            vec![Duration::from_millis(1000), Duration::from_millis(2000)]
        );

        let longer = RetryPolicy {
            max_attempts: 4,
            ..policy
        };
        assert_eq!(
            longer.delays(),
            vec![
                Duration::from_millis(1000),
                Duration::from_millis(2000),
                Duration::from_millis(4000)
            ]
        );
    }

    #[test]
    fn test_single_attempt_has_no_delay() {
        let policy = RetryPolicy {
            max_attempts: 1,
            ..RetryPolicy::default()
        };
        assert!(policy.delays().is_empty());
    }

    #[test]
    fn test_backoff_state_machine() {
        let mut backoff = Backoff::new(&RetryPolicy::default());
        assert_eq!(backoff.on_failure(), Some(Duration::from_millis(1000)));
        assert_eq!(backoff.failed_attempts(), 1);
        assert_eq!(backoff.on_failure(), Some(Duration::from_millis(2000)));
        assert_eq!(backoff.on_failure(), None);
        assert_eq!(backoff.failed_attempts(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_third_attempt() {
        let transport = FlakyTransport::new(2);
        let outcome = fetch_with_retry(&transport, "https://a.test/", &RetryPolicy::default()).await;

        assert_eq!(
            outcome,
            FetchOutcome::Fetched {
                body: "<html></html>".to_string(),
                attempts: 3
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_after_all_attempts() {
        let transport = FlakyTransport::new(3);
        let outcome = fetch_with_retry(&transport, "https://a.test/", &RetryPolicy::default()).await;

        assert_eq!(
            outcome,
            FetchOutcome::Failed {
                error: FetchError::Status(503),
                attempts: 3
            }
        );
        assert_eq!(transport.call_times().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_timing_between_attempts() {
        let transport = FlakyTransport::new(3);
        fetch_with_retry(&transport, "https://a.test/", &RetryPolicy::default()).await;

        let calls = transport.call_times();
        assert_eq!(calls.len(), 3);

        let first_gap = calls[1] - calls[0];
        let second_gap = calls[2] - calls[1];
        assert!(first_gap >= Duration::from_millis(1000));
        assert!(first_gap < Duration::from_millis(1010));
        assert!(second_gap >= Duration::from_millis(2000));
        assert!(second_gap < Duration::from_millis(2010));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_attempt_success_does_not_sleep() {
        let transport = FlakyTransport::new(0);
        let start = Instant::now();
        let outcome = fetch_with_retry(&transport, "https://a.test/", &RetryPolicy::default()).await;

        assert_eq!(
            outcome,
            FetchOutcome::Fetched {
                body: "<html></html>".to_string(),
                attempts: 1
            }
        );
        assert_eq!(Instant::now() - start, Duration::ZERO);
    }
}
