//! Authenticated JSON requests through the rate gate
//!
//! Every attempt first passes the host's [`RateGate`]. Responses are
//! classified into success, a terminal failure, or a retryable failure;
//! retries run in a bounded loop so the worst-case cost of a call is fixed.

use super::backoff::ExponentialBackoff;
use super::error::ApiError;
use super::rate_gate::RateGate;
use reqwest::header::RETRY_AFTER;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// Header carrying the caller's credential
pub const CREDENTIAL_HEADER: &str = "X-Riot-Token";

/// Response bodies attached to errors are cut to this many characters
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Longest server-requested delay honoured after a 429 (the long rate window)
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(120);

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per request, including the first
    pub max_attempts: u32,
    /// Delay after a 429 that carries no usable `Retry-After`
    pub default_retry_after: Duration,
    pub backoff_initial: Duration,
    pub backoff_max: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            default_retry_after: Duration::from_secs(1),
            backoff_initial: Duration::from_millis(500),
            backoff_max: Duration::from_secs(8),
        }
    }
}

/// Why an attempt may be retried
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RetryReason {
    RateLimited { retry_after: Option<Duration> },
    Server { status: u16 },
    Network { reason: String },
}

impl RetryReason {
    fn into_error(self, url: &str, attempts: u32) -> ApiError {
        let url = url.to_string();
        match self {
            RetryReason::RateLimited { .. } => ApiError::RateLimited { url, attempts },
            RetryReason::Server { status } => ApiError::TransientServerError { url, status, attempts },
            RetryReason::Network { reason } => ApiError::Network { url, reason, attempts },
        }
    }
}

/// Outcome of one request attempt
#[derive(Debug)]
pub(crate) enum Attempt {
    Success(String),
    Fatal(ApiError),
    Retry(RetryReason),
}

/// Classify a completed HTTP exchange
pub(crate) fn classify_response(
    url: &str,
    status: u16,
    retry_after: Option<&str>,
    body: String,
) -> Attempt {
    match status {
        200..=299 => Attempt::Success(body),
        429 => Attempt::Retry(RetryReason::RateLimited {
            retry_after: retry_after
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(|secs| Duration::from_secs(secs).min(MAX_RETRY_AFTER)),
        }),
        404 => Attempt::Fatal(ApiError::NotFound {
            url: url.to_string(),
        }),
        500..=599 => Attempt::Retry(RetryReason::Server { status }),
        _ => Attempt::Fatal(ApiError::RequestFailed {
            url: url.to_string(),
            status,
            body: truncate_body(&body),
        }),
    }
}

/// Run `attempt_fn` until it succeeds, fails terminally, or exhausts
/// `policy.max_attempts`.
pub(crate) async fn run_with_retries<F, Fut>(
    url: &str,
    policy: &RetryPolicy,
    mut attempt_fn: F,
) -> Result<String, ApiError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Attempt>,
{
    let mut backoff = ExponentialBackoff::new(policy.backoff_initial, policy.backoff_max);
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;

        let reason = match attempt_fn(attempt).await {
            Attempt::Success(body) => return Ok(body),
            Attempt::Fatal(err) => return Err(err),
            Attempt::Retry(reason) => reason,
        };

        if attempt >= max_attempts {
            return Err(reason.into_error(url, attempt));
        }

        let delay = match &reason {
            RetryReason::RateLimited { retry_after } => {
                retry_after.unwrap_or(policy.default_retry_after)
            }
            RetryReason::Server { .. } | RetryReason::Network { .. } => backoff.next_delay(),
        };

        log::warn!(
            "⏳ Retry attempt {} of {} in {:?} ({:?}): {}",
            attempt + 1,
            max_attempts,
            delay,
            reason,
            url
        );
        sleep(delay).await;
    }
}

/// Rate-limited HTTP client returning parsed JSON
pub struct TransportClient {
    http: reqwest::Client,
    gate: Arc<RateGate>,
    policy: RetryPolicy,
    credential: Option<String>,
}

impl TransportClient {
    /// `credential` is attached to every request when present. Pass `None`
    /// for hosts that must never see it.
    pub fn new(
        gate: Arc<RateGate>,
        policy: RetryPolicy,
        timeout: Duration,
        credential: Option<String>,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            gate,
            policy,
            credential,
        })
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// GET `url` and deserialize the body as `T`
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let body = self.get_text(url).await?;

        serde_json::from_str(&body).map_err(|e| ApiError::MalformedResponse {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    /// GET `url` and return the raw body of a 2xx response
    pub async fn get_text(&self, url: &str) -> Result<String, ApiError> {
        let host = host_of(url)?;
        let host = host.as_str();

        run_with_retries(url, &self.policy, move |_| self.attempt(host, url)).await
    }

    async fn attempt(&self, host: &str, url: &str) -> Attempt {
        self.gate.acquire(host).await;

        let mut request = self.http.get(url);
        if let Some(key) = &self.credential {
            request = request.header(CREDENTIAL_HEADER, key);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                return Attempt::Retry(RetryReason::Network {
                    reason: e.to_string(),
                })
            }
        };

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        match response.text().await {
            Ok(body) => classify_response(url, status, retry_after.as_deref(), body),
            Err(e) => Attempt::Retry(RetryReason::Network {
                reason: e.to_string(),
            }),
        }
    }
}

/// Rate budget key for a URL: host plus explicit port, if any
pub fn host_of(url: &str) -> Result<String, ApiError> {
    let parsed = reqwest::Url::parse(url).map_err(|_| ApiError::InvalidUrl(url.to_string()))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| ApiError::InvalidUrl(url.to_string()))?;

    Ok(match parsed.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

fn truncate_body(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY_CHARS).collect()
}
