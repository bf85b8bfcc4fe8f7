use thiserror::Error;

/// Failure of a single upstream request, after any retries
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("rate limited after {attempts} attempts: {url}")]
    RateLimited { url: String, attempts: u32 },

    #[error("server error {status} after {attempts} attempts: {url}")]
    TransientServerError { url: String, status: u16, attempts: u32 },

    #[error("not found: {url}")]
    NotFound { url: String },

    #[error("malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    #[error("request failed with status {status} for {url}: {body}")]
    RequestFailed { url: String, status: u16, body: String },

    #[error("network error after {attempts} attempts for {url}: {reason}")]
    Network { url: String, reason: String, attempts: u32 },

    #[error("invalid request url: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Resource absent upstream; callers skip the item instead of reporting a failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApiError::RateLimited { .. }
                | ApiError::TransientServerError { .. }
                | ApiError::Network { .. }
        )
    }
}
