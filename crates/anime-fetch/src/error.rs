//! Failure taxonomy for cached fetches.

use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong between a `(url, key)` request and a JSON value
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not complete (connection, DNS, body read)
    #[error("network failure: {0}")]
    Network(String),

    /// A response arrived but its status was not OK
    #[error("unexpected HTTP status {0}")]
    Status(StatusCode),

    /// Every attempt in the retry budget failed
    #[error("max retries reached after {attempts} attempts, could not fetch data")]
    RetriesExhausted {
        attempts: u32,
        last: Option<Box<FetchError>>,
    },

    /// The URL is not an absolute http(s) URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Cache keys must be non-empty
    #[error("cache key must not be empty")]
    InvalidKey,

    /// A response body or cached payload is not valid JSON
    #[error("invalid JSON payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The persistent store failed to read or write
    #[error("cache store error: {0:#}")]
    Store(anyhow::Error),
}

impl FetchError {
    /// Whether another attempt may succeed where this one failed
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Network(_) | FetchError::Status(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(FetchError::Network("connection refused".to_string()).is_retryable());
        assert!(FetchError::Status(StatusCode::INTERNAL_SERVER_ERROR).is_retryable());
        assert!(!FetchError::InvalidKey.is_retryable());
        assert!(!FetchError::RetriesExhausted { attempts: 3, last: None }.is_retryable());
    }

    #[test]
    fn test_exhausted_message_names_attempts() {
        let err = FetchError::RetriesExhausted {
            attempts: 3,
            last: Some(Box::new(FetchError::Status(StatusCode::INTERNAL_SERVER_ERROR))),
        };
        assert_eq!(
            err.to_string(),
            "max retries reached after 3 attempts, could not fetch data"
        );
    }
}
