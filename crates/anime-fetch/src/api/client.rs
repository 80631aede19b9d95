//! HTTP client with a fixed-delay retry budget.

use crate::error::FetchError;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Parse the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// A single GET request, with no retry logic of its own.
///
/// Non-OK statuses are returned as responses; only failures to complete the
/// exchange are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<RawResponse, FetchError>;
}

/// Production transport backed by reqwest
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport sending the given user agent.
    ///
    /// No request timeout is set; the retry budget bounds total duration.
    pub fn new(user_agent: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .gzip(true)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<RawResponse, FetchError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_builder() {
                FetchError::InvalidUrl(url.to_string())
            } else {
                FetchError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(RawResponse { status, body })
    }
}

/// Attempt budget and the fixed wait between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, first try included
    pub max_attempts: u32,
    /// Wait after a failed attempt before the next one
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// One attempt, no waiting
    pub fn single() -> Self {
        Self::new(1, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(1000))
    }
}

/// Client that retries failed GETs a bounded number of times
#[derive(Clone)]
pub struct RetryingClient {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl RetryingClient {
    pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Fetch `url` using the client's default policy
    pub async fn fetch_with_retries(&self, url: &str) -> Result<RawResponse, FetchError> {
        self.fetch_with_policy(url, self.policy).await
    }

    /// Fetch `url`, retrying network failures and non-OK statuses.
    ///
    /// Waits `policy.delay` between attempts and gives up with
    /// [`FetchError::RetriesExhausted`] after `policy.max_attempts` tries.
    pub async fn fetch_with_policy(
        &self,
        url: &str,
        policy: RetryPolicy,
    ) -> Result<RawResponse, FetchError> {
        let mut last = None;

        for attempt in 1..=policy.max_attempts {
            debug!(url = %url, attempt = attempt, "Making API request");

            let failure = match self.transport.get(url).await {
                Ok(response) if response.status.is_success() => {
                    debug!(url = %url, attempt = attempt, "Request successful");
                    return Ok(response);
                }
                Ok(response) => FetchError::Status(response.status),
                Err(e) => e,
            };

            warn!(
                url = %url,
                attempt = attempt,
                max_attempts = policy.max_attempts,
                error = %failure,
                "Attempt failed"
            );

            if !failure.is_retryable() {
                return Err(failure);
            }
            last = Some(Box::new(failure));

            if attempt < policy.max_attempts {
                debug!(delay_ms = policy.delay.as_millis(), "Retrying after delay");
                sleep(policy.delay).await;
            }
        }

        Err(FetchError::RetriesExhausted {
            attempts: policy.max_attempts,
            last,
        })
    }
}
