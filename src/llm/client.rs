use async_trait::async_trait;
use log::warn;
use reqwest::{RequestBuilder, Response, StatusCode};
use std::time::Duration;
use thiserror::Error;

const INITIAL_BACKOFF_MS: u64 = 1000;

/// Errors that can occur during LLM operations
#[derive(Debug, Error)]
pub enum LLMError {
    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limit exceeded, retry after {0}s")]
    RateLimitExceeded(u64),

    #[error("Request timeout")]
    Timeout,

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    NetworkError(#[source] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<reqwest::Error> for LLMError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LLMError::Timeout
        } else {
            LLMError::NetworkError(err)
        }
    }
}

/// A language model that answers a single prompt with a single text reply
#[async_trait]
pub trait LLMClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LLMError>;
}

/// Send a request, retrying with exponential backoff while the API answers
/// 429. Any other non-success status is mapped to an error immediately.
pub(crate) async fn send_with_retry<F>(build: F, max_retries: u32) -> Result<Response, LLMError>
where
    F: Fn() -> RequestBuilder,
{
    let mut attempt = 0;
    let mut backoff_ms = INITIAL_BACKOFF_MS;

    loop {
        attempt += 1;

        let response = build().send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let body = response.text().await.unwrap_or_default();
                return Err(LLMError::Authentication(format!("{}: {}", status, body.trim())));
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);

                if attempt > max_retries {
                    return Err(LLMError::RateLimitExceeded(retry_after));
                }

                let wait_ms = retry_after.saturating_mul(1000).max(backoff_ms);
                warn!(
                    "Rate limited, retrying in {}ms (attempt {}/{})",
                    wait_ms, attempt, max_retries
                );

                tokio::time::sleep(Duration::from_millis(wait_ms)).await;
                backoff_ms *= 2;
            }
            _ => {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                return Err(LLMError::ApiError(format!(
                    "API returned status {}: {}",
                    status,
                    error_text.trim()
                )));
            }
        }
    }
}
