//! Shared HTTP client with connection pooling, rate limiting, and retries
//!
//! All live platform clients go through this layer. Server errors and
//! transport failures are retried with exponential backoff; client errors
//! are not, and 401/403 surface as `InvalidCredentials` so callers never
//! retry a bad key.

use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::{num::NonZeroU32, sync::Arc, time::Duration};
use streamlens_common::{Result, StreamlensError};
use tokio_retry::{strategy::ExponentialBackoff, RetryIf};
use tracing::{debug, error, instrument, warn};

/// Configuration for the shared API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// Connection pool max idle connections per host (default: 10)
    pub max_idle_per_host: usize,
    /// Rate limit: requests per second (default: 10)
    pub rate_limit_per_sec: u32,
    /// Maximum number of retry attempts (default: 3)
    pub max_retries: usize,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_idle_per_host: 10,
            rate_limit_per_sec: 10,
            max_retries: 3,
        }
    }
}

impl ApiClientConfig {
    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the rate limit
    pub fn with_rate_limit(mut self, rate_limit_per_sec: u32) -> Self {
        self.rate_limit_per_sec = rate_limit_per_sec;
        self
    }

    /// Set the maximum retry attempts
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// Rate-limited, retrying HTTP client shared by the live platform sources
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: ApiClientConfig,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
}

impl ApiClient {
    /// Create a new client with the given configuration
    pub fn new(config: ApiClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(config.max_idle_per_host)
            .build()
            .map_err(|e| StreamlensError::network_with_source("Failed to create HTTP client", e))?;

        let quota = Quota::per_second(
            NonZeroU32::new(config.rate_limit_per_sec)
                .ok_or_else(|| StreamlensError::config("Rate limit must be greater than 0"))?,
        );
        let rate_limiter = Arc::new(DefaultDirectRateLimiter::direct(quota));

        Ok(Self {
            client,
            config,
            rate_limiter,
        })
    }

    /// Create a new client with default configuration
    pub fn with_defaults() -> Result<Self> {
        Self::new(ApiClientConfig::default())
    }

    /// Classify a response by status: success passes, 401/403 become
    /// credential failures, other 4xx are client bugs surfaced as network
    /// errors, and 5xx become retriable source failures.
    fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                error!("API rejected credentials: {}", status);
                Err(StreamlensError::invalid_credentials(format!(
                    "API rejected credentials: HTTP {}",
                    status.as_u16()
                )))
            }
            _ if status.is_client_error() => {
                error!("Client error: {}", status);
                Err(StreamlensError::network(format!(
                    "API returned client error: {}",
                    status
                )))
            }
            _ => {
                warn!("Server error, will retry: {}", status);
                Err(StreamlensError::source_unavailable_with_status(
                    format!("API returned server error: {}", status),
                    status.as_u16(),
                ))
            }
        }
    }

    /// Whether a failure is worth retrying. Credential and client errors
    /// are final; transport and server failures are transient.
    fn is_retriable(err: &StreamlensError) -> bool {
        matches!(err, StreamlensError::SourceUnavailable { .. })
    }

    async fn execute_with_retry<F, Fut>(&self, send: F) -> Result<Response>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = std::result::Result<Response, reqwest::Error>>,
    {
        self.rate_limiter.until_ready().await;

        let retry_strategy = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(10))
            .take(self.config.max_retries);

        RetryIf::spawn(
            retry_strategy,
            || async {
                match send().await {
                    Ok(response) => Self::check_status(response),
                    Err(e) => Err(StreamlensError::from(e)),
                }
            },
            Self::is_retriable,
        )
        .await
    }

    /// GET a JSON document with query parameters
    #[instrument(skip(self, bearer_token), fields(url = %url))]
    pub async fn get_json<T>(
        &self,
        url: &str,
        query: &[(&str, String)],
        bearer_token: Option<&str>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self
            .execute_with_retry(|| {
                let mut request = self.client.get(url).query(query);
                if let Some(token) = bearer_token {
                    request = request.bearer_auth(token);
                }
                request.send()
            })
            .await?;

        Self::parse_response(response).await
    }

    /// POST a form body with HTTP basic auth, used by token endpoints
    #[instrument(skip(self, client_secret, form), fields(url = %url))]
    pub async fn post_form<T>(
        &self,
        url: &str,
        client_id: &str,
        client_secret: &str,
        form: &[(&str, &str)],
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self
            .execute_with_retry(|| {
                self.client
                    .post(url)
                    .basic_auth(client_id, Some(client_secret))
                    .form(form)
                    .send()
            })
            .await?;

        Self::parse_response(response).await
    }

    async fn parse_response<T>(response: Response) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let text = response
            .text()
            .await
            .map_err(|e| StreamlensError::network_with_source("Failed to read response body", e))?;

        debug!("response body length: {}", text.len());
        serde_json::from_str(&text).map_err(StreamlensError::from)
    }
}
