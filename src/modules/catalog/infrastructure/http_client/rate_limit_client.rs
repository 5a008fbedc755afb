//! HTTP client for the catalog API with rate limiting and retry logic

use async_trait::async_trait;
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use reqwest::header::ACCEPT;
use reqwest::{Client, Response};
use serde_json::Value;
use std::num::NonZeroU32;
use std::time::Duration;
use tokio::time::sleep;

use super::retry_policy::{is_retryable_error, is_retryable_status, RateLimitInfo, RetryPolicy};
use crate::modules::catalog::application::ports::CatalogFetcher;
use crate::shared::config::AppConfig;
use crate::shared::errors::{AppError, AppResult};

pub type DirectRateLimiter = GovernorRateLimiter<
    governor::state::direct::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
    governor::middleware::NoOpMiddleware,
>;

const USER_AGENT: &str = concat!("phim/", env!("CARGO_PKG_VERSION"));

/// Rate-limited, retrying GET client
pub struct RateLimitClient {
    client: Client,
    rate_limiter: DirectRateLimiter,
    retry_policy: RetryPolicy,
    name: String,
}

impl RateLimitClient {
    /// Client configured from `PHIM_*` settings
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        Self::new(
            "phimapi",
            RetryPolicy::catalog(config.max_retries),
            Self::create_rate_limiter(config.requests_per_second, config.request_burst)?,
            config.request_timeout(),
        )
    }

    /// Create a rate limiter with specified requests per second and burst capacity
    pub fn create_rate_limiter(
        requests_per_second: f64,
        burst_size: u32,
    ) -> AppResult<DirectRateLimiter> {
        if requests_per_second.is_nan() || requests_per_second <= 0.0 {
            return Err(AppError::ConfigError(format!(
                "requests per second must be positive, got {}",
                requests_per_second
            )));
        }

        let period = Duration::try_from_secs_f64(1.0 / requests_per_second).map_err(|e| {
            AppError::ConfigError(format!(
                "requests per second {} gives an unusable period: {}",
                requests_per_second, e
            ))
        })?;
        let burst = NonZeroU32::new(burst_size.max(1))
            .ok_or_else(|| AppError::ConfigError("burst size must be positive".to_string()))?;
        let quota = Quota::with_period(period)
            .ok_or_else(|| AppError::ConfigError("rate limit period is zero".to_string()))?
            .allow_burst(burst);

        Ok(GovernorRateLimiter::direct(quota))
    }

    pub fn new(
        name: &str,
        retry_policy: RetryPolicy,
        rate_limiter: DirectRateLimiter,
        timeout: Duration,
    ) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            rate_limiter,
            retry_policy,
            name: name.to_string(),
        })
    }

    /// GET `url` with rate limiting and retries
    async fn request_with_retries(&self, url: &str) -> AppResult<Value> {
        let max_retries = self.retry_policy.max_retries;
        let mut attempt = 0;

        loop {
            // Wait for rate limiter before attempting request
            self.rate_limiter.until_ready().await;

            match self.client.get(url).header(ACCEPT, "application/json").send().await {
                Ok(response) if response.status().is_success() => {
                    return self.parse_response(response).await;
                }
                Ok(response) => {
                    let status = response.status().as_u16();
                    if !is_retryable_status(status) || attempt >= max_retries {
                        return Err(AppError::http_status(status));
                    }

                    let info = RateLimitInfo::from_headers(response.headers());
                    let delay = self.retry_policy.calculate_delay(attempt, info.retry_after);
                    log::warn!(
                        "{} returned {} (attempt {}/{}). Retrying in {:?}",
                        self.name,
                        status,
                        attempt + 1,
                        max_retries + 1,
                        delay
                    );
                    sleep(delay).await;
                }
                Err(e) => {
                    if !is_retryable_error(&e) || attempt >= max_retries {
                        return Err(AppError::from(e));
                    }

                    let delay = self.retry_policy.calculate_delay(attempt, None);
                    log::warn!(
                        "{} request failed (attempt {}/{}): {}. Retrying in {:?}",
                        self.name,
                        attempt + 1,
                        max_retries + 1,
                        e,
                        delay
                    );
                    sleep(delay).await;
                }
            }

            attempt += 1;
        }
    }

    async fn parse_response(&self, response: Response) -> AppResult<Value> {
        let response_text = response.text().await.map_err(|e| {
            AppError::network(format!("Failed to read {} response: {}", self.name, e))
        })?;

        serde_json::from_str(&response_text).map_err(|e| {
            let preview: String = response_text.chars().take(200).collect();
            AppError::ShapeError(format!(
                "{} response is not JSON: {}. Response: {}",
                self.name, e, preview
            ))
        })
    }

    /// Check if a request can be made now (for testing/debugging)
    pub fn can_make_request_now(&self) -> bool {
        self.rate_limiter.check().is_ok()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl CatalogFetcher for RateLimitClient {
    async fn get_json(&self, url: &str) -> AppResult<Value> {
        self.request_with_retries(url).await
    }
}
