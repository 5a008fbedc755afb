//! Retry policy for catalog API requests
//!
//! Only rate limiting, server errors and connection-level failures are
//! retried; client errors fail immediately.

use rand::Rng;
use std::time::Duration;

/// Configuration for HTTP retry behavior
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Base delay between retries
    pub base_delay: Duration,
    /// Maximum delay to wait (prevents excessive waits)
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Random extra wait, as a fraction of the computed delay
    pub jitter: f64,
}

impl RetryPolicy {
    /// phimapi is a single public host; keep retries short so a view never
    /// waits long on a failing list
    pub fn catalog(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            jitter: 0.1,
        }
    }

    /// No retries at all
    pub fn none() -> Self {
        Self::catalog(0)
    }

    /// Calculate delay for next retry attempt
    pub fn calculate_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        // If server provided Retry-After header, respect it
        if let Some(server_delay) = retry_after {
            return server_delay.min(self.max_delay);
        }

        let multiplier = self.backoff_multiplier.powi(attempt as i32);
        let delay = self.base_delay.as_secs_f64() * multiplier;
        let jitter = if self.jitter > 0.0 {
            rand::thread_rng().gen_range(0.0..=self.jitter) * delay
        } else {
            0.0
        };

        Duration::from_secs_f64(delay + jitter).min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::catalog(2)
    }
}

/// Information extracted from HTTP 429 responses
#[derive(Debug, Clone, Default)]
pub struct RateLimitInfo {
    /// How long to wait before next request (from Retry-After header)
    pub retry_after: Option<Duration>,
    /// Number of requests remaining (from X-RateLimit-Remaining header)
    pub remaining: Option<u32>,
}

impl RateLimitInfo {
    /// Parse rate limit information from HTTP response headers
    pub fn from_headers(headers: &reqwest::header::HeaderMap) -> Self {
        let retry_after = headers
            .get("retry-after")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs);

        let remaining = headers
            .get("x-ratelimit-remaining")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.trim().parse::<u32>().ok());

        Self {
            retry_after,
            remaining,
        }
    }
}

/// Statuses worth another attempt
pub fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 425 | 429 | 500..=599)
}

/// Determines if a transport-level error is retryable
pub fn is_retryable_error(error: &reqwest::Error) -> bool {
    match error.status() {
        Some(status) => is_retryable_status(status.as_u16()),
        None => error.is_timeout() || error.is_connect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_policy() {
        let policy = RetryPolicy::catalog(3);
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.base_delay, Duration::from_millis(500));
        assert_eq!(RetryPolicy::none().max_retries, 0);
    }

    #[test]
    fn test_calculate_delay_with_retry_after() {
        let policy = RetryPolicy::default();
        let delay = policy.calculate_delay(1, Some(Duration::from_secs(3)));
        assert_eq!(delay, Duration::from_secs(3));

        let capped = policy.calculate_delay(1, Some(Duration::from_secs(600)));
        assert_eq!(capped, policy.max_delay);
    }

    #[test]
    fn test_delay_grows_and_jitter_stays_bounded() {
        let policy = RetryPolicy::default();
        for _ in 0..20 {
            let first = policy.calculate_delay(0, None);
            let second = policy.calculate_delay(1, None);
            assert!(first >= Duration::from_millis(500));
            assert!(first <= Duration::from_millis(560));
            assert!(second >= Duration::from_millis(1000));
            assert!(second <= Duration::from_millis(1120));
        }
        assert_eq!(policy.calculate_delay(10, None), policy.max_delay);
    }

    #[test]
    fn test_rate_limit_info_parsing() {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("retry-after", "30".parse().unwrap());
        headers.insert("x-ratelimit-remaining", "0".parse().unwrap());

        let info = RateLimitInfo::from_headers(&headers);
        assert_eq!(info.retry_after, Some(Duration::from_secs(30)));
        assert_eq!(info.remaining, Some(0));
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable_status(429));
        assert!(is_retryable_status(503));
        assert!(!is_retryable_status(404));
        assert!(!is_retryable_status(400));
    }
}
