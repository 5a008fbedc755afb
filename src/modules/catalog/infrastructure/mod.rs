pub mod http_client;

// Re-export commonly used types
pub use http_client::{RateLimitClient, RetryPolicy};
