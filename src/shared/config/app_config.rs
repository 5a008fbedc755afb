use crate::shared::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://phimapi.com";
pub const DEFAULT_PLAYER_URL: &str = "https://player.phimapi.com/player/";

/// Runtime configuration, read from `PHIM_*` environment variables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_base_url: String,
    pub player_url: String,
    pub storage_dir: PathBuf,
    /// TTL for frequently changing lists (movies, search, related)
    pub list_cache_ttl_secs: u64,
    /// TTL for near-static category data
    pub category_cache_ttl_secs: u64,
    pub cache_max_entries: usize,
    pub request_timeout_secs: u64,
    pub requests_per_second: f64,
    pub request_burst: u32,
    pub max_retries: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            player_url: DEFAULT_PLAYER_URL.to_string(),
            storage_dir: PathBuf::from(".phim"),
            list_cache_ttl_secs: 5 * 60,
            category_cache_ttl_secs: 30 * 60,
            cache_max_entries: 500,
            request_timeout_secs: 10,
            requests_per_second: 2.0,
            request_burst: 5,
            max_retries: 2,
        }
    }
}

impl AppConfig {
    /// Build configuration from the process environment, falling back to defaults
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (used by tests)
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            api_base_url: lookup("PHIM_API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            player_url: lookup("PHIM_PLAYER_URL").unwrap_or(defaults.player_url),
            storage_dir: lookup("PHIM_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_dir),
            list_cache_ttl_secs: parse_var(&lookup, "PHIM_LIST_CACHE_TTL_SECS")?
                .unwrap_or(defaults.list_cache_ttl_secs),
            category_cache_ttl_secs: parse_var(&lookup, "PHIM_CATEGORY_CACHE_TTL_SECS")?
                .unwrap_or(defaults.category_cache_ttl_secs),
            cache_max_entries: parse_var(&lookup, "PHIM_CACHE_MAX_ENTRIES")?
                .unwrap_or(defaults.cache_max_entries),
            request_timeout_secs: parse_var(&lookup, "PHIM_REQUEST_TIMEOUT_SECS")?
                .unwrap_or(defaults.request_timeout_secs),
            requests_per_second: parse_var(&lookup, "PHIM_REQUESTS_PER_SECOND")?
                .unwrap_or(defaults.requests_per_second),
            request_burst: parse_var(&lookup, "PHIM_REQUEST_BURST")?
                .unwrap_or(defaults.request_burst),
            max_retries: parse_var(&lookup, "PHIM_MAX_RETRIES")?.unwrap_or(defaults.max_retries),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> AppResult<()> {
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(AppError::ConfigError(format!(
                "PHIM_API_BASE_URL must be an http(s) URL, got '{}'",
                self.api_base_url
            )));
        }
        if self.requests_per_second <= 0.0 {
            return Err(AppError::ConfigError(
                "PHIM_REQUESTS_PER_SECOND must be positive".to_string(),
            ));
        }
        if self.cache_max_entries == 0 {
            return Err(AppError::ConfigError(
                "PHIM_CACHE_MAX_ENTRIES must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn list_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.list_cache_ttl_secs)
    }

    pub fn category_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.category_cache_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> AppResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| AppError::ConfigError(format!("{} has invalid value '{}': {}", key, raw, e))),
        None => Ok(None),
    }
}
