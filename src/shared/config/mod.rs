mod app_config;

pub use app_config::{AppConfig, DEFAULT_API_BASE_URL, DEFAULT_PLAYER_URL};
