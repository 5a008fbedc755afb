use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum AppError {
    /// Network failure or non-2xx HTTP status from the catalog API
    #[error("Transport error: {message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// The API answered but reported failure through its own status field
    #[error("API error: {0}")]
    ApiError(String),

    /// The response did not match any recognized envelope
    #[error("Unexpected response shape: {0}")]
    ShapeError(String),

    /// Durable storage read/write failure; never fatal for callers
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    pub fn http_status(status: u16) -> Self {
        AppError::Transport {
            status: Some(status),
            message: format!("HTTP error! status: {}", status),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        AppError::Transport {
            status: None,
            message: message.into(),
        }
    }

    /// HTTP status carried by a transport failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Transport { status, .. } => *status,
            _ => None,
        }
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, AppError::StorageError(_))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::network("Request timeout")
        } else if err.is_connect() {
            AppError::network("Failed to connect to catalog API")
        } else if let Some(status) = err.status() {
            AppError::http_status(status.as_u16())
        } else if err.is_decode() {
            AppError::ShapeError(format!("Response body is not valid JSON: {}", err))
        } else {
            AppError::network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::StorageError(err.to_string())
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(err: std::num::ParseIntError) -> Self {
        AppError::ConfigError(format!("Invalid number: {}", err))
    }
}

impl From<std::num::ParseFloatError> for AppError {
    fn from(err: std::num::ParseFloatError) -> Self {
        AppError::ConfigError(format!("Invalid decimal number: {}", err))
    }
}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_keeps_code_and_message() {
        let err = AppError::http_status(404);
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "Transport error: HTTP error! status: 404");
    }

    #[test]
    fn network_error_has_no_status() {
        let err = AppError::network("connection reset");
        assert_eq!(err.status(), None);
        assert!(!err.is_storage());
    }

    #[test]
    fn io_errors_map_to_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: AppError = io.into();
        assert!(err.is_storage());
    }

    #[test]
    fn shape_error_message() {
        let err = AppError::ShapeError("missing data.items".to_string());
        assert_eq!(err.to_string(), "Unexpected response shape: missing data.items");
    }
}
