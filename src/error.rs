use serde::Deserialize;
use thiserror::Error;

use crate::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The backend rejected the bearer token; callers drop the session.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The backend could not be reached at all.
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    #[error("Failed to decode backend response: {0}")]
    Decode(String),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Please login first")]
    NotAuthenticated,

    #[error("You are already enrolled in {0}")]
    AlreadyEnrolled(String),

    #[error("A request is already in flight")]
    Busy,

    #[error("Attachment rejected: {0}")]
    Attachment(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// FastAPI-style error body. `detail` is a string for handled errors and a
/// list of objects for request validation failures.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

impl AppError {
    /// Classifies a non-2xx response, preferring the server's `detail` text.
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.detail)
            .and_then(|d| match d {
                serde_json::Value::String(s) if !s.is_empty() => Some(s),
                serde_json::Value::Null => None,
                other => Some(other.to_string()),
            });

        let message = detail.unwrap_or_else(|| format!("HTTP error! status: {}", status));

        if status == 401 {
            AppError::Unauthorized(message)
        } else {
            AppError::Api { status, message }
        }
    }

    /// True when the failure means "server unreachable" rather than "server said no".
    pub fn is_connectivity(&self) -> bool {
        matches!(self, AppError::Unreachable(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::Unauthorized(_))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Decode(err.to_string())
        } else if err.is_builder() {
            AppError::Config(format!("Failed to build request: {}", err))
        } else if let Some(status) = err.status() {
            AppError::from_status(status.as_u16(), "")
        } else {
            AppError::Unreachable(err.to_string())
        }
    }
}
