//! # Error Handling
//!
//! This module defines the application's error type and how each variant is
//! converted into an HTTP response.
//!
//! ## Error Categories:
//! - **Io**: Filesystem failures in the audio pipeline (500 errors)
//! - **Database**: Query or connection failures on the items table (500 errors)
//! - **Audio**: Container framing failures (500 errors)
//! - **Internal**: Any other server-side problem (500 errors)
//! - **BadRequest / ValidationError**: Client sent invalid data (400 errors)
//! - **NotFound**: Requested resource doesn't exist (404 errors)
//! - **ConfigError**: Configuration problems (500 errors)
//!
//! ## JSON Response Format:
//! All errors surfaced through `ResponseError` share one envelope:
//! ```json
//! {
//!   "error": {
//!     "type": "io_error",
//!     "message": "No such file or directory",
//!     "timestamp": "2025-01-01T12:00:00Z"
//!   }
//! }
//! ```
//! The recording endpoint and the item lookup build their own response
//! bodies instead (the device firmware expects a fixed shape there), so
//! they match on errors rather than bubbling them through this impl.

use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use std::fmt;

/// Custom error types for the application.
#[derive(Debug)]
pub enum AppError {
    /// Internal server errors that fit no other category
    Internal(String),

    /// Client sent invalid or malformed data
    BadRequest(String),

    /// Requested resource was not found
    NotFound(String),

    /// Configuration file or environment variable problems
    ConfigError(String),

    /// User input failed validation rules
    ValidationError(String),

    /// Filesystem failures (directory create, blob read/write, delete)
    Io(String),

    /// Database failures on the items table
    Database(String),

    /// WAV container framing failures
    Audio(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::Io(msg) => write!(f, "I/O error: {}", msg),
            AppError::Database(msg) => write!(f, "Database error: {}", msg),
            AppError::Audio(msg) => write!(f, "Audio error: {}", msg),
        }
    }
}

/// Converts errors into the shared JSON error envelope.
///
/// ## HTTP Status Code Mapping:
/// - Internal/ConfigError/Io/Database/Audio → 500 (Internal Server Error)
/// - BadRequest/ValidationError → 400 (Bad Request)
/// - NotFound → 404 (Not Found)
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status, error_type, message) = match self {
            AppError::Internal(msg) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                msg.clone(),
            ),
            AppError::BadRequest(msg) => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "bad_request",
                msg.clone(),
            ),
            AppError::NotFound(msg) => (
                actix_web::http::StatusCode::NOT_FOUND,
                "not_found",
                msg.clone(),
            ),
            AppError::ConfigError(msg) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "config_error",
                msg.clone(),
            ),
            AppError::ValidationError(msg) => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "validation_error",
                msg.clone(),
            ),
            AppError::Io(msg) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                msg.clone(),
            ),
            AppError::Database(msg) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "database_error",
                msg.clone(),
            ),
            AppError::Audio(msg) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "audio_error",
                msg.clone(),
            ),
        };

        HttpResponse::build(status).json(json!({
            "error": {
                "type": error_type,
                "message": message,
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        }))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<hound::Error> for AppError {
    fn from(err: hound::Error) -> Self {
        AppError::Audio(err.to_string())
    }
}

/// JSON parsing errors are client mistakes, not server faults.
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(format!("JSON parsing error: {}", err))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

/// Shorthand for `Result<T, AppError>`.
pub type AppResult<T> = Result<T, AppError>;
