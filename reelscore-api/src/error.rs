//! Error Types for the Reelscore API
//!
//! This module defines error handling for the API layer:
//! - `ApiError` struct for structured error responses
//! - `ErrorCode` enum for categorizing errors
//! - `IntoResponse` implementation for Axum HTTP responses
//!
//! All errors are serialized as JSON with appropriate HTTP status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reelscore_core::{BatchRequestError, StoreError};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses.
///
/// Each code maps to a specific HTTP status and represents a category of
/// failure an endpoint can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================================================
    // Authentication Errors (401, 403, 429)
    // ========================================================================
    /// Request lacks a valid API key
    Unauthorized,

    /// Request is authenticated but lacks permission (admin required)
    Forbidden,

    /// API key exceeded its hourly request budget
    TooManyRequests,

    // ========================================================================
    // Validation Errors (400)
    // ========================================================================
    /// Request validation failed
    ValidationFailed,

    /// Request contains invalid input data
    InvalidInput,

    /// A field's format is incorrect (e.g. malformed IMDb id)
    InvalidFormat,

    // ========================================================================
    // Not Found Errors (404)
    // ========================================================================
    /// No Rotten Tomatoes record exists for the requested title
    MovieNotFound,

    /// Requested curated list or scrape target does not exist
    ListNotFound,

    /// Requested API key does not exist
    ApiKeyNotFound,

    // ========================================================================
    // Upstream Errors (502)
    // ========================================================================
    /// A remote dependency (Wikidata, Rotten Tomatoes) failed
    UpstreamFailed,

    // ========================================================================
    // Server Errors (500, 503)
    // ========================================================================
    /// Internal server error
    InternalError,

    /// Database operation failed
    DatabaseError,

    /// Service is temporarily unavailable
    ServiceUnavailable,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,

            ErrorCode::ValidationFailed | ErrorCode::InvalidInput | ErrorCode::InvalidFormat => {
                StatusCode::BAD_REQUEST
            }

            ErrorCode::MovieNotFound | ErrorCode::ListNotFound | ErrorCode::ApiKeyNotFound => {
                StatusCode::NOT_FOUND
            }

            ErrorCode::UpstreamFailed => StatusCode::BAD_GATEWAY,

            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            ErrorCode::InternalError | ErrorCode::DatabaseError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Structured error response returned by every endpoint on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ApiError {
    /// Error code categorizing the error
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    /// Create a new API error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    // ========================================================================
    // Convenience constructors
    // ========================================================================

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    pub fn too_many_requests() -> Self {
        Self::new(
            ErrorCode::TooManyRequests,
            "Rate limit exceeded. Please wait before making more requests.",
        )
    }

    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidFormat, message)
    }

    pub fn movie_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MovieNotFound, message)
    }

    pub fn list_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ListNotFound, message)
    }

    pub fn api_key_not_found(key_id: i64) -> Self {
        Self::new(ErrorCode::ApiKeyNotFound, format!("API key {} not found", key_id))
    }

    pub fn upstream_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UpstreamFailed, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    pub fn database_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// AXUM INTEGRATION
// ============================================================================

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self);
        (status, body).into_response()
    }
}

// ============================================================================
// CONVERSIONS FROM STANDARD ERRORS
// ============================================================================

/// Convert from tokio_postgres::Error to ApiError.
impl From<tokio_postgres::Error> for ApiError {
    fn from(err: tokio_postgres::Error) -> Self {
        tracing::error!("Database error: {:?}", err);

        // Generic message to avoid leaking internal details
        ApiError::database_error("Database operation failed")
    }
}

/// Convert from deadpool_postgres::PoolError to ApiError.
impl From<deadpool_postgres::PoolError> for ApiError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        tracing::error!("Connection pool error: {:?}", err);

        match err {
            deadpool_postgres::PoolError::Closed => {
                ApiError::service_unavailable("Database connection pool is closed")
            }
            _ => ApiError::database_error("Failed to acquire database connection"),
        }
    }
}

/// Convert from store errors surfaced through the pipeline.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        tracing::error!("Store error: {}", err);
        match err {
            StoreError::Unavailable { .. } => {
                ApiError::service_unavailable("Cache store unavailable")
            }
            _ => ApiError::database_error("Cache store operation failed"),
        }
    }
}

/// Convert request-level batch rejections into 400/5xx responses.
impl From<BatchRequestError> for ApiError {
    fn from(err: BatchRequestError) -> Self {
        match err {
            BatchRequestError::TooLarge { .. } => ApiError::validation_failed(err.to_string()),
            BatchRequestError::InvalidId(inner) => ApiError::invalid_format(inner.to_string()),
            BatchRequestError::Store(inner) => inner.into(),
        }
    }
}

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_status_mapping() {
        assert_eq!(ErrorCode::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorCode::TooManyRequests.status_code(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(ErrorCode::InvalidFormat.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::MovieNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::UpstreamFailed.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(ErrorCode::DatabaseError.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ErrorCode::ServiceUnavailable.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_batch_rejections_map_to_bad_request() {
        let err: ApiError = BatchRequestError::TooLarge { len: 51, max: 50 }.into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.message.contains("51"));

        let parse_err = reelscore_core::TitleId::parse("bogus").unwrap_err();
        let err: ApiError = BatchRequestError::InvalidId(parse_err).into();
        assert_eq!(err.code, ErrorCode::InvalidFormat);
        assert!(err.message.contains("bogus"));
    }

    #[test]
    fn test_error_serialization() {
        let err = ApiError::unauthorized("Invalid or inactive API key");
        let json = serde_json::to_string(&err).unwrap();

        assert!(json.contains("UNAUTHORIZED"));
        assert!(json.contains("Invalid or inactive API key"));
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::database_error("Connection failed");
        let display = format!("{}", err);

        assert!(display.contains("DatabaseError"));
        assert!(display.contains("Connection failed"));
    }
}
