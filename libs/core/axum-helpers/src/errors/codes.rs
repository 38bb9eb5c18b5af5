//! Type-safe error codes for API responses.
//!
//! Every problem response carries one of these codes twice: as the
//! SCREAMING_SNAKE `errorCode` string clients branch on, and as the integer
//! `code` used in logs and dashboards. The HTTP status and title of a problem
//! are looked up here as well, so handlers never pick a status by hand.
//!
//! # Example
//!
//! ```rust
//! use axum::http::StatusCode;
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::ValidationError;
//! assert_eq!(code.as_str(), "VALIDATION_ERROR");
//! assert_eq!(code.code(), 1001);
//! assert_eq!(code.status(), StatusCode::BAD_REQUEST);
//! ```

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// One or more fields failed validation
    ValidationError,

    /// Path identifier is not an integer
    InvalidId,

    /// JSON body could not be extracted
    JsonExtraction,

    /// Requested resource was not found
    NotFound,

    /// Resource with the same unique value already exists
    Duplicate,

    /// Route exists but not for this method
    MethodNotAllowed,

    /// Request did not finish within the configured timeout
    RequestTimeout,

    // Server errors
    /// An unexpected internal server error occurred
    InternalError,

    /// Service is temporarily unavailable (including cancelled work)
    ServiceUnavailable,

    // Database errors (2000-2999)
    /// Storage layer failure
    DatabaseError,
}

impl ErrorCode {
    /// String representation for client consumption.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidId => "INVALID_ID",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::Duplicate => "DUPLICATE",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::RequestTimeout => "REQUEST_TIMEOUT",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::DatabaseError => "DATABASE_ERROR",
        }
    }

    /// Integer code for logging and monitoring.
    ///
    /// - 1000-1999: request and service errors
    /// - 2000-2999: storage errors
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidId => 1002,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::Duplicate => 1008,
            Self::ServiceUnavailable => 1011,
            Self::MethodNotAllowed => 1012,
            Self::RequestTimeout => 1013,
            Self::DatabaseError => 2003,
        }
    }

    /// HTTP status the code is rendered with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ValidationError | Self::InvalidId | Self::JsonExtraction => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Duplicate => StatusCode::CONFLICT,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            Self::InternalError | Self::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Short, stable problem title.
    pub fn title(&self) -> &'static str {
        match self {
            Self::ValidationError => "Validation error",
            Self::InvalidId => "Invalid identifier",
            Self::JsonExtraction => "Malformed request body",
            Self::NotFound => "Resource not found",
            Self::Duplicate => "Duplicate resource",
            Self::MethodNotAllowed => "Method not allowed",
            Self::RequestTimeout => "Request timeout",
            Self::InternalError | Self::DatabaseError => "Internal server error",
            Self::ServiceUnavailable => "Service unavailable",
        }
    }

    /// Default detail text; handlers override it with something specific
    /// whenever the detail is safe to show.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "One or more validation errors occurred.",
            Self::InvalidId => "The identifier in the request path is not valid.",
            Self::JsonExtraction => "Failed to parse request body.",
            Self::NotFound => "The requested resource was not found.",
            Self::Duplicate => "Resource already exists.",
            Self::MethodNotAllowed => "The HTTP method is not allowed for this resource.",
            Self::RequestTimeout => "The request took too long to complete.",
            Self::InternalError => "An unexpected error occurred.",
            Self::ServiceUnavailable => "Service is temporarily unavailable.",
            Self::DatabaseError => "A database error occurred.",
        }
    }

    /// Best-effort code for a bare error status produced outside the handlers
    /// (router fallbacks, timeouts).
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::METHOD_NOT_ALLOWED => Self::MethodNotAllowed,
            StatusCode::REQUEST_TIMEOUT => Self::RequestTimeout,
            StatusCode::SERVICE_UNAVAILABLE => Self::ServiceUnavailable,
            StatusCode::CONFLICT => Self::Duplicate,
            s if s.is_client_error() => Self::JsonExtraction,
            _ => Self::InternalError,
        }
    }

    /// Server-side failures whose details stay private outside development.
    pub fn is_internal(&self) -> bool {
        self.status().is_server_error()
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
