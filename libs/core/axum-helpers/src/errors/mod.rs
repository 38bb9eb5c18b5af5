pub mod codes;
pub mod handlers;
pub mod problem;
pub mod responses;

pub use codes::ErrorCode;
pub use problem::{FieldErrors, InternalErrorDetail, ProblemDetails};

use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use thiserror::Error;
use validator::ValidationErrors;

/// Application error type that can be converted to HTTP responses.
///
/// Every variant renders as a [`ProblemDetails`] document. Internal variants
/// render a generic detail and stash the real one in an
/// [`InternalErrorDetail`] response extension.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(FieldErrors),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(field_errors(&errors))
    }
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::JsonExtractorRejection(_) => ErrorCode::JsonExtraction,
            AppError::InvalidId(_) => ErrorCode::InvalidId,
            AppError::Validation(_) => ErrorCode::ValidationError,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::Duplicate(_) => ErrorCode::Duplicate,
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::InternalServerError(_) => ErrorCode::InternalError,
            AppError::ServiceUnavailable(_) => ErrorCode::ServiceUnavailable,
        }
    }

    fn exception_type(&self) -> &'static str {
        match self {
            AppError::JsonExtractorRejection(_) => "JsonRejection",
            AppError::InvalidId(_) => "InvalidId",
            AppError::Validation(_) => "Validation",
            AppError::NotFound(_) => "NotFound",
            AppError::Duplicate(_) => "Duplicate",
            AppError::Database(_) => "DbErr",
            AppError::InternalServerError(_) => "InternalServerError",
            AppError::ServiceUnavailable(_) => "ServiceUnavailable",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();

        let problem = match &self {
            AppError::JsonExtractorRejection(rejection) => {
                tracing::debug!(error_code = code.code(), "JSON extraction error: {:?}", rejection);
                // Missing content type and friends keep their own status (415, 422)
                let mut problem = ProblemDetails::new(code, rejection.body_text());
                problem.status = rejection.status().as_u16();
                problem.type_url = format!("https://httpstatuses.com/{}", problem.status);
                problem
            }
            AppError::InvalidId(msg) => ProblemDetails::new(code, msg.clone()),
            AppError::Validation(errors) => {
                tracing::debug!(error_code = code.code(), fields = ?errors.keys().collect::<Vec<_>>(), "Validation error");
                ProblemDetails::from_code(code).with_errors(errors.clone())
            }
            AppError::NotFound(msg) | AppError::Duplicate(msg) => {
                ProblemDetails::new(code, msg.clone())
            }
            AppError::Database(_)
            | AppError::InternalServerError(_)
            | AppError::ServiceUnavailable(_) => {
                tracing::error!(error_code = code.code(), error = %self, "Request failed with internal error");
                ProblemDetails::from_code(code)
            }
        };

        let mut response = problem.into_response();
        if code.is_internal() {
            response.extensions_mut().insert(InternalErrorDetail {
                exception_type: self.exception_type(),
                message: self.to_string(),
            });
        }
        response
    }
}

/// Flatten `validator` errors into a field → messages map.
///
/// Errors without a message fall back to their code.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}
