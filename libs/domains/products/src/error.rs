use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, FieldErrors, field_errors};
use sea_orm::DbErr;
use thiserror::Error;
use validator::ValidationErrors;

use crate::factory::InvalidArgument;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product with ID '{0}' was not found")]
    NotFound(i32),

    #[error("Validation failed for {}", .0.keys().cloned().collect::<Vec<_>>().join(", "))]
    Validation(FieldErrors),

    /// No uniqueness rule exists yet; reserved for one.
    #[error("Product with {field} '{value}' already exists")]
    Duplicate { field: &'static str, value: String },

    #[error("Operation was cancelled")]
    Cancelled,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl ProductError {
    /// Single-field validation failure.
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.into()]);
        ProductError::Validation(errors)
    }

    /// NotFound, Validation and Duplicate; everything else is internal.
    pub fn is_business(&self) -> bool {
        matches!(
            self,
            ProductError::NotFound(_) | ProductError::Validation(_) | ProductError::Duplicate { .. }
        )
    }
}

impl From<DbErr> for ProductError {
    fn from(err: DbErr) -> Self {
        ProductError::Database(err.to_string())
    }
}

impl From<ValidationErrors> for ProductError {
    fn from(errors: ValidationErrors) -> Self {
        ProductError::Validation(field_errors(&errors))
    }
}

impl From<InvalidArgument> for ProductError {
    fn from(err: InvalidArgument) -> Self {
        ProductError::validation(err.field, err.message)
    }
}

/// Convert ProductError to AppError for standardized error responses
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(_) => AppError::NotFound(err.to_string()),
            ProductError::Validation(fields) => AppError::Validation(fields),
            ProductError::Duplicate { .. } => AppError::Duplicate(err.to_string()),
            ProductError::Cancelled => AppError::ServiceUnavailable(err.to_string()),
            ProductError::Database(msg) => AppError::InternalServerError(format!("Database error: {}", msg)),
            ProductError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
