use axum::response::{IntoResponse, Response};

use super::{ErrorCode, ProblemDetails};

/// Router fallback for unknown paths.
pub async fn not_found() -> Response {
    ProblemDetails::new(
        ErrorCode::NotFound,
        "The requested resource was not found",
    )
    .into_response()
}
