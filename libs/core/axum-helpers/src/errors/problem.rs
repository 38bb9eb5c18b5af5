//! RFC 7807 problem documents.

use std::collections::BTreeMap;

use axum::{
    body::Body,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ErrorCode;

pub const PROBLEM_JSON: &str = "application/problem+json";

/// Field name → every message that field failed with.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Body of every error response.
///
/// `instance` and `traceId` are filled in by the
/// [`problem_details`](crate::http::problem_details) middleware, which knows
/// the request; handlers only decide the code, detail and field errors.
///
/// ```json
/// {
///   "type": "https://httpstatuses.com/404",
///   "title": "Resource not found",
///   "status": 404,
///   "detail": "Product with ID '7' was not found",
///   "instance": "/api/products/7",
///   "errorCode": "NOT_FOUND",
///   "code": 1004,
///   "traceId": "01930f7e-..."
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_url: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    pub error_code: ErrorCode,
    /// Integer form of `errorCode`
    pub code: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
    /// Only present on 5xx responses in development mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception_type: Option<String>,
}

impl ProblemDetails {
    pub fn new(error_code: ErrorCode, detail: impl Into<String>) -> Self {
        let status = error_code.status();
        Self {
            type_url: format!("https://httpstatuses.com/{}", status.as_u16()),
            title: error_code.title().to_string(),
            status: status.as_u16(),
            detail: detail.into(),
            instance: None,
            error_code,
            code: error_code.code(),
            trace_id: None,
            errors: None,
            exception_type: None,
        }
    }

    /// Problem with the code's default detail text.
    pub fn from_code(error_code: ErrorCode) -> Self {
        Self::new(error_code, error_code.default_message())
    }

    pub fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Rendered status; a status outside the valid range degrades to 500.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Serialized document; serialization of these plain fields does not fail
    /// in practice, an empty body is sent if it ever does.
    pub fn to_body(&self) -> Body {
        match serde_json::to_vec(self) {
            Ok(bytes) => Body::from(bytes),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize problem details");
                Body::empty()
            }
        }
    }
}

/// What actually went wrong behind a 5xx problem. Travels in the response
/// extensions and is only copied into the body in development mode.
#[derive(Debug, Clone)]
pub struct InternalErrorDetail {
    pub exception_type: &'static str,
    pub message: String,
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let mut response = Response::new(self.to_body());
        *response.status_mut() = self.status_code();
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(PROBLEM_JSON));
        response.extensions_mut().insert(self);
        response
    }
}
