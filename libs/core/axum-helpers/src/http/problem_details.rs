//! Finishes error responses on their way out.
//!
//! Handlers and extractors render a [`ProblemDetails`] without knowing the
//! request. This middleware fills `instance` and `traceId`, decides whether
//! internal detail may be shown, turns bare framework errors (405, 408, ...)
//! into problem documents and writes one log line per failed request.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use core_config::Environment;
use uuid::Uuid;

use crate::errors::{ErrorCode, InternalErrorDetail, ProblemDetails, problem::PROBLEM_JSON};

/// Correlation header read from the request and echoed on the response.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Problem-details middleware, mounted with
/// `axum::middleware::from_fn_with_state(environment, problem_details)`.
pub async fn problem_details(
    State(environment): State<Environment>,
    request: Request,
    next: Next,
) -> Response {
    let trace_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| Uuid::now_v7().to_string());
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&trace_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let problem = match response.extensions_mut().remove::<ProblemDetails>() {
        Some(problem) => Some(problem),
        // Framework responses without a body (405 from the router, 408 from the timeout layer)
        None if !response.headers().contains_key(header::CONTENT_TYPE) => {
            let code = ErrorCode::from_status(status);
            let mut problem = ProblemDetails::from_code(code);
            problem.status = status.as_u16();
            problem.type_url = format!("https://httpstatuses.com/{}", status.as_u16());
            Some(problem)
        }
        None => None,
    };

    let internal = response.extensions_mut().remove::<InternalErrorDetail>();

    if status.is_server_error() {
        tracing::error!(
            %method,
            %path,
            status = status.as_u16(),
            trace_id = %trace_id,
            detail = internal.as_ref().map(|d| d.message.as_str()),
            "Request failed"
        );
    } else {
        tracing::warn!(
            %method,
            %path,
            status = status.as_u16(),
            trace_id = %trace_id,
            "Request rejected"
        );
    }

    let Some(mut problem) = problem else {
        return response;
    };

    problem.instance = Some(path);
    problem.trace_id = Some(trace_id);
    if environment.exposes_internal_errors() {
        if let Some(internal) = internal {
            problem.detail = internal.message;
            problem.exception_type = Some(internal.exception_type.to_string());
        }
    }

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts
        .headers
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(PROBLEM_JSON));
    let body: Body = problem.to_body();
    Response::from_parts(parts, body).into_response()
}
