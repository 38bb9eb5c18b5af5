//! Reusable OpenAPI response types for consistent API documentation.

use super::ProblemDetails;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/problem+json",
    example = json!({
        "type": "https://httpstatuses.com/500",
        "title": "Internal server error",
        "status": 500,
        "detail": "An unexpected error occurred.",
        "instance": "/api/products",
        "errorCode": "INTERNAL_ERROR",
        "code": 1005,
        "traceId": "01930f7e-5c1b-7a53-9d7e-2f0c8a4e6b11"
    })
)]
pub struct InternalServerErrorResponse(pub ProblemDetails);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Validation Error",
    content_type = "application/problem+json",
    example = json!({
        "type": "https://httpstatuses.com/400",
        "title": "Validation error",
        "status": 400,
        "detail": "One or more validation errors occurred.",
        "instance": "/api/products",
        "errorCode": "VALIDATION_ERROR",
        "code": 1001,
        "traceId": "01930f7e-5c1b-7a53-9d7e-2f0c8a4e6b11",
        "errors": {
            "name": ["Name must be between 3 and 100 characters."],
            "price": ["Price must be greater than zero."]
        }
    })
)]
pub struct BadRequestValidationResponse(pub ProblemDetails);

#[derive(ToResponse)]
#[response(
    description = "Bad Request - Invalid identifier",
    content_type = "application/problem+json",
    example = json!({
        "type": "https://httpstatuses.com/400",
        "title": "Invalid identifier",
        "status": 400,
        "detail": "Invalid id 'abc': expected an integer",
        "instance": "/api/products/abc",
        "errorCode": "INVALID_ID",
        "code": 1002,
        "traceId": "01930f7e-5c1b-7a53-9d7e-2f0c8a4e6b11"
    })
)]
pub struct BadRequestIdResponse(pub ProblemDetails);

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/problem+json",
    example = json!({
        "type": "https://httpstatuses.com/404",
        "title": "Resource not found",
        "status": 404,
        "detail": "Product with ID '42' was not found",
        "instance": "/api/products/42",
        "errorCode": "NOT_FOUND",
        "code": 1004,
        "traceId": "01930f7e-5c1b-7a53-9d7e-2f0c8a4e6b11"
    })
)]
pub struct NotFoundResponse(pub ProblemDetails);

#[derive(ToResponse)]
#[response(
    description = "Conflict - Resource already exists",
    content_type = "application/problem+json",
    example = json!({
        "type": "https://httpstatuses.com/409",
        "title": "Duplicate resource",
        "status": 409,
        "detail": "Product with name 'Widget' already exists",
        "errorCode": "DUPLICATE",
        "code": 1008
    })
)]
pub struct ConflictResponse(pub ProblemDetails);

#[derive(ToResponse)]
#[response(
    description = "Service Unavailable",
    content_type = "application/problem+json",
    example = json!({
        "type": "https://httpstatuses.com/503",
        "title": "Service unavailable",
        "status": 503,
        "detail": "Service is temporarily unavailable.",
        "errorCode": "SERVICE_UNAVAILABLE",
        "code": 1011
    })
)]
pub struct ServiceUnavailableResponse(pub ProblemDetails);
