//! HTTP middleware module.
//!
//! - Problem-details enrichment (instance, trace id, dev-mode detail)
//! - CORS configuration
//! - Security headers
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::http::{problem_details, security_headers};
//!
//! let app = Router::new()
//!     .layer(axum::middleware::from_fn_with_state(environment, problem_details))
//!     .layer(axum::middleware::from_fn(security_headers));
//! ```

pub mod cors;
pub mod problem_details;
pub mod security;

pub use cors::{cors_layer_from_env, create_cors_layer, create_permissive_cors_layer};
pub use problem_details::{REQUEST_ID_HEADER, problem_details};
pub use security::security_headers;
