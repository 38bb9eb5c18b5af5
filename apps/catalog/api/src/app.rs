//! Assembles the full HTTP application from the state.

use axum::Router;
use axum_helpers::server::{create_router, health_router};
use std::io;

use crate::{api, openapi::ApiDoc, state::AppState};

/// API routes under `/api` with docs and middleware, plus `/health` and
/// `/ready` at the root.
pub fn build_app(state: &AppState) -> io::Result<Router> {
    let router = create_router::<ApiDoc>(
        api::routes(state),
        state.config.environment,
        &state.config.server,
    )?;

    Ok(router
        .merge(health_router(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")))
        .merge(api::health::router(state.clone())))
}
