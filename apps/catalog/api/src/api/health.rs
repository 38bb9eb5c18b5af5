//! Readiness endpoint

use axum::{Router, extract::State, response::IntoResponse, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};

use crate::state::{AppState, ProductStore};

/// Create the readiness router (`GET /ready`)
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(state)
}

/// Readiness check - verifies the product store is reachable
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let name = match &state.store {
        ProductStore::Postgres(_) => "database",
        ProductStore::Memory(_) => "store",
    };
    let check: HealthCheckFuture<'_> = match &state.store {
        ProductStore::Postgres(db) => Box::pin(async move {
            database::postgres::check_health(db)
                .await
                .map_err(|e| e.to_string())
        }),
        ProductStore::Memory(_) => Box::pin(async { Ok(()) }),
    };

    run_health_checks(vec![(name, check)]).await
}
