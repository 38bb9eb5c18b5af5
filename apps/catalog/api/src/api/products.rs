//! Products API routes
//!
//! Wires the products domain to whichever store the state carries.

use axum::Router;
use domain_products::{PgProductRepository, ProductService, handlers};

use crate::state::{AppState, ProductStore};

/// Create products router
pub fn router(state: &AppState) -> Router {
    match &state.store {
        ProductStore::Postgres(db) => {
            handlers::router(ProductService::new(PgProductRepository::new(db.clone())))
        }
        ProductStore::Memory(repository) => handlers::router(ProductService::new(repository.clone())),
    }
}
