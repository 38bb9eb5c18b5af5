//! Application state management.
//!
//! The state holds the configuration and the product store chosen at
//! startup. Cloning is cheap: both stores share their data behind handles.

use database::postgres::DatabaseConnection;
use domain_products::InMemoryProductRepository;

use crate::config::Config;

/// The product store selected by `PRODUCT_STORE`.
#[derive(Clone)]
pub enum ProductStore {
    Postgres(DatabaseConnection),
    Memory(InMemoryProductRepository),
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: Config,
    pub store: ProductStore,
}
