//! Products domain: the catalog's only resource.
//!
//! ## Architecture
//!
//! ```text
//! handlers (axum)  ->  ProductService  ->  ProductRepository::begin()
//!                          |                      |
//!                   validation, factory     ProductUnitOfWork
//!                                          (in-memory | PostgreSQL)
//! ```
//!
//! Every service operation takes a [`CancellationToken`](tokio_util::sync::CancellationToken)
//! and runs in one unit of work that is committed at the end or dropped on
//! the first failure.

pub mod entity;
pub mod error;
pub mod factory;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod validation;

pub use error::{ProductError, ProductResult};
pub use factory::{InvalidArgument, ProductFactory};
pub use handlers::{ApiDoc, BASE_PATH};
pub use models::{CreateProduct, NewProduct, Patch, PatchProduct, Product, ProductView, ReplaceProduct};
pub use postgres::PgProductRepository;
pub use repository::{InMemoryProductRepository, ProductRepository, ProductUnitOfWork};
pub use service::ProductService;
