//! PostgreSQL connection management for the catalog services.
//!
//! - Pool configuration loaded from the environment ([`postgres::PostgresConfig`])
//! - Connecting with exponential backoff, so startup survives a database
//!   that is still booting
//! - Running a crate's SeaORM migrations
//! - A `SELECT 1` readiness probe
//!
//! # Example
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::{RetryConfig, postgres};
//! use migration::Migrator;
//!
//! let config = postgres::PostgresConfig::from_env()?;
//! let db = postgres::connect_from_config_with_retry(config, RetryConfig::default()).await?;
//! postgres::run_migrations::<Migrator>(&db, "catalog").await?;
//! postgres::check_health(&db).await?;
//! ```

pub mod common;
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult, RetryConfig, retry_with_backoff};
