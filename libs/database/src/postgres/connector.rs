use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::{info, warn};

use super::PostgresConfig;
use crate::common::{DatabaseError, RetryConfig, retry_with_backoff};

async fn connect_with_options(options: ConnectOptions) -> Result<DatabaseConnection, DbErr> {
    Database::connect(options).await
}

/// Single connection attempt.
pub async fn connect_from_config(config: PostgresConfig) -> Result<DatabaseConnection, DbErr> {
    let target = config.redacted_url();
    let db = connect_with_options(config.into_connect_options()).await?;
    info!("Connected to PostgreSQL at {}", target);
    Ok(db)
}

/// Connect with exponential backoff; used at startup where the database may
/// still be coming up.
pub async fn connect_from_config_with_retry(
    config: PostgresConfig,
    retry: RetryConfig,
) -> Result<DatabaseConnection, DatabaseError> {
    let target = config.redacted_url();
    let attempts = retry.attempts();
    let options = config.into_connect_options();

    let db = retry_with_backoff(|| connect_with_options(options.clone()), retry)
        .await
        .map_err(|source| DatabaseError::ConnectionFailed { attempts, source })?;

    info!("Connected to PostgreSQL at {}", target);
    Ok(db)
}

/// Apply every pending migration of `M`.
///
/// ```ignore
/// run_migrations::<migration::Migrator>(&db, "catalog").await?;
/// ```
pub async fn run_migrations<M: MigratorTrait>(
    db: &DatabaseConnection,
    app_name: &str,
) -> Result<(), DatabaseError> {
    info!("Running {} database migrations...", app_name);
    M::up(db, None)
        .await
        .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
    info!("Migrations completed successfully for {}", app_name);
    Ok(())
}

/// Close the pool; failures are logged, shutdown continues.
pub async fn close(db: DatabaseConnection) {
    match db.close().await {
        Ok(()) => info!("PostgreSQL pool closed"),
        Err(e) => warn!("Failed to close PostgreSQL pool: {}", e),
    }
}
