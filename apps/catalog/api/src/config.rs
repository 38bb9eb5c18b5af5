use core_config::{ConfigError, FromEnv, env_parse, server::ServerConfig};
use database::postgres::PostgresConfig;
use strum::{Display, EnumString};

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Which product store backs the API, read from `PRODUCT_STORE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: Environment,
    pub server: ServerConfig,
    pub store: StoreBackend,
    /// Present exactly when `store` is `Postgres`
    pub database: Option<PostgresConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let store: StoreBackend = env_parse("PRODUCT_STORE", "postgres")?;

        let database = match store {
            StoreBackend::Postgres => Some(PostgresConfig::from_env()?),
            StoreBackend::Memory => None,
        };

        Ok(Self {
            environment,
            server,
            store,
            database,
        })
    }
}
