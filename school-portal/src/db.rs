use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::error::{PortalError, PortalResult};

/// Runtime settings, read from the environment.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub database_url: String,
}

impl PortalConfig {
    pub fn from_env() -> PortalResult<Self> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| PortalError::MissingConfiguration {
                component: "database",
                required: "DATABASE_URL",
            })?;
        Ok(PortalConfig { database_url })
    }
}

/// Open a connection with SQLx statement logging routed to `log` at debug.
pub async fn connect(config: &PortalConfig) -> PortalResult<DatabaseConnection> {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);
    Ok(Database::connect(options).await?)
}

/// Initialise env_logger once; repeat calls are no-ops. Honours `RUST_LOG`,
/// defaulting to `info`.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
