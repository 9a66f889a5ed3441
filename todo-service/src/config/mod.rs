use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct TodoConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    /// How long in-flight requests may run after a shutdown signal.
    pub shutdown_grace_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

impl TodoConfig {
    pub fn load() -> Result<Self, AppError> {
        // Loads .env and the shared port
        let common_config = core_config::Config::load()?;

        Ok(TodoConfig {
            common: common_config,
            mongodb: MongoConfig {
                uri: get_env("MONGO_URI", "mongodb://localhost:27017"),
                database: get_env("MONGO_DB_NAME", "todoDB"),
            },
            shutdown_grace_secs: get_env("SHUTDOWN_GRACE_SECS", "15")
                .parse()
                .map_err(|e| {
                    AppError::ConfigError(anyhow::anyhow!("Invalid SHUTDOWN_GRACE_SECS: {}", e))
                })?,
        })
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

/// Unset and empty variables both fall back to `default`.
fn get_env(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(val) if !val.is_empty() => val,
        _ => default.to_string(),
    }
}
