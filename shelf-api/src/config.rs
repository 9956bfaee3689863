use serde::Deserialize;
use std::env;
use std::path::Path;

use crate::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    /// Defaults, then `$CONFIG_PATH/default.toml` if present, then `APP_*`
    /// variables (`APP_SERVER__PORT`, `APP_DATABASE__URL`), then the plain
    /// `PORT` and `DATABASE_URL`.
    pub fn load() -> Result<Self, AppError> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config".to_string());

        Self::load_from(
            &config_path,
            env::var("PORT").ok(),
            env::var("DATABASE_URL").ok(),
        )
    }

    fn load_from(
        config_path: &str,
        port: Option<String>,
        database_url: Option<String>,
    ) -> Result<Self, AppError> {
        let builder = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("database.max_connections", 10)?
            .set_default("database.acquire_timeout_secs", 30)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(
                config::File::from(Path::new(config_path).join("default")).required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", port)?
            .set_override_option("database.url", database_url)?;

        let config = builder.build()?;
        let config: Config = config.try_deserialize()?;

        Ok(config)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
