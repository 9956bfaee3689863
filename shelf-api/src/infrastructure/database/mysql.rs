use std::time::Duration;

use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;

use crate::config::Config;
use crate::error::AppError;

pub async fn init_mysql(config: &Config) -> Result<MySqlPool, AppError> {
    tracing::info!("Initializing MySQL connection pool");

    // connect() 会立即建立一个连接，失败时在这里就能发现
    let pool = MySqlPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
        .connect(&config.database.url)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "MySQL connection error"))?;

    tracing::info!("Successfully connected to MySQL");

    Ok(pool)
}
