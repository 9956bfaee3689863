use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::AppError;

/// Installs the global subscriber. `RUST_LOG` takes precedence over the
/// configured level.
pub fn init_logging(logging: &LoggingConfig) -> Result<(), AppError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .map_err(|e| AppError::Internal(format!("Invalid log level {:?}: {}", logging.level, e)))?;

    let formatting_layer = match logging.format.as_str() {
        "json" => fmt::layer().json().with_current_span(false).boxed(),
        "compact" => fmt::layer().compact().boxed(),
        _ => fmt::layer().pretty().boxed(),
    };

    registry()
        .with(env_filter)
        .with(formatting_layer)
        .try_init()
        .map_err(|e| AppError::Internal(format!("Failed to initialize logging: {}", e)))?;

    Ok(())
}
