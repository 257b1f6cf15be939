use std::time::Duration;

use tally_core::AppError;

/// Configuration for the database connection pool.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    /// Read configuration from environment variables.
    ///
    /// - `DATABASE_URL` (required)
    /// - `DATABASE_MAX_CONNECTIONS` (optional, defaults to 5)
    /// - `DATABASE_ACQUIRE_TIMEOUT_SECS` (optional, defaults to 10)
    pub fn from_env() -> Result<Self, AppError> {
        let url = std::env::var("DATABASE_URL").map_err(|_| {
            AppError::ConfigError("DATABASE_URL not set. Required for database operations.".into())
        })?;

        let max_connections = read_positive("DATABASE_MAX_CONNECTIONS", 5)?;
        let acquire_timeout_secs = read_positive("DATABASE_ACQUIRE_TIMEOUT_SECS", 10)?;

        Ok(Self {
            url,
            max_connections,
            acquire_timeout: Duration::from_secs(u64::from(acquire_timeout_secs)),
        })
    }
}

fn read_positive(var: &str, default: u32) -> Result<u32, AppError> {
    let Ok(raw) = std::env::var(var) else {
        return Ok(default);
    };
    match raw.parse::<u32>() {
        Ok(0) => Err(AppError::ConfigError(format!("{var} must be at least 1"))),
        Ok(parsed) => Ok(parsed),
        Err(_) => Err(AppError::ConfigError(format!(
            "Invalid {var} '{raw}': must be a positive integer"
        ))),
    }
}
