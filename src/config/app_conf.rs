use std::env;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::config::ConfigError;

pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for a single store call made by the service, in seconds
    pub store_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);

        let store_timeout_secs = env::var("STORE_OPERATION_TIMEOUT_SECS")
            .unwrap_or_else(|_| {
                warn!("STORE_OPERATION_TIMEOUT_SECS not set, using default: 10 seconds");
                "10".to_string()
            })
            .parse::<u64>()
            .map_err(|e| {
                error!("Invalid STORE_OPERATION_TIMEOUT_SECS value: {}", e);
                ConfigError::InvalidValue(format!("STORE_OPERATION_TIMEOUT_SECS: {}", e))
            })?;
        debug!("Store operation timeout: {} seconds", store_timeout_secs);

        let config = AppConfig { host, port, store_timeout_secs };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::ValidationError("APP_HOST cannot be empty".to_string()));
        }
        if self.store_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "STORE_OPERATION_TIMEOUT_SECS must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            store_timeout_secs: 10,
        }
    }
}
