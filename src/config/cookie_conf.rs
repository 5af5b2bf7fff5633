use std::env;
use tracing::{debug, warn};

use crate::config::{parse_flag, ConfigError};

/// Browsers cap cookie lifetimes at 400 days.
pub const MAX_COOKIE_AGE_DAYS: i64 = 400;

/// Settings for the cookie that carries the login token
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub max_age_days: i64,
    pub secure: bool,
}

impl CookieConfig {
    /// Expected environment variables:
    /// - AUTH_COOKIE_NAME (defaults to "token")
    /// - AUTH_COOKIE_MAX_AGE_DAYS (defaults to 7)
    /// - AUTH_COOKIE_SECURE (defaults to false)
    pub fn from_env() -> Result<Self, ConfigError> {
        let name = env::var("AUTH_COOKIE_NAME").unwrap_or_else(|_| "token".to_string());

        let max_age_days = env::var("AUTH_COOKIE_MAX_AGE_DAYS")
            .unwrap_or_else(|_| {
                warn!("AUTH_COOKIE_MAX_AGE_DAYS not set, using default: 7 days");
                "7".to_string()
            })
            .parse::<i64>()
            .map_err(|e| ConfigError::InvalidValue(format!("AUTH_COOKIE_MAX_AGE_DAYS: {}", e)))?;

        let secure = match env::var("AUTH_COOKIE_SECURE") {
            Ok(raw) => parse_flag("AUTH_COOKIE_SECURE", &raw)?,
            Err(_) => false,
        };
        debug!(name = %name, max_age_days, secure, "Cookie configuration loaded");

        let config = CookieConfig { name, max_age_days, secure };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::ValidationError("Cookie name cannot be empty".to_string()));
        }
        if self.max_age_days <= 0 {
            return Err(ConfigError::ValidationError("Cookie max age must be greater than 0".to_string()));
        }
        if self.max_age_days > MAX_COOKIE_AGE_DAYS {
            return Err(ConfigError::ValidationError(format!(
                "Cookie max age cannot exceed {} days",
                MAX_COOKIE_AGE_DAYS
            )));
        }
        Ok(())
    }
}

impl Default for CookieConfig {
    fn default() -> Self {
        CookieConfig {
            name: "token".to_string(),
            max_age_days: 7,
            secure: false,
        }
    }
}
