pub mod app_conf;
pub mod cookie_conf;
pub mod jwt_conf;
pub mod mongo_conf;

pub use app_conf::AppConfig;
pub use cookie_conf::CookieConfig;
pub use jwt_conf::JwtConfig;
pub use mongo_conf::MongoConfig;

/// Common configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Reads a boolean flag, accepting the usual spellings.
pub(crate) fn parse_flag(name: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue(format!("{}: '{}' is not a boolean", name, other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag_accepts_common_spellings() {
        assert!(parse_flag("X", "true").unwrap());
        assert!(parse_flag("X", " YES ").unwrap());
        assert!(parse_flag("X", "1").unwrap());
        assert!(!parse_flag("X", "off").unwrap());
        assert!(!parse_flag("X", "False").unwrap());
    }

    #[test]
    fn test_parse_flag_rejects_garbage() {
        assert!(matches!(parse_flag("X", "maybe"), Err(ConfigError::InvalidValue(_))));
    }
}
