use std::env;
use tracing::{debug, error, info, warn};

use crate::config::ConfigError;

const MIN_SECRET_LEN: usize = 32;
/// One year
pub const MAX_TOKEN_EXPIRATION_MINUTES: i64 = 60 * 24 * 365;

/// JWT configuration structure
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens, shared by the whole process
    pub jwt_secret: String,
    /// Token lifetime in minutes
    pub token_expiration: i64,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables
    ///
    /// Expected environment variables:
    /// - JWT_SECRET: Secret key for signing JWT tokens (required, at least 32 characters)
    /// - JWT_EXPIRY_MINUTES: Token lifetime in minutes (defaults to 60)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading JWT configuration from environment variables");

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| {
            error!("JWT_SECRET environment variable not found");
            ConfigError::EnvVarNotFound("JWT_SECRET".to_string())
        })?;
        debug!("JWT secret loaded (length: {} chars)", jwt_secret.len());

        let token_expiration = env::var("JWT_EXPIRY_MINUTES")
            .unwrap_or_else(|_| {
                warn!("JWT_EXPIRY_MINUTES not set, using default: 60 minutes");
                "60".to_string()
            })
            .parse::<i64>()
            .map_err(|e| {
                error!("Invalid JWT_EXPIRY_MINUTES value: {}", e);
                ConfigError::InvalidValue(format!("JWT_EXPIRY_MINUTES: {}", e))
            })?;
        debug!("JWT token expiration: {} minutes", token_expiration);

        let config = JwtConfig { jwt_secret, token_expiration };
        config.validate()?;
        info!("JWT configuration loaded successfully");
        Ok(config)
    }

    /// Validate the JWT configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            error!("JWT secret cannot be empty");
            return Err(ConfigError::ValidationError("JWT secret cannot be empty".to_string()));
        }

        if self.jwt_secret.len() < MIN_SECRET_LEN {
            error!("JWT secret is too short (minimum {} characters required)", MIN_SECRET_LEN);
            return Err(ConfigError::ValidationError(format!(
                "JWT secret must be at least {} characters long",
                MIN_SECRET_LEN
            )));
        }

        if self.token_expiration <= 0 {
            error!("Token expiration must be greater than 0");
            return Err(ConfigError::ValidationError("Token expiration must be greater than 0".to_string()));
        }

        if self.token_expiration > MAX_TOKEN_EXPIRATION_MINUTES {
            error!("Token expiration exceeds {} minutes", MAX_TOKEN_EXPIRATION_MINUTES);
            return Err(ConfigError::ValidationError(format!(
                "Token expiration cannot exceed {} minutes",
                MAX_TOKEN_EXPIRATION_MINUTES
            )));
        }

        Ok(())
    }
}

/// Configuration used by tests and local tooling
impl Default for JwtConfig {
    fn default() -> Self {
        JwtConfig {
            jwt_secret: "test_secret_key_for_jwt_testing_should_be_long_enough_for_security_purposes".to_string(),
            token_expiration: 60,
        }
    }
}
