use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::config::{parse_flag, ConfigError};

/// MongoDB configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoConfig {
    /// MongoDB connection URI
    pub uri: String,
    /// Database name
    pub database: String,
    /// Username for authentication (optional)
    pub username: Option<String>,
    /// Password for authentication (optional)
    pub password: Option<String>,
    pub user_collection: String,
    pub team_collection: String,
    /// Connection pool size
    pub pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,
    /// How long the driver waits for a usable server, in seconds
    pub server_selection_timeout_secs: u64,
    /// Driver-level single retry of reads after a transient network error
    pub retry_reads: bool,
    /// Driver-level single retry of writes after a transient network error
    pub retry_writes: bool,
}

impl MongoConfig {
    /// Load MongoDB configuration from environment variables
    ///
    /// Expected environment variables:
    /// - MONGO_URI: MongoDB connection URI (required)
    /// - MONGO_DATABASE: Database name (required)
    /// - MONGO_USERNAME / MONGO_PASSWORD: credentials (optional)
    /// - MONGO_USER_COLLECTION: defaults to "users"
    /// - MONGO_TEAM_COLLECTION: defaults to "teams"
    /// - MONGO_POOL_SIZE: Connection pool size (defaults to 10)
    /// - MONGO_CONNECTION_TIMEOUT: Connection timeout in seconds (defaults to 5)
    /// - MONGO_SERVER_SELECTION_TIMEOUT: seconds (defaults to 10)
    /// - MONGO_RETRY_READS / MONGO_RETRY_WRITES: booleans (default to true)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading MongoDB configuration from environment variables");

        let uri = env::var("MONGO_URI").map_err(|_| {
            error!("MONGO_URI environment variable not found");
            ConfigError::EnvVarNotFound("MONGO_URI".to_string())
        })?;

        let database = env::var("MONGO_DATABASE").map_err(|_| {
            error!("MONGO_DATABASE environment variable not found");
            ConfigError::EnvVarNotFound("MONGO_DATABASE".to_string())
        })?;
        debug!("MongoDB database: {}", database);

        let username = env::var("MONGO_USERNAME").ok();
        let password = env::var("MONGO_PASSWORD").ok();
        if password.is_some() {
            debug!("MongoDB password provided");
        }

        let user_collection = env::var("MONGO_USER_COLLECTION").unwrap_or_else(|_| "users".to_string());
        let team_collection = env::var("MONGO_TEAM_COLLECTION").unwrap_or_else(|_| "teams".to_string());
        debug!("MongoDB collections: users={}, teams={}", user_collection, team_collection);

        let pool_size = env::var("MONGO_POOL_SIZE")
            .unwrap_or_else(|_| {
                warn!("MONGO_POOL_SIZE not set, using default: 10");
                "10".to_string()
            })
            .parse::<u32>()
            .map_err(|_| {
                error!("Invalid MONGO_POOL_SIZE value");
                ConfigError::InvalidValue("Invalid MONGO_POOL_SIZE value".to_string())
            })?;

        let connection_timeout_secs = env::var("MONGO_CONNECTION_TIMEOUT")
            .unwrap_or_else(|_| {
                warn!("MONGO_CONNECTION_TIMEOUT not set, using default: 5 seconds");
                "5".to_string()
            })
            .parse::<u64>()
            .map_err(|_| {
                error!("Invalid MONGO_CONNECTION_TIMEOUT value");
                ConfigError::InvalidValue("Invalid MONGO_CONNECTION_TIMEOUT value".to_string())
            })?;

        let server_selection_timeout_secs = env::var("MONGO_SERVER_SELECTION_TIMEOUT")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u64>()
            .map_err(|_| {
                error!("Invalid MONGO_SERVER_SELECTION_TIMEOUT value");
                ConfigError::InvalidValue("Invalid MONGO_SERVER_SELECTION_TIMEOUT value".to_string())
            })?;

        let retry_reads = match env::var("MONGO_RETRY_READS") {
            Ok(raw) => parse_flag("MONGO_RETRY_READS", &raw)?,
            Err(_) => true,
        };
        let retry_writes = match env::var("MONGO_RETRY_WRITES") {
            Ok(raw) => parse_flag("MONGO_RETRY_WRITES", &raw)?,
            Err(_) => true,
        };
        debug!(
            pool_size,
            connection_timeout_secs,
            server_selection_timeout_secs,
            retry_reads,
            retry_writes,
            "MongoDB client policy"
        );

        let config = MongoConfig {
            uri,
            database,
            username,
            password,
            user_collection,
            team_collection,
            pool_size,
            connection_timeout_secs,
            server_selection_timeout_secs,
            retry_reads,
            retry_writes,
        };

        config.validate()?;
        info!("MongoDB configuration loaded successfully");
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.uri.is_empty() {
            error!("MongoDB URI is empty");
            return Err(ConfigError::ValidationError("MongoDB URI cannot be empty".to_string()));
        }

        if self.database.is_empty() {
            error!("MongoDB database is empty");
            return Err(ConfigError::ValidationError("MongoDB database cannot be empty".to_string()));
        }

        if self.user_collection.is_empty() || self.team_collection.is_empty() {
            error!("MongoDB collection name is empty");
            return Err(ConfigError::ValidationError("MongoDB collection names cannot be empty".to_string()));
        }

        if self.pool_size == 0 {
            error!("MongoDB pool size is 0");
            return Err(ConfigError::ValidationError("MongoDB pool size must be greater than 0".to_string()));
        }

        if self.connection_timeout_secs == 0 || self.server_selection_timeout_secs == 0 {
            error!("MongoDB timeout is 0");
            return Err(ConfigError::ValidationError("MongoDB timeouts must be greater than 0".to_string()));
        }

        if let Some(ref user) = self.username {
            if user.is_empty() {
                return Err(ConfigError::ValidationError("MongoDB username cannot be empty if set".to_string()));
            }
        }
        if let Some(ref pass) = self.password {
            if pass.is_empty() {
                return Err(ConfigError::ValidationError("MongoDB password cannot be empty if set".to_string()));
            }
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs)
    }

    pub fn server_selection_timeout(&self) -> Duration {
        Duration::from_secs(self.server_selection_timeout_secs)
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: "accounts".to_string(),
            username: None,
            password: None,
            user_collection: "users".to_string(),
            team_collection: "teams".to_string(),
            pool_size: 10,
            connection_timeout_secs: 5,
            server_selection_timeout_secs: 10,
            retry_reads: true,
            retry_writes: true,
        }
    }
}
