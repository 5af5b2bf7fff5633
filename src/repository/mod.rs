pub mod memory_repo;
pub mod repository_error;
pub mod team_repo;
pub mod user_repo;

use crate::config::mongo_conf::MongoConfig;
use mongodb::options::{ClientOptions, Credential};
use mongodb::{Client, Database};
use tracing::info;

/// Builds the single MongoDB client shared by every repository.
///
/// Timeouts and the driver's retry behaviour come from `MongoConfig`, so
/// nothing here relies on driver defaults.
pub async fn connect(config: &MongoConfig) -> Result<Database, mongodb::error::Error> {
    let mut client_options = ClientOptions::parse(&config.uri).await?;
    client_options.app_name = Some("AccountBackend".to_string());
    client_options.max_pool_size = Some(config.pool_size);
    client_options.connect_timeout = Some(config.connect_timeout());
    client_options.server_selection_timeout = Some(config.server_selection_timeout());
    client_options.retry_reads = Some(config.retry_reads);
    client_options.retry_writes = Some(config.retry_writes);
    if let (Some(ref username), Some(ref password)) = (&config.username, &config.password) {
        client_options.credential = Some(
            Credential::builder()
                .username(username.clone())
                .password(password.clone())
                .build(),
        );
    }
    let client = Client::with_options(client_options)?;
    info!(database = %config.database, "MongoDB client created");
    Ok(client.database(&config.database))
}
