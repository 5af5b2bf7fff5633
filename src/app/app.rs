use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use crate::config::{AppConfig, CookieConfig, JwtConfig, MongoConfig};
use crate::handler::user_handler::UserState;
use crate::repository::team_repo::MongoTeamRepository;
use crate::repository::user_repo::MongoUserRepository;
use crate::router::user_router::user_router;
use crate::service::user_service::UserServiceImpl;
use crate::util::jwt::JwtTokenUtilsImpl;

pub struct App {
    config: AppConfig,
    router: Router,
}

impl App {
    /// Loads configuration, connects to MongoDB and wires the user routes.
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let config = AppConfig::from_env()?;
        let jwt_config = JwtConfig::from_env()?;
        let mongo_config = MongoConfig::from_env()?;
        let cookie_config = CookieConfig::from_env()?;

        let db = crate::repository::connect(&mongo_config).await?;
        let user_repo = Arc::new(MongoUserRepository::new(&db, &mongo_config).await);
        let team_repo = Arc::new(MongoTeamRepository::new(&db, &mongo_config));
        let jwt_utils = Arc::new(JwtTokenUtilsImpl::new(jwt_config));
        let service = UserServiceImpl::new(user_repo, team_repo, jwt_utils)
            .with_store_timeout(config.store_timeout());

        let state = Arc::new(UserState {
            service: Arc::new(service),
            cookie_config,
        });
        let router = Self::create_router(state);
        Ok(App { config, router })
    }

    pub fn create_router(state: Arc<UserState>) -> Router {
        Router::new()
            .merge(user_router(state))
            .route("/health", get(|| async { "OK" }))
    }

    pub async fn start(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = SocketAddr::new(self.config.host.parse()?, self.config.port);
        info!("Server running at http://{}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.router).await?;
        Ok(())
    }
}
