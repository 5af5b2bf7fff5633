use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::model::user::{PublicUser, User, UserStatus};
use crate::repository::repository_error::RepositoryResult;
use crate::repository::team_repo::TeamRepository;
use crate::repository::user_repo::UserRepository;
use crate::util::error::ServiceError;
use crate::util::jwt::JwtTokenUtils;
use crate::util::password::{PasswordError, PasswordUtils, PasswordUtilsImpl};

const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(10);
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Input of a registration. `status` defaults to active.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
    pub status: Option<UserStatus>,
    pub photo: Option<String>,
    pub team_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserAuthResponse {
    pub token: String,
    pub user: PublicUser,
}

#[async_trait]
pub trait UserService: Send + Sync {
    async fn register(&self, new_user: NewUser) -> Result<UserAuthResponse, ServiceError>;
    async fn login(&self, email: String, password: String) -> Result<UserAuthResponse, ServiceError>;
    async fn list_active_users(&self) -> Result<Vec<PublicUser>, ServiceError>;
    async fn list_team_members(&self, team_name: &str) -> Result<Vec<PublicUser>, ServiceError>;
    async fn set_user_status(&self, email: &str, status: UserStatus) -> Result<PublicUser, ServiceError>;
    async fn update_profile(&self, email: &str, name: &str, photo: &str) -> Result<PublicUser, ServiceError>;
    async fn increment_file_count(&self, email: &str) -> Result<PublicUser, ServiceError>;
    async fn get_file_count(&self, email: &str) -> Result<i64, ServiceError>;
}

pub struct UserServiceImpl {
    pub user_repo: Arc<dyn UserRepository>,
    pub team_repo: Arc<dyn TeamRepository>,
    pub jwt_utils: Arc<dyn JwtTokenUtils>,
    store_timeout: Duration,
}

impl UserServiceImpl {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        team_repo: Arc<dyn TeamRepository>,
        jwt_utils: Arc<dyn JwtTokenUtils>,
    ) -> Self {
        Self { user_repo, team_repo, jwt_utils, store_timeout: DEFAULT_STORE_TIMEOUT }
    }

    /// Bound applied to every single store call.
    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    async fn store<T, F>(&self, operation: &'static str, fut: F) -> Result<T, ServiceError>
    where
        F: Future<Output = RepositoryResult<T>> + Send,
    {
        match tokio::time::timeout(self.store_timeout, fut).await {
            Ok(result) => result.map_err(ServiceError::from),
            Err(_) => {
                error!(operation, timeout = ?self.store_timeout, "Store operation timed out");
                Err(ServiceError::InternalError(format!("{} timed out", operation)))
            }
        }
    }

    fn issue_token(&self, user: &User) -> Result<String, ServiceError> {
        let id = user.id.map(|id| id.to_hex()).unwrap_or_default();
        self.jwt_utils
            .generate_token(&id, &user.email)
            .map_err(|e| ServiceError::InternalError(format!("JWT error: {}", e)))
    }
}

fn require(value: &str, message: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::InvalidInput(message.to_string()));
    }
    Ok(())
}

fn user_not_found() -> ServiceError {
    ServiceError::NotFound("User not found".to_string())
}

async fn hash_password(password: String) -> Result<String, ServiceError> {
    tokio::task::spawn_blocking(move || PasswordUtilsImpl::hash_password(&password))
        .await
        .map_err(|e| ServiceError::InternalError(format!("Password hash task failed: {}", e)))?
        .map_err(|e| ServiceError::InternalError(e.to_string()))
}

/// A stored hash that cannot be parsed counts as a mismatch.
async fn verify_password(password: String, hash: String) -> Result<bool, ServiceError> {
    let verified = tokio::task::spawn_blocking(move || PasswordUtilsImpl::verify_password(&password, &hash))
        .await
        .map_err(|e| ServiceError::InternalError(format!("Password verify task failed: {}", e)))?;
    match verified {
        Ok(matches) => Ok(matches),
        Err(PasswordError::InvalidHashFormat) => {
            warn!("Stored password hash is unusable");
            Ok(false)
        }
        Err(e) => Err(ServiceError::InternalError(e.to_string())),
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    #[instrument(skip(self, new_user), fields(email = %new_user.email))]
    async fn register(&self, new_user: NewUser) -> Result<UserAuthResponse, ServiceError> {
        require(&new_user.name, "Name is required")?;
        require(&new_user.email, "Email is required")?;
        require(&new_user.password, "Password is required")?;

        if self.store("find user", self.user_repo.find_by_email(&new_user.email)).await?.is_some() {
            warn!("Registration rejected, email already in use");
            return Err(ServiceError::Conflict("User already exists".to_string()));
        }

        let password = hash_password(new_user.password).await?;
        let user = User {
            id: None,
            name: new_user.name,
            email: new_user.email,
            password,
            role: new_user.role,
            status: new_user.status.unwrap_or_default(),
            photo: new_user.photo,
            team_name: new_user.team_name,
            file_count: None,
        };

        // Two concurrent registrations can both pass the lookup; the unique
        // index turns the loser's insert into a conflict.
        let inserted = self.store("insert user", self.user_repo.insert(user)).await.map_err(|e| match e {
            ServiceError::Conflict(_) => ServiceError::Conflict("User already exists".to_string()),
            other => other,
        })?;
        let token = self.issue_token(&inserted)?;
        info!(user_id = ?inserted.id, "User registered");
        Ok(UserAuthResponse { token, user: inserted.into() })
    }

    #[instrument(skip(self, email, password))]
    async fn login(&self, email: String, password: String) -> Result<UserAuthResponse, ServiceError> {
        require(&email, "Email is required")?;
        require(&password, "Password is required")?;

        let user = match self.store("find user", self.user_repo.find_by_email(&email)).await? {
            Some(user) => user,
            None => {
                warn!(email = %email, "Login failed: unknown email");
                return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
        };

        if !verify_password(password, user.password.clone()).await? {
            warn!(email = %email, "Login failed: wrong password");
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.issue_token(&user)?;
        info!(user_id = ?user.id, "User logged in");
        Ok(UserAuthResponse { token, user: user.into() })
    }

    #[instrument(skip(self))]
    async fn list_active_users(&self) -> Result<Vec<PublicUser>, ServiceError> {
        let users = self.store("list active users", self.user_repo.find_active()).await?;
        Ok(users.into_iter().map(PublicUser::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_team_members(&self, team_name: &str) -> Result<Vec<PublicUser>, ServiceError> {
        let team = self
            .store("find team", self.team_repo.find_by_name(team_name))
            .await?
            .ok_or_else(|| ServiceError::NotFound("Team not found.".to_string()))?;

        let ids = team.member_ids();
        let members = if ids.is_empty() {
            Vec::new()
        } else {
            self.store("list team members", self.user_repo.find_active_by_ids(&ids)).await?
        };

        if members.is_empty() {
            return Err(ServiceError::NotFound("No active users found for this team.".to_string()));
        }
        Ok(members.into_iter().map(PublicUser::from).collect())
    }

    #[instrument(skip(self, status), fields(status = %status))]
    async fn set_user_status(&self, email: &str, status: UserStatus) -> Result<PublicUser, ServiceError> {
        require(email, "User email is required")?;
        let user = self
            .store("set user status", self.user_repo.set_status(email, status))
            .await?
            .ok_or_else(user_not_found)?;
        info!("User status changed");
        Ok(user.into())
    }

    #[instrument(skip(self, photo))]
    async fn update_profile(&self, email: &str, name: &str, photo: &str) -> Result<PublicUser, ServiceError> {
        if email.trim().is_empty() || name.trim().is_empty() || photo.trim().is_empty() {
            return Err(ServiceError::InvalidInput("Missing required fields".to_string()));
        }
        let user = self
            .store("update profile", self.user_repo.update_profile(email, name, photo))
            .await?
            .ok_or_else(user_not_found)?;
        Ok(user.into())
    }

    #[instrument(skip(self))]
    async fn increment_file_count(&self, email: &str) -> Result<PublicUser, ServiceError> {
        require(email, "Email is required")?;
        let user = self
            .store("increment file count", self.user_repo.increment_file_count(email))
            .await?
            .ok_or_else(user_not_found)?;
        Ok(user.into())
    }

    #[instrument(skip(self))]
    async fn get_file_count(&self, email: &str) -> Result<i64, ServiceError> {
        require(email, "Email is required")?;
        let user = self
            .store("find user", self.user_repo.find_by_email(email))
            .await?
            .ok_or_else(user_not_found)?;
        Ok(user.file_count())
    }
}
