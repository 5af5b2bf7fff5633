use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Json, Path, State},
    http::{header::SET_COOKIE, StatusCode},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::{Validate, ValidationErrors};

use crate::config::CookieConfig;
use crate::model::user::{PublicUser, UserStatus};
use crate::service::user_service::{NewUser, UserService};
use crate::util::error::HandlerError;
use crate::util::token_cookie::build_token_cookie;

/// Shared state of the user routes.
pub struct UserState {
    pub service: Arc<dyn UserService>,
    pub cookie_config: CookieConfig,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(required(message = "Name is required"))]
    pub name: Option<String>,
    #[validate(required(message = "Email is required"))]
    pub email: Option<String>,
    #[validate(required(message = "Password is required"))]
    pub password: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub photo: Option<String>,
    pub team_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(required(message = "Email is required"))]
    pub email: Option<String>,
    #[validate(required(message = "Password is required"))]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct StatusRequest {
    #[validate(required(message = "Valid status ('blocked' or 'active') is required"))]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(required(message = "Missing required fields"))]
    pub email: Option<String>,
    #[validate(required(message = "Missing required fields"))]
    pub name: Option<String>,
    #[validate(required(message = "Missing required fields"))]
    pub photo: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: PublicUser,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct UserMessageResponse {
    pub message: String,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileCountResponse {
    pub message: String,
    pub file_count: i64,
}

fn validated<T: Validate>(payload: &T) -> Result<(), HandlerError> {
    payload.validate().map_err(|e| HandlerError::bad_request(first_message(&e)))
}

fn first_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Validation error".to_string())
}

fn parse_status(raw: &str) -> Result<UserStatus, HandlerError> {
    raw.parse::<UserStatus>()
        .map_err(|_| HandlerError::bad_request("Valid status ('blocked' or 'active') is required"))
}

// Register
pub async fn register_handler(
    State(state): State<Arc<UserState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let Json(payload) = payload?;
    validated(&payload)?;
    let status = payload.status.as_deref().map(parse_status).transpose()?;
    let new_user = NewUser {
        name: payload.name.unwrap_or_default(),
        email: payload.email.unwrap_or_default(),
        password: payload.password.unwrap_or_default(),
        role: payload.role,
        status,
        photo: payload.photo,
        team_name: payload.team_name,
    };
    let res = state
        .service
        .register(new_user)
        .await
        .map_err(|e| HandlerError::from_service(e, "Failed to create user"))?;
    Ok((StatusCode::CREATED, Json(res)))
}

// Login
pub async fn login_handler(
    State(state): State<Arc<UserState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let Json(payload) = payload?;
    validated(&payload)?;
    let res = state
        .service
        .login(payload.email.unwrap_or_default(), payload.password.unwrap_or_default())
        .await
        .map_err(|e| HandlerError::from_service(e, "Failed to log in"))?;
    let cookie = build_token_cookie(&state.cookie_config, &res.token);
    let body = LoginResponse {
        message: "Login successful".to_string(),
        user: res.user,
        token: res.token,
    };
    Ok((StatusCode::OK, [(SET_COOKIE, cookie)], Json(body)))
}

// List active users
pub async fn list_users_handler(State(state): State<Arc<UserState>>) -> Result<impl IntoResponse, HandlerError> {
    let users = state
        .service
        .list_active_users()
        .await
        .map_err(|e| HandlerError::from_service(e, "Failed to fetch users"))?;
    Ok(Json(users))
}

// List active members of a team
pub async fn list_team_users_handler(
    State(state): State<Arc<UserState>>,
    Path(team_name): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let users = state
        .service
        .list_team_members(&team_name)
        .await
        .map_err(|e| HandlerError::from_service(e, "Failed to fetch users"))?;
    Ok(Json(users))
}

// Block / unblock
pub async fn set_status_handler(
    State(state): State<Arc<UserState>>,
    Path(email): Path<String>,
    payload: Result<Json<StatusRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    if email.trim().is_empty() {
        return Err(HandlerError::bad_request("User email is required"));
    }
    let Json(payload) = payload?;
    validated(&payload)?;
    let status = parse_status(payload.status.as_deref().unwrap_or_default())?;
    let user = state
        .service
        .set_user_status(&email, status)
        .await
        .map_err(|e| HandlerError::from_service(e, "Failed to update user status"))?;
    info!(email = %email, status = %status, "User status updated");
    Ok(Json(UserMessageResponse {
        message: format!("User {} successfully", status),
        user,
    }))
}

// Update name and photo
pub async fn update_profile_handler(
    State(state): State<Arc<UserState>>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let Json(payload) = payload?;
    validated(&payload)?;
    let (email, name, photo) = (
        payload.email.unwrap_or_default(),
        payload.name.unwrap_or_default(),
        payload.photo.unwrap_or_default(),
    );
    let user = state
        .service
        .update_profile(&email, &name, &photo)
        .await
        .map_err(|e| HandlerError::from_service(e, "Failed to update user profile"))?;
    Ok(Json(UserMessageResponse {
        message: "Profile updated successfully".to_string(),
        user,
    }))
}

// Increment file count
pub async fn increment_file_count_handler(
    State(state): State<Arc<UserState>>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let user = state
        .service
        .increment_file_count(&email)
        .await
        .map_err(|e| HandlerError::from_service(e, "Failed to update file count"))?;
    Ok(Json(UserMessageResponse {
        message: "File count updated successfully".to_string(),
        user,
    }))
}

// Read file count
pub async fn get_file_count_handler(
    State(state): State<Arc<UserState>>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let file_count = state
        .service
        .get_file_count(&email)
        .await
        .map_err(|e| HandlerError::from_service(e, "Failed to fetch file count"))?;
    Ok(Json(FileCountResponse {
        message: "File count fetched successfully".to_string(),
        file_count,
    }))
}
