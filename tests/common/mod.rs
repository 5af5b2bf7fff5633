#![allow(dead_code)]

use std::sync::Arc;

use account_backend::app::app::App;
use account_backend::config::{CookieConfig, JwtConfig};
use account_backend::handler::user_handler::UserState;
use account_backend::model::team::{MemberRef, Team};
use account_backend::repository::memory_repo::{MemoryTeamRepository, MemoryUserRepository};
use account_backend::service::user_service::{NewUser, UserServiceImpl};
use account_backend::util::jwt::JwtTokenUtilsImpl;
use axum::body::{to_bytes, Body};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use bson::oid::ObjectId;
use serde_json::Value;
use tower::ServiceExt; // for .oneshot()

pub struct TestContext {
    pub users: Arc<MemoryUserRepository>,
    pub teams: Arc<MemoryTeamRepository>,
    pub jwt: Arc<JwtTokenUtilsImpl>,
    pub service: Arc<UserServiceImpl>,
}

impl TestContext {
    pub fn new() -> Self {
        let users = Arc::new(MemoryUserRepository::new());
        let teams = Arc::new(MemoryTeamRepository::new());
        let jwt = Arc::new(JwtTokenUtilsImpl::new(JwtConfig::default()));
        let service = Arc::new(UserServiceImpl::new(users.clone(), teams.clone(), jwt.clone()));
        TestContext { users, teams, jwt, service }
    }

    pub fn router(&self) -> Router {
        App::create_router(Arc::new(UserState {
            service: self.service.clone(),
            cookie_config: CookieConfig::default(),
        }))
    }

    pub async fn add_team(&self, name: &str, members: &[ObjectId]) {
        self.teams
            .put(Team {
                id: Some(ObjectId::new()),
                team_name: name.to_string(),
                team_members: members.iter().map(|id| MemberRef::Hex(id.to_hex())).collect(),
            })
            .await;
    }
}

pub fn new_user(email: &str, password: &str) -> NewUser {
    NewUser {
        name: "Test User".to_string(),
        email: email.to_string(),
        password: password.to_string(),
        role: Some("member".to_string()),
        status: None,
        photo: Some("https://img.example.com/u.png".to_string()),
        team_name: Some("core".to_string()),
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap(); // 1 MB limit
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    TestResponse { status, headers, body }
}

/// Fails if a `password` key appears anywhere in the payload.
pub fn assert_no_password(value: &Value) {
    match value {
        Value::Object(map) => {
            assert!(!map.contains_key("password"), "payload leaks password: {}", value);
            map.values().for_each(assert_no_password);
        }
        Value::Array(items) => items.iter().for_each(assert_no_password),
        _ => {}
    }
}
