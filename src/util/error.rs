use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::repository::repository_error::RepositoryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerErrorKind {
    NotFound,
    BadRequest,
    Unauthorized,
    Conflict,
    Internal,
}

impl HandlerErrorKind {
    pub fn status_code(&self) -> StatusCode {
        match self {
            HandlerErrorKind::NotFound => StatusCode::NOT_FOUND,
            HandlerErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            HandlerErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            HandlerErrorKind::Conflict => StatusCode::CONFLICT,
            HandlerErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error returned by every handler. Serialized as `{"message": ...}`.
#[derive(Debug, Serialize)]
pub struct HandlerError {
    #[serde(skip)]
    pub error: HandlerErrorKind,
    pub message: String,
}

impl HandlerError {
    pub fn new(error: HandlerErrorKind, message: impl Into<String>) -> Self {
        HandlerError { error, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(HandlerErrorKind::BadRequest, message)
    }

    /// Maps a service failure onto an HTTP error. Internal failures are
    /// logged here and answered with `internal_message` only.
    pub fn from_service(err: ServiceError, internal_message: &str) -> Self {
        match err {
            ServiceError::NotFound(msg) => Self::new(HandlerErrorKind::NotFound, msg),
            ServiceError::InvalidInput(msg) => Self::new(HandlerErrorKind::BadRequest, msg),
            ServiceError::Conflict(msg) => Self::new(HandlerErrorKind::Conflict, msg),
            ServiceError::Unauthorized(msg) => Self::new(HandlerErrorKind::Unauthorized, msg),
            ServiceError::InternalError(msg) => {
                error!("{}: {}", internal_message, msg);
                Self::new(HandlerErrorKind::Internal, internal_message)
            }
        }
    }
}

// Malformed or non-JSON bodies
impl From<JsonRejection> for HandlerError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl std::fmt::Display for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.error, self.message)
    }
}

impl std::error::Error for HandlerError {}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        (self.error.status_code(), axum::Json(self)).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Invalid Input: {0}")]
    InvalidInput(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Internal Error: {0}")]
    InternalError(String),
}

// Allow conversion from RepositoryError to ServiceError
impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => ServiceError::NotFound(msg),
            RepositoryError::ValidationError(msg) => ServiceError::InvalidInput(msg),
            RepositoryError::AlreadyExists(msg) => ServiceError::Conflict(msg),
            RepositoryError::DatabaseError(msg)
            | RepositoryError::ConnectionError(msg)
            | RepositoryError::SerializationError(msg) => ServiceError::InternalError(msg),
            RepositoryError::Generic(e) => ServiceError::InternalError(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_key_becomes_conflict() {
        let err = ServiceError::from(RepositoryError::already_exists("Duplicate key: email"));
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[test]
    fn test_internal_error_hides_cause() {
        let err = HandlerError::from_service(
            ServiceError::InternalError("connection refused at 10.0.0.3:27017".to_string()),
            "Failed to fetch users",
        );
        assert_eq!(err.error, HandlerErrorKind::Internal);
        assert_eq!(err.message, "Failed to fetch users");
    }

    #[test]
    fn test_body_is_message_only() {
        let err = HandlerError::new(HandlerErrorKind::NotFound, "User not found");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "User not found" }));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(HandlerErrorKind::BadRequest.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(HandlerErrorKind::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(HandlerErrorKind::Conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(HandlerErrorKind::NotFound.status_code(), StatusCode::NOT_FOUND);
    }
}
