//! Error type for the authentication service

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Custom error type for authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Missing, invalid or revoked credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Request body failed validation
    #[error("{0}")]
    BadRequest(String),

    /// A unique field is already taken
    #[error("{0}")]
    Conflict(String),

    #[error("Internal server error")]
    InternalServerError,
}

impl AuthError {
    pub fn unauthorized() -> Self {
        AuthError::Unauthorized("Unauthorized".to_string())
    }
}

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        AuthError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AuthError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AuthError::Conflict(_) => StatusCode::CONFLICT,
            AuthError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}
