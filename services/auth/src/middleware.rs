//! Middleware for JWT token validation and authentication

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use common::claims::Claims;
use tracing::error;

use crate::{AppState, error::AuthError};

/// A validated bearer token together with its claims
#[derive(Debug, Clone)]
pub struct AuthenticatedToken {
    pub token: String,
    pub claims: Claims,
}

/// Extract and validate the bearer token, rejecting revoked tokens
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or_else(AuthError::unauthorized)?;
    let token = bearer.token().to_string();

    let claims = state.jwt_service.validate_token(&token).map_err(|e| {
        error!("Failed to validate token: {}", e);
        AuthError::unauthorized()
    })?;

    let is_revoked = state
        .redis_pool
        .is_token_revoked(&token)
        .await
        .map_err(|e| {
            error!("Failed to check if token is revoked: {}", e);
            AuthError::InternalServerError
        })?;

    if is_revoked {
        return Err(AuthError::unauthorized());
    }

    req.extensions_mut()
        .insert(AuthenticatedToken { token, claims });

    Ok(next.run(req).await)
}
