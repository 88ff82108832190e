//! Authentication middleware for JWT token validation
//!
//! Tokens are issued by the auth service; this service only holds the public
//! key and shares the revocation list in Redis.

use anyhow::Result;
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
use common::{
    claims::{Claims, Principal},
    keys::read_pem,
};
use jsonwebtoken::{DecodingKey, Validation};
use tracing::error;
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

/// Authenticated user information
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub principal: Principal,
}

impl AuthUser {
    pub fn require_faculty(&self) -> Result<(), ApiError> {
        if self.principal.is_faculty() {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }

    pub fn require_student(&self) -> Result<(), ApiError> {
        if self.principal.is_student() {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name,
            email: claims.email,
            principal: claims.principal,
        }
    }
}

/// Verifier configuration
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// Public key for verifying tokens
    pub public_key: String,
}

impl VerifierConfig {
    /// Create a new VerifierConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_PUBLIC_KEY`: Public key (PEM format) or path to public key file
    pub fn from_env() -> Result<Self> {
        let public_key = std::env::var("JWT_PUBLIC_KEY")
            .map_err(|_| anyhow::anyhow!("JWT_PUBLIC_KEY environment variable not set"))?;

        let public_key = read_pem(public_key, "public", env!("CARGO_MANIFEST_DIR"))?;

        Ok(VerifierConfig { public_key })
    }
}

/// RS256 verifier built once at startup
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: &VerifierConfig) -> Result<Self> {
        let decoding_key = DecodingKey::from_rsa_pem(config.public_key.as_bytes())?;
        let mut validation = Validation::new(jsonwebtoken::Algorithm::RS256);
        validation.validate_exp = true;

        Ok(TokenVerifier {
            decoding_key,
            validation,
        })
    }

    pub fn verify(&self, token: &str) -> Result<Claims> {
        let token_data =
            jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(ApiError::Unauthorized)?;

    let claims = state.verifier.verify(bearer.token()).map_err(|e| {
        error!("Failed to validate token: {}", e);
        ApiError::Unauthorized
    })?;

    let is_revoked = state
        .redis_pool
        .is_token_revoked(bearer.token())
        .await
        .map_err(|e| ApiError::internal("Failed to check token revocation", e))?;
    if is_revoked {
        return Err(ApiError::Unauthorized);
    }

    req.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(req).await)
}
