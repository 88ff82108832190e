//! Authentication service routes

use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::WithRejection;
use common::password::{hash_password, verify_password};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};

use crate::{
    AppState,
    error::AuthError,
    jwt::now_secs,
    middleware::{AuthenticatedToken, auth_middleware},
    models::{Account, FacultySignup, LoginCredentials},
};

/// Response for a successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: &'static str,
    pub expires_in: u64,
}

/// Create the router for the authentication service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/auth/valid", get(validate))
        .route("/auth/logout", post(logout))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/faculty/signup", post(faculty_signup))
        .route("/auth/login", post(login))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

/// Faculty signup endpoint
pub async fn faculty_signup(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<FacultySignup>, AuthError>,
) -> Result<impl IntoResponse, AuthError> {
    info!("POST /auth/faculty/signup");

    payload.validate().map_err(AuthError::BadRequest)?;

    let password_hash = hash_password(&payload.password).map_err(|e| {
        error!("Failed to hash password: {}", e);
        AuthError::InternalServerError
    })?;

    state
        .faculty_repository
        .create(&payload, &password_hash)
        .await
        .map_err(|e| {
            if e.is_duplicate() {
                AuthError::Conflict("Faculty already exists".to_string())
            } else {
                error!("Failed to create faculty: {}", e);
                AuthError::InternalServerError
            }
        })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({"message": "Faculty successfully signed up"})),
    ))
}

/// Login endpoint for faculty and students
///
/// Valid faculty accounts are matched first; the email is then tried
/// against students.
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<LoginCredentials>, AuthError>,
) -> Result<impl IntoResponse, AuthError> {
    info!("POST /auth/login");

    payload.validate().map_err(AuthError::BadRequest)?;

    let account = find_account(&state, &payload.email)
        .await?
        .ok_or_else(|| AuthError::Unauthorized("Email not registered".to_string()))?;

    let matches = verify_password(&payload.password, account.password_hash()).map_err(|e| {
        error!("Failed to verify password: {}", e);
        AuthError::InternalServerError
    })?;

    if !matches {
        return Err(AuthError::Unauthorized("Password not match".to_string()));
    }

    let token = state
        .jwt_service
        .generate_access_token(&account)
        .map_err(|e| {
            error!("Failed to generate access token: {}", e);
            AuthError::InternalServerError
        })?;

    let response = LoginResponse {
        token,
        role: account.principal().role_name(),
        expires_in: state.jwt_service.access_token_expiry(),
    };

    Ok(Json(json!({
        "message": "Login Successful",
        "data": response,
    })))
}

async fn find_account(state: &AppState, email: &str) -> Result<Option<Account>, AuthError> {
    let faculty = state
        .faculty_repository
        .find_valid_by_email(email)
        .await
        .map_err(|e| {
            error!("Failed to look up faculty: {}", e);
            AuthError::InternalServerError
        })?;

    if let Some(faculty) = faculty {
        return Ok(Some(Account::Faculty(faculty)));
    }

    let student = state
        .student_repository
        .find_by_email(email)
        .await
        .map_err(|e| {
            error!("Failed to look up student: {}", e);
            AuthError::InternalServerError
        })?;

    Ok(student.map(Account::Student))
}

/// Token validity check
pub async fn validate(Extension(auth): Extension<AuthenticatedToken>) -> impl IntoResponse {
    info!("GET /auth/valid for {}", auth.claims.sub);
    Json(json!({"message": "Token is valid"}))
}

/// Logout endpoint: revokes the presented token until it expires
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedToken>,
) -> Result<impl IntoResponse, AuthError> {
    info!("POST /auth/logout for {}", auth.claims.sub);

    let now = now_secs().map_err(|e| {
        error!("{}", e);
        AuthError::InternalServerError
    })?;

    state
        .redis_pool
        .revoke_token(&auth.token, auth.claims.remaining_lifetime(now))
        .await
        .map_err(|e| {
            error!("Failed to revoke token: {}", e);
            AuthError::InternalServerError
        })?;

    Ok(Json(json!({"message": "Logged out successfully"})))
}
