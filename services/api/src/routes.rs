//! API service routes

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use common::database;
use serde_json::json;

use crate::{middleware::auth_middleware, state::AppState};

mod batches;
mod faculty;
mod students;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .merge(faculty::router())
        .merge(batches::router())
        .merge(students::router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint, reporting whether the database answers
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database_ok = database::health_check(&state.db_pool)
        .await
        .unwrap_or(false);

    let status = if database_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if database_ok { "ok" } else { "degraded" },
            "service": "api-service"
        })),
    )
}
