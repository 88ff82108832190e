//! Faculty batch routes

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use axum_extra::extract::WithRejection;
use tracing::info;
use uuid::Uuid;

use super::faculty::current_faculty;
use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{
        ApiResponse,
        batch::{BatchRequest, BatchSummary},
        student::StudentSummary,
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/faculty/batch", get(list_batches).post(create_batch))
        .route("/faculty/batch/:id", put(update_batch))
        .route("/faculty/batch/:id/students", get(batch_students))
}

pub async fn create_batch(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(payload), _): WithRejection<Json<BatchRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<ApiResponse<BatchSummary>>)> {
    info!("POST /faculty/batch");
    let faculty = current_faculty(&state, &user).await?;

    let batch = state.batch_manager.create(faculty.id, &payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Batch created successfully", batch)),
    ))
}

pub async fn update_batch(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<BatchRequest>, ApiError>,
) -> ApiResult<Json<ApiResponse<BatchSummary>>> {
    info!("PUT /faculty/batch/:id");
    let faculty = current_faculty(&state, &user).await?;

    let batch = state.batch_manager.update(faculty.id, id, &payload).await?;
    Ok(Json(ApiResponse::new("Batch updated successfully", batch)))
}

pub async fn list_batches(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<ApiResponse<Vec<BatchSummary>>>> {
    info!("GET /faculty/batch");
    let faculty = current_faculty(&state, &user).await?;

    let batches = state.batch_manager.list_mine(faculty.id).await?;
    Ok(Json(ApiResponse::new("Batches", batches)))
}

pub async fn batch_students(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<Json<ApiResponse<Vec<StudentSummary>>>> {
    info!("GET /faculty/batch/:id/students");
    let faculty = current_faculty(&state, &user).await?;

    let students = state.batch_manager.list_members(faculty.id, id).await?;
    Ok(Json(ApiResponse::new("Batch students", students)))
}
