//! Faculty routes: roll lists, attendance sessions and defaulter reports

use axum::{
    Extension, Json, Router,
    extract::{Multipart, Path, State},
    routing::{get, post},
};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use common::password::hash_password;
use serde_json::{Value, json};
use std::collections::HashSet;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    aggregator::{attended_counts, distinct_subjects},
    distribution::{publish_report, report_destination},
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{
        ApiResponse,
        attendance::{
            DateRange, ReportRequest, SaveAttendanceRequest, SessionMark, SubjectQuery,
            TakeAttendanceRequest,
        },
        faculty::FacultyProfile,
        student::StudentProfile,
    },
    recorder::{commit, entries_from_marks, mark_roster, parse_marks},
    report::{DefaulterReport, parse_subject_totals},
    roll_list::{new_students, parse_roll_list},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/faculty/insertrolllist", post(insert_roll_list))
        .route("/faculty/myprofile", get(my_profile))
        .route("/faculty/profile/student/:id", get(student_profile))
        .route("/faculty/takeattendance", post(take_attendance))
        .route("/faculty/saveattendance", post(save_attendance))
        .route("/faculty/getattendancesubjectname", post(attendance_subjects))
        .route("/faculty/generatedefaultersreport", post(defaulters_report))
}

/// The caller's faculty record; a token for a removed faculty is rejected
pub(super) async fn current_faculty(
    state: &AppState,
    user: &AuthUser,
) -> ApiResult<FacultyProfile> {
    user.require_faculty()?;
    state
        .faculty_repository
        .find_profile(user.id)
        .await?
        .ok_or(ApiError::Unauthorized)
}

#[derive(Default)]
struct RollListUpload {
    file: Option<Vec<u8>>,
    joinyear: Option<String>,
    department: Option<String>,
}

async fn read_upload(mut multipart: Multipart) -> ApiResult<RollListUpload> {
    let bad_upload = |e: axum::extract::multipart::MultipartError| {
        ApiError::BadRequest(format!("Invalid upload: {}", e))
    };

    let mut upload = RollListUpload::default();
    while let Some(field) = multipart.next_field().await.map_err(bad_upload)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("Rollfile") => {
                upload.file = Some(field.bytes().await.map_err(bad_upload)?.to_vec())
            }
            Some("joinyear") => upload.joinyear = Some(field.text().await.map_err(bad_upload)?),
            Some("department") => {
                upload.department = Some(field.text().await.map_err(bad_upload)?)
            }
            _ => {}
        }
    }
    Ok(upload)
}

pub async fn insert_roll_list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(multipart, _): WithRejection<Multipart, ApiError>,
) -> ApiResult<Json<Value>> {
    info!("POST /faculty/insertrolllist");
    current_faculty(&state, &user).await?;

    let upload = read_upload(multipart).await?;
    let file = upload
        .file
        .ok_or_else(|| ApiError::BadRequest("Rollfile is required".to_string()))?;
    let joinyear: i32 = upload
        .joinyear
        .as_deref()
        .map(str::trim)
        .and_then(|y| y.parse().ok())
        .ok_or_else(|| ApiError::BadRequest("joinyear must be a year".to_string()))?;
    let department = upload
        .department
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .ok_or_else(|| ApiError::BadRequest("department is required".to_string()))?;

    let rows = parse_roll_list(&file).map_err(|e| {
        warn!("Rejected roll list: {:#}", e);
        ApiError::BadRequest("Invalid roll list file".to_string())
    })?;
    if rows.is_empty() {
        return Err(ApiError::BadRequest(
            "Roll list has no complete rows".to_string(),
        ));
    }

    let password_hash = hash_password(&state.settings.default_student_password)
        .map_err(|e| ApiError::internal("Failed to hash default password", e))?;
    let students = new_students(rows, joinyear, &department, &password_hash);

    let inserted = state
        .student_repository
        .insert_many(&students)
        .await
        .map_err(|e| {
            if e.is_duplicate() {
                ApiError::Conflict("Student already exists".to_string())
            } else {
                ApiError::Database(e)
            }
        })?;

    info!("Imported {} students into {} {}", inserted, department, joinyear);
    Ok(Json(json!({ "message": "Roll list uploaded successfully" })))
}

pub async fn my_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<ApiResponse<FacultyProfile>>> {
    info!("GET /faculty/myprofile");
    let faculty = current_faculty(&state, &user).await?;
    Ok(Json(ApiResponse::new("Faculty profile", faculty)))
}

pub async fn student_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> ApiResult<Json<ApiResponse<StudentProfile>>> {
    info!("GET /faculty/profile/student/:id");
    current_faculty(&state, &user).await?;

    let student = state
        .student_repository
        .find_profile(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))?;

    Ok(Json(ApiResponse::new("Student profile", student)))
}

pub async fn take_attendance(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(payload), _): WithRejection<Json<TakeAttendanceRequest>, ApiError>,
) -> ApiResult<Json<ApiResponse<Vec<SessionMark>>>> {
    info!("POST /faculty/takeattendance by {}", user.name);
    current_faculty(&state, &user).await?;

    let present = state.presence_client.present_or(payload.presentprns).await;

    let roster = state
        .student_repository
        .roster(&payload.department, &payload.dateofleaving)
        .await?;
    let marks = mark_roster(
        roster,
        &present,
        payload.dateofattendancetake.unwrap_or_else(Utc::now),
    )?;

    Ok(Json(ApiResponse::new("Attendance taked successfully", marks)))
}

pub async fn save_attendance(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(payload), _): WithRejection<Json<SaveAttendanceRequest>, ApiError>,
) -> ApiResult<Json<ApiResponse<Value>>> {
    info!("POST /faculty/saveattendance by {}", user.email);
    current_faculty(&state, &user).await?;

    let marks = parse_marks(&payload.attendance)?;
    let entries = entries_from_marks(&marks, &payload.subject, payload.semester);
    let inserted = commit(&state.attendance_repository, &entries).await?;

    Ok(Json(ApiResponse::new(
        "Attendance saved successfully",
        json!({ "recorded": inserted }),
    )))
}

pub async fn attendance_subjects(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(payload), _): WithRejection<Json<SubjectQuery>, ApiError>,
) -> ApiResult<Json<ApiResponse<Vec<String>>>> {
    info!("POST /faculty/getattendancesubjectname");
    current_faculty(&state, &user).await?;

    let range = DateRange::parse(&payload.datefrom, &payload.dateto)?;
    let facts = state
        .attendance_repository
        .cohort_facts(&payload.department, &payload.dateofleaving, &range, None)
        .await?;

    let subjects = distinct_subjects(&facts, &range)?;
    Ok(Json(ApiResponse::new("Subject get successfully", subjects)))
}

pub async fn defaulters_report(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Json(payload), _): WithRejection<Json<ReportRequest>, ApiError>,
) -> ApiResult<Json<ApiResponse<Value>>> {
    info!("POST /faculty/generatedefaultersreport");
    current_faculty(&state, &user).await?;

    let range = DateRange::parse(&payload.datefrom, &payload.dateto)?;
    let totals = parse_subject_totals(&payload.subjectandtotallectures)?;
    let names: Vec<String> = totals.iter().map(|t| t.subject.clone()).collect();

    let facts = state
        .attendance_repository
        .cohort_facts(
            &payload.department,
            &payload.dateofleaving,
            &range,
            Some(names.as_slice()),
        )
        .await?;
    let requested: HashSet<String> = names.iter().cloned().collect();
    let rows = attended_counts(&facts, &range, &requested)?;
    let report = DefaulterReport::build(&rows, &totals);

    let destination = report_destination(
        &state.settings.report_prefix,
        &payload.dateofleaving,
        &payload.department,
        &payload.datefrom,
        &payload.dateto,
    );
    let url = publish_report(
        &state.distributor,
        report,
        &state.settings.report_dir,
        &destination,
    )
    .await
    .map_err(|e| ApiError::internal("Failed to publish report", format!("{:#}", e)))?;
    Ok(Json(ApiResponse::new(
        "Report generated successfully",
        json!({ "filePath": url }),
    )))
}
