//! Student self-service routes

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    routing::get,
};
use axum_extra::extract::WithRejection;
use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{
        ApiResponse,
        attendance::{AttendanceEntry, DateRange, DaySummary},
        student::StudentProfile,
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/students/myprofile", get(my_profile))
        .route("/students/myattendance/:month/:year", get(my_attendance))
}

#[derive(Debug, Serialize)]
pub struct MonthlyAttendance {
    pub month: u32,
    pub year: i32,
    /// Keyed by day of month
    pub days: BTreeMap<u32, DaySummary>,
}

/// Split a month's entries by day into attended and absent subjects
pub fn group_by_day(entries: &[AttendanceEntry]) -> BTreeMap<u32, DaySummary> {
    let mut days: BTreeMap<u32, DaySummary> = BTreeMap::new();
    for entry in entries {
        let day = days.entry(entry.recorded_at.day()).or_default();
        if entry.attended {
            day.attended.push(entry.subject.clone());
        } else {
            day.absent.push(entry.subject.clone());
        }
    }
    days
}

async fn current_student(state: &AppState, user: &AuthUser) -> ApiResult<StudentProfile> {
    user.require_student()?;
    state
        .student_repository
        .find_profile(user.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))
}

pub async fn my_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Json<ApiResponse<StudentProfile>>> {
    info!("GET /students/myprofile");
    let student = current_student(&state, &user).await?;
    Ok(Json(ApiResponse::new("Student profile", student)))
}

pub async fn my_attendance(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    WithRejection(Path((month, year)), _): WithRejection<Path<(String, String)>, ApiError>,
) -> ApiResult<Json<ApiResponse<MonthlyAttendance>>> {
    info!("GET /students/myattendance");
    let student = current_student(&state, &user).await?;

    let invalid = || ApiError::BadRequest("Invalid date".to_string());
    let month: u32 = month.trim().parse().map_err(|_| invalid())?;
    let year: i32 = year.trim().parse().map_err(|_| invalid())?;
    let range = DateRange::month(month, year)?;

    let entries = state
        .attendance_repository
        .entries_between(student.id, &range)
        .await?;
    if entries.is_empty() {
        return Err(ApiError::NotFound("Attendance not found".to_string()));
    }

    Ok(Json(ApiResponse::new(
        "Student attendance",
        MonthlyAttendance {
            month,
            year,
            days: group_by_day(&entries),
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry(subject: &str, attended: bool, day: u32, hour: u32) -> AttendanceEntry {
        AttendanceEntry {
            subject: subject.to_string(),
            attended,
            semester: 3,
            recorded_at: Utc.with_ymd_and_hms(2023, 1, day, hour, 0, 0).unwrap(),
        }
    }

    #[test]
    fn groups_subjects_by_day() {
        let days = group_by_day(&[
            entry("DBMS", true, 12, 11),
            entry("OS", true, 3, 9),
            entry("CN", false, 3, 10),
            entry("OS", false, 12, 9),
        ]);

        let keys: Vec<u32> = days.keys().copied().collect();
        assert_eq!(keys, vec![3, 12]);
        assert_eq!(days[&3].attended, vec!["OS"]);
        assert_eq!(days[&3].absent, vec!["CN"]);
        assert_eq!(days[&12].attended, vec!["DBMS"]);
        assert_eq!(days[&12].absent, vec!["OS"]);
    }

    #[test]
    fn days_serialize_as_object_keys() {
        let json = serde_json::to_value(MonthlyAttendance {
            month: 1,
            year: 2023,
            days: group_by_day(&[entry("OS", true, 3, 9)]),
        })
        .unwrap();
        assert_eq!(json["days"]["3"]["attended"][0], "OS");
        assert_eq!(json["days"]["3"]["absent"], serde_json::json!([]));
    }
}
