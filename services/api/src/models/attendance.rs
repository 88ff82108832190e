//! Attendance models: sessions, stored entries, aggregation inputs and outputs

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::ApiError;

/// Roster member as needed to mark a session
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct RosterStudent {
    pub id: Uuid,
    pub prn: String,
    pub name: String,
}

/// One student's presence in a not yet committed session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMark {
    pub student: Uuid,
    pub date: DateTime<Utc>,
    #[serde(rename = "isPresent")]
    pub is_present: bool,
    pub prn: String,
    pub name: String,
}

/// Entry to append to a student's attendance history
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttendanceEntry {
    pub student_id: Uuid,
    pub subject: String,
    pub attended: bool,
    pub semester: i32,
    pub recorded_at: DateTime<Utc>,
}

/// Stored attendance entry
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct AttendanceEntry {
    pub subject: String,
    pub attended: bool,
    pub semester: i32,
    pub recorded_at: DateTime<Utc>,
}

/// A single entry joined with its student's identity
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct AttendanceFact {
    pub prn: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub attended: bool,
    pub recorded_at: DateTime<Utc>,
}

/// Attended lectures per (student, subject)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedAttendance {
    pub prn: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub attended_lectures: u32,
}

/// Inclusive time window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateRange {
    /// Parse request bounds
    ///
    /// Each bound is either an RFC 3339 timestamp, used as is, or a plain
    /// `YYYY-MM-DD` date covering that whole day in UTC.
    pub fn parse(from: &str, to: &str) -> Result<Self, ApiError> {
        let from = parse_bound(from, false)?;
        let to = parse_bound(to, true)?;

        if from > to {
            return Err(ApiError::BadRequest(
                "datefrom must not be after dateto".to_string(),
            ));
        }

        Ok(Self { from, to })
    }

    /// The calendar month `month`/`year` in UTC
    pub fn month(month: u32, year: i32) -> Result<Self, ApiError> {
        let invalid = || ApiError::BadRequest("Invalid date".to_string());

        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let next = first.checked_add_months(chrono::Months::new(1)).ok_or_else(invalid)?;

        Ok(Self {
            from: first.and_time(NaiveTime::MIN).and_utc(),
            to: last_instant_before(next),
        })
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from <= at && at <= self.to
    }
}

fn parse_bound(value: &str, end_of_day: bool) -> Result<DateTime<Utc>, ApiError> {
    let value = value.trim();

    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Ok(at.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest(format!("Invalid date: {}", value)))?;

    if end_of_day {
        let next = date
            .checked_add_days(Days::new(1))
            .ok_or_else(|| ApiError::BadRequest(format!("Invalid date: {}", value)))?;
        Ok(last_instant_before(next))
    } else {
        Ok(date.and_time(NaiveTime::MIN).and_utc())
    }
}

/// Last microsecond before midnight of `date`, matching Postgres precision
fn last_instant_before(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc() - chrono::Duration::microseconds(1)
}

/// Body of `POST /faculty/takeattendance`
#[derive(Debug, Clone, Deserialize)]
pub struct TakeAttendanceRequest {
    pub department: String,
    pub dateofleaving: String,
    pub dateofattendancetake: Option<DateTime<Utc>>,
    /// Registration numbers present, bypassing the presence source
    pub presentprns: Option<Vec<String>>,
}

/// Body of `POST /faculty/saveattendance`
#[derive(Debug, Clone, Deserialize)]
pub struct SaveAttendanceRequest {
    /// JSON-encoded list of session marks
    pub attendance: String,
    pub subject: String,
    pub semester: i32,
}

/// Body of `POST /faculty/getattendancesubjectname`
#[derive(Debug, Clone, Deserialize)]
pub struct SubjectQuery {
    pub department: String,
    pub dateofleaving: String,
    pub datefrom: String,
    pub dateto: String,
}

/// Body of `POST /faculty/generatedefaultersreport`
#[derive(Debug, Clone, Deserialize)]
pub struct ReportRequest {
    pub department: String,
    pub dateofleaving: String,
    pub datefrom: String,
    pub dateto: String,
    /// JSON-encoded list of `{subject, totallectures}`
    pub subjectandtotallectures: String,
}

/// One day of a student's month: subjects attended and missed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub attended: Vec<String>,
    pub absent: Vec<String>,
}
