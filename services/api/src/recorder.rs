//! Attendance sessions: marking a roster and committing the result

use chrono::{DateTime, Utc};
use common::error::DatabaseResult;
use std::{collections::HashSet, future::Future};
use tracing::{info, warn};

use crate::{
    error::ApiError,
    models::attendance::{NewAttendanceEntry, RosterStudent, SessionMark},
};

/// Result of appending a single entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Appended {
    Inserted,
    /// Same student, subject and timestamp already on record
    AlreadyRecorded,
    UnknownStudent,
}

/// Append-only store of attendance entries
pub trait AttendanceLedger {
    fn append(
        &self,
        entry: &NewAttendanceEntry,
    ) -> impl Future<Output = DatabaseResult<Appended>> + Send;
}

/// Mark every roster student present or absent, ordered by registration number
pub fn mark_roster(
    roster: Vec<RosterStudent>,
    present: &HashSet<String>,
    taken_at: DateTime<Utc>,
) -> Result<Vec<SessionMark>, ApiError> {
    if roster.is_empty() {
        return Err(ApiError::NotFound("Students not found".to_string()));
    }

    let mut marks: Vec<SessionMark> = roster
        .into_iter()
        .map(|student| SessionMark {
            student: student.id,
            date: taken_at,
            is_present: present.contains(&student.prn),
            prn: student.prn,
            name: student.name,
        })
        .collect();
    marks.sort_by(|a, b| a.prn.cmp(&b.prn));

    Ok(marks)
}

/// Decode the caller-approved marks sent back as a JSON string
pub fn parse_marks(attendance: &str) -> Result<Vec<SessionMark>, ApiError> {
    serde_json::from_str(attendance)
        .map_err(|e| ApiError::BadRequest(format!("Invalid attendance payload: {}", e)))
}

pub fn entries_from_marks(
    marks: &[SessionMark],
    subject: &str,
    semester: i32,
) -> Vec<NewAttendanceEntry> {
    marks
        .iter()
        .map(|mark| NewAttendanceEntry {
            student_id: mark.student,
            subject: subject.to_string(),
            attended: mark.is_present,
            semester,
            recorded_at: mark.date,
        })
        .collect()
}

/// Append entries one by one
///
/// Stops at the first unknown student. Entries appended before that point
/// stay recorded; retrying is safe because repeated entries are skipped.
pub async fn commit<L: AttendanceLedger>(
    ledger: &L,
    entries: &[NewAttendanceEntry],
) -> Result<usize, ApiError> {
    let mut inserted = 0;

    for entry in entries {
        match ledger.append(entry).await? {
            Appended::Inserted => inserted += 1,
            Appended::AlreadyRecorded => {
                info!(
                    "Attendance for {} in {} already recorded",
                    entry.student_id, entry.subject
                );
            }
            Appended::UnknownStudent => {
                warn!(
                    "Attendance commit stopped at unknown student {} after {} entries",
                    entry.student_id, inserted
                );
                return Err(ApiError::NotFound("Student not found".to_string()));
            }
        }
    }

    Ok(inserted)
}
