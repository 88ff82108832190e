//! Per-student, per-subject attended lecture counts

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::{
    error::ApiError,
    models::attendance::{AggregatedAttendance, AttendanceFact, DateRange},
};

/// Group facts by (prn, subject), counting attended lectures
///
/// Facts outside `range` or for subjects not in `subjects` are ignored.
/// Output is ordered by prn, then subject.
pub fn aggregate(
    facts: &[AttendanceFact],
    range: &DateRange,
    subjects: &HashSet<String>,
) -> Vec<AggregatedAttendance> {
    let mut groups: BTreeMap<(&str, &str), AggregatedAttendance> = BTreeMap::new();

    for fact in facts
        .iter()
        .filter(|f| range.contains(f.recorded_at) && subjects.contains(&f.subject))
    {
        let row = groups
            .entry((fact.prn.as_str(), fact.subject.as_str()))
            .or_insert_with(|| AggregatedAttendance {
                prn: fact.prn.clone(),
                name: fact.name.clone(),
                email: fact.email.clone(),
                subject: fact.subject.clone(),
                attended_lectures: 0,
            });
        if fact.attended {
            row.attended_lectures += 1;
        }
    }

    groups.into_values().collect()
}

/// Like [`aggregate`], but an empty result is an error
pub fn attended_counts(
    facts: &[AttendanceFact],
    range: &DateRange,
    subjects: &HashSet<String>,
) -> Result<Vec<AggregatedAttendance>, ApiError> {
    let rows = aggregate(facts, range, subjects);
    if rows.is_empty() {
        return Err(ApiError::NotFound("Attendance not found".to_string()));
    }
    Ok(rows)
}

/// Subjects with at least one entry inside `range`, alphabetically
pub fn distinct_subjects(
    facts: &[AttendanceFact],
    range: &DateRange,
) -> Result<Vec<String>, ApiError> {
    let subjects: BTreeSet<&str> = facts
        .iter()
        .filter(|f| range.contains(f.recorded_at))
        .map(|f| f.subject.as_str())
        .collect();

    if subjects.is_empty() {
        return Err(ApiError::NotFound("Subject not found".to_string()));
    }
    Ok(subjects.into_iter().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn fact(prn: &str, subject: &str, attended: bool, day: u32) -> AttendanceFact {
        AttendanceFact {
            prn: prn.to_string(),
            name: format!("Student {}", prn),
            email: format!("{}@college.edu", prn.to_lowercase()),
            subject: subject.to_string(),
            attended,
            recorded_at: Utc.with_ymd_and_hms(2023, 1, day, 9, 0, 0).unwrap(),
        }
    }

    fn january() -> DateRange {
        DateRange::parse("2023-01-01", "2023-01-31").unwrap()
    }

    fn subjects(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn counts_attended_lectures_per_student_and_subject() {
        let facts = vec![
            fact("A2", "OS", true, 3),
            fact("A1", "OS", true, 3),
            fact("A1", "OS", false, 4),
            fact("A1", "OS", true, 5),
            fact("A1", "DBMS", false, 5),
        ];

        let rows = aggregate(&facts, &january(), &subjects(&["OS", "DBMS"]));

        let summary: Vec<(&str, &str, u32)> = rows
            .iter()
            .map(|r| (r.prn.as_str(), r.subject.as_str(), r.attended_lectures))
            .collect();
        assert_eq!(
            summary,
            vec![("A1", "DBMS", 0), ("A1", "OS", 2), ("A2", "OS", 1)]
        );
        assert_eq!(rows[0].email, "a1@college.edu");
    }

    #[test]
    fn range_and_subject_filters_apply() {
        let mut outside = fact("A1", "OS", true, 1);
        outside.recorded_at = Utc.with_ymd_and_hms(2022, 12, 31, 23, 59, 59).unwrap();
        let facts = vec![outside, fact("A1", "CN", true, 10), fact("A1", "OS", true, 31)];

        let rows = aggregate(&facts, &january(), &subjects(&["OS"]));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].attended_lectures, 1);
    }

    #[test]
    fn nothing_matching_is_not_found() {
        let facts = vec![fact("A1", "CN", true, 10)];
        let result = attended_counts(&facts, &january(), &subjects(&["OS"]));
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[test]
    fn distinct_subjects_in_range() {
        let facts = vec![
            fact("A1", "OS", true, 2),
            fact("A2", "OS", false, 2),
            fact("A1", "DBMS", true, 9),
        ];
        assert_eq!(distinct_subjects(&facts, &january()).unwrap(), vec!["DBMS", "OS"]);
        assert!(distinct_subjects(&[], &january()).is_err());
    }
}
