//! Attendance repository for database operations

use common::error::DatabaseResult;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    models::attendance::{AttendanceEntry, AttendanceFact, DateRange, NewAttendanceEntry},
    recorder::{Appended, AttendanceLedger},
};

#[derive(Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Entries of a cohort inside `range`, joined with student identity
    ///
    /// `subjects` narrows the result when given.
    pub async fn cohort_facts(
        &self,
        department: &str,
        dateofleaving: &str,
        range: &DateRange,
        subjects: Option<&[String]>,
    ) -> DatabaseResult<Vec<AttendanceFact>> {
        let facts = sqlx::query_as::<_, AttendanceFact>(
            r#"
            SELECT s.prn, s.name, s.email, e.subject, e.attended, e.recorded_at
            FROM attendance_entries e
            JOIN students s ON s.id = e.student_id
            WHERE s.department = $1
              AND s.date_of_leaving = $2
              AND e.recorded_at BETWEEN $3 AND $4
              AND ($5::text[] IS NULL OR e.subject = ANY($5))
            "#,
        )
        .bind(department)
        .bind(dateofleaving)
        .bind(range.from)
        .bind(range.to)
        .bind(subjects)
        .fetch_all(&self.pool)
        .await?;

        Ok(facts)
    }

    /// One student's entries inside `range`, oldest first
    pub async fn entries_between(
        &self,
        student_id: Uuid,
        range: &DateRange,
    ) -> DatabaseResult<Vec<AttendanceEntry>> {
        let entries = sqlx::query_as::<_, AttendanceEntry>(
            r#"
            SELECT subject, attended, semester, recorded_at
            FROM attendance_entries
            WHERE student_id = $1 AND recorded_at BETWEEN $2 AND $3
            ORDER BY recorded_at, subject
            "#,
        )
        .bind(student_id)
        .bind(range.from)
        .bind(range.to)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}

impl AttendanceLedger for AttendanceRepository {
    async fn append(&self, entry: &NewAttendanceEntry) -> DatabaseResult<Appended> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM students WHERE id = $1)")
                .bind(entry.student_id)
                .fetch_one(&self.pool)
                .await?;
        if !exists {
            return Ok(Appended::UnknownStudent);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO attendance_entries (student_id, subject, attended, semester, recorded_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (student_id, subject, recorded_at) DO NOTHING
            "#,
        )
        .bind(entry.student_id)
        .bind(&entry.subject)
        .bind(entry.attended)
        .bind(entry.semester)
        .bind(entry.recorded_at)
        .execute(&self.pool)
        .await?;

        Ok(if result.rows_affected() == 1 {
            Appended::Inserted
        } else {
            Appended::AlreadyRecorded
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::fixtures::{TestResult, seed_student, test_pool, unique_department};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, day, hour, 0, 0).unwrap()
    }

    /// 2023-01-10 through the last microsecond of 2023-01-12
    fn january_range() -> DateRange {
        DateRange {
            from: at(10, 0),
            to: at(13, 0) - Duration::microseconds(1),
        }
    }

    fn entry(student_id: Uuid, subject: &str, recorded_at: DateTime<Utc>) -> NewAttendanceEntry {
        NewAttendanceEntry {
            student_id,
            subject: subject.to_string(),
            attended: true,
            semester: 5,
            recorded_at,
        }
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL"]
    async fn append_is_idempotent_per_student_subject_and_instant() -> TestResult {
        let pool = test_pool().await?;
        let repo = AttendanceRepository::new(pool.clone());
        let student = seed_student(&pool, &unique_department(), "A1").await?;

        let first = entry(student, "OS", at(10, 9));
        assert_eq!(repo.append(&first).await?, Appended::Inserted);

        let mut again = first.clone();
        again.attended = false;
        assert_eq!(repo.append(&again).await?, Appended::AlreadyRecorded);
        assert_eq!(
            repo.append(&entry(student, "DBMS", at(10, 9))).await?,
            Appended::Inserted
        );
        assert_eq!(
            repo.append(&entry(Uuid::new_v4(), "OS", at(10, 9))).await?,
            Appended::UnknownStudent
        );

        let stored = repo.entries_between(student, &january_range()).await?;
        assert_eq!(stored.len(), 2);
        let os = stored.iter().find(|e| e.subject == "OS").ok_or("OS entry missing")?;
        assert!(os.attended, "the first write wins");
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL"]
    async fn cohort_facts_include_both_bounds_of_the_range() -> TestResult {
        let pool = test_pool().await?;
        let repo = AttendanceRepository::new(pool.clone());
        let department = unique_department();
        let student = seed_student(&pool, &department, "A1").await?;
        let range = january_range();

        for recorded_at in [
            range.from - Duration::microseconds(1),
            range.from,
            at(11, 12),
            range.to,
            at(13, 0),
        ] {
            repo.append(&entry(student, "OS", recorded_at)).await?;
        }

        let mut seen: Vec<DateTime<Utc>> = repo
            .cohort_facts(&department, "2026", &range, None)
            .await?
            .into_iter()
            .map(|f| f.recorded_at)
            .collect();
        seen.sort();
        assert_eq!(seen, vec![range.from, at(11, 12), range.to]);

        assert!(
            repo.cohort_facts(&department, "2027", &range, None)
                .await?
                .is_empty()
        );
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL"]
    async fn subject_filter_narrows_only_when_given() -> TestResult {
        let pool = test_pool().await?;
        let repo = AttendanceRepository::new(pool.clone());
        let department = unique_department();
        let a1 = seed_student(&pool, &department, "A1").await?;
        let a2 = seed_student(&pool, &department, "A2").await?;

        repo.append(&entry(a1, "OS", at(10, 9))).await?;
        repo.append(&entry(a1, "DBMS", at(10, 10))).await?;
        repo.append(&entry(a2, "CN", at(11, 9))).await?;

        let all = repo
            .cohort_facts(&department, "2026", &january_range(), None)
            .await?;
        assert_eq!(all.len(), 3);

        let wanted = vec!["OS".to_string(), "CN".to_string()];
        let mut subjects: Vec<String> = repo
            .cohort_facts(&department, "2026", &january_range(), Some(wanted.as_slice()))
            .await?
            .into_iter()
            .map(|f| f.subject)
            .collect();
        subjects.sort();
        assert_eq!(subjects, vec!["CN".to_string(), "OS".to_string()]);

        let none: Vec<String> = Vec::new();
        assert!(
            repo.cohort_facts(&department, "2026", &january_range(), Some(none.as_slice()))
                .await?
                .is_empty()
        );
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires running PostgreSQL"]
    async fn entries_between_is_one_student_oldest_first() -> TestResult {
        let pool = test_pool().await?;
        let repo = AttendanceRepository::new(pool.clone());
        let department = unique_department();
        let a1 = seed_student(&pool, &department, "A1").await?;
        let a2 = seed_student(&pool, &department, "A2").await?;

        repo.append(&entry(a1, "OS", at(12, 9))).await?;
        repo.append(&entry(a1, "DBMS", at(10, 9))).await?;
        repo.append(&entry(a1, "CN", at(10, 9))).await?;
        repo.append(&entry(a2, "OS", at(11, 9))).await?;
        repo.append(&entry(a1, "OS", at(20, 9))).await?;

        let subjects: Vec<(String, DateTime<Utc>)> = repo
            .entries_between(a1, &january_range())
            .await?
            .into_iter()
            .map(|e| (e.subject, e.recorded_at))
            .collect();
        assert_eq!(
            subjects,
            vec![
                ("CN".to_string(), at(10, 9)),
                ("DBMS".to_string(), at(10, 9)),
                ("OS".to_string(), at(12, 9)),
            ]
        );
        Ok(())
    }
}
