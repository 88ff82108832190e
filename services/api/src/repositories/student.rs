//! Student repository for database operations

use common::error::DatabaseResult;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::{
    attendance::RosterStudent,
    student::{NewStudent, StudentProfile},
};

#[derive(Clone)]
pub struct StudentRepository {
    pool: PgPool,
}

impl StudentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Students of a department and leaving cohort, ordered by prn
    ///
    /// Sorting happens here rather than in SQL so the order is byte-wise
    /// whatever the database collation.
    pub async fn roster(
        &self,
        department: &str,
        dateofleaving: &str,
    ) -> DatabaseResult<Vec<RosterStudent>> {
        info!("Fetching roster for {} leaving {}", department, dateofleaving);

        let mut roster = sqlx::query_as::<_, RosterStudent>(
            r#"
            SELECT id, prn, name
            FROM students
            WHERE department = $1 AND date_of_leaving = $2
            "#,
        )
        .bind(department)
        .bind(dateofleaving)
        .fetch_all(&self.pool)
        .await?;

        roster.sort_by(|a, b| a.prn.cmp(&b.prn));
        Ok(roster)
    }

    pub async fn find_profile(&self, id: Uuid) -> DatabaseResult<Option<StudentProfile>> {
        let profile = sqlx::query_as::<_, StudentProfile>(
            r#"
            SELECT id, name, email, prn, date_of_joining, date_of_leaving, department,
                   created_at, updated_at
            FROM students
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Insert a roll list in one transaction
    ///
    /// Any duplicate email or prn rolls back the whole list and surfaces as
    /// `DatabaseError::Duplicate`.
    pub async fn insert_many(&self, students: &[NewStudent]) -> DatabaseResult<u64> {
        info!("Inserting {} students", students.len());

        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for student in students {
            let result = sqlx::query(
                r#"
                INSERT INTO students (name, email, password_hash, prn, date_of_joining,
                                      date_of_leaving, department)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(&student.name)
            .bind(&student.email)
            .bind(&student.password_hash)
            .bind(&student.prn)
            .bind(&student.date_of_joining)
            .bind(&student.date_of_leaving)
            .bind(&student.department)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }
}
