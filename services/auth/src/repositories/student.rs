//! Student credential lookups

use common::error::DatabaseResult;
use sqlx::PgPool;
use tracing::info;

use crate::models::StudentAccount;

/// Student repository
#[derive(Clone)]
pub struct StudentRepository {
    pool: PgPool,
}

impl StudentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a student by email
    pub async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<StudentAccount>> {
        info!("Finding student by email: {}", email);

        let student = sqlx::query_as::<_, StudentAccount>(
            r#"
            SELECT id, name, email, prn, password_hash
            FROM students
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }
}
