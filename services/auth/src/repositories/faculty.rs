//! Faculty repository for database operations

use common::error::DatabaseResult;
use sqlx::PgPool;
use tracing::info;

use crate::models::{Faculty, FacultySignup};

/// Faculty repository
#[derive(Clone)]
pub struct FacultyRepository {
    pool: PgPool,
}

impl FacultyRepository {
    /// Create a new faculty repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new faculty member with an already hashed password
    ///
    /// A taken email surfaces as `DatabaseError::Duplicate`.
    pub async fn create(
        &self,
        signup: &FacultySignup,
        password_hash: &str,
    ) -> DatabaseResult<Faculty> {
        info!("Creating new faculty: {}", signup.email);

        let faculty = sqlx::query_as::<_, Faculty>(
            r#"
            INSERT INTO faculties (name, email, password_hash, is_hod, is_class_incharge, department, phone)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, email, password_hash, is_hod, is_class_incharge, is_valid,
                      department, phone, created_at, updated_at
            "#,
        )
        .bind(&signup.name)
        .bind(&signup.email)
        .bind(password_hash)
        .bind(signup.is_hod)
        .bind(signup.is_class_incharge)
        .bind(&signup.department)
        .bind(&signup.phone)
        .fetch_one(&self.pool)
        .await?;

        Ok(faculty)
    }

    /// Find a faculty member allowed to log in
    pub async fn find_valid_by_email(&self, email: &str) -> DatabaseResult<Option<Faculty>> {
        info!("Finding faculty by email: {}", email);

        let faculty = sqlx::query_as::<_, Faculty>(
            r#"
            SELECT id, name, email, password_hash, is_hod, is_class_incharge, is_valid,
                   department, phone, created_at, updated_at
            FROM faculties
            WHERE email = $1 AND is_valid = TRUE
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(faculty)
    }
}
