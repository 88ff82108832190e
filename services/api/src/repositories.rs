//! Repositories for database operations

mod attendance;
mod batch;
mod faculty;
mod student;

pub use attendance::AttendanceRepository;
pub use batch::BatchRepository;
pub use faculty::FacultyRepository;
pub use student::StudentRepository;

/// Live database helpers for the ignored repository tests
///
/// Run with `DATABASE_URL` set: `cargo test -p api -- --ignored`.
#[cfg(test)]
pub(crate) mod fixtures {
    use common::database::{DatabaseConfig, init_pool, run_migrations};
    use sqlx::PgPool;
    use uuid::Uuid;

    pub type TestResult = Result<(), Box<dyn std::error::Error>>;

    pub async fn test_pool() -> Result<PgPool, Box<dyn std::error::Error>> {
        let config = DatabaseConfig::from_env()?;
        let pool = init_pool(&config).await?;
        run_migrations(&pool).await?;
        Ok(pool)
    }

    /// Department name no other test run shares
    pub fn unique_department() -> String {
        format!("DEPT-{}", Uuid::new_v4().simple())
    }

    /// Insert a student of `department` leaving in 2026; prn is prefixed to stay unique
    pub async fn seed_student(
        pool: &PgPool,
        department: &str,
        prn: &str,
    ) -> Result<Uuid, sqlx::Error> {
        let prn = format!("{}-{}", department, prn);
        sqlx::query_scalar(
            r#"
            INSERT INTO students (name, email, password_hash, prn, date_of_joining,
                                  date_of_leaving, department)
            VALUES ($1, $2, 'x', $3, '2022', '2026', $4)
            RETURNING id
            "#,
        )
        .bind(format!("Student {}", prn))
        .bind(format!("{}@college.edu", prn.to_lowercase()))
        .bind(&prn)
        .bind(department)
        .fetch_one(pool)
        .await
    }

    pub async fn seed_faculty(pool: &PgPool, is_valid: bool) -> Result<Uuid, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            INSERT INTO faculties (name, email, password_hash, is_valid, department, phone)
            VALUES ('Prof', $1, 'x', $2, 'CSE', '9000000000')
            RETURNING id
            "#,
        )
        .bind(format!("{}@college.edu", Uuid::new_v4().simple()))
        .bind(is_valid)
        .fetch_one(pool)
        .await
    }
}
