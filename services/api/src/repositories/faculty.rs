//! Faculty repository for database operations

use common::error::DatabaseResult;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::faculty::FacultyProfile;

#[derive(Clone)]
pub struct FacultyRepository {
    pool: PgPool,
}

impl FacultyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Profile of a faculty member still allowed to use the service
    pub async fn find_profile(&self, id: Uuid) -> DatabaseResult<Option<FacultyProfile>> {
        let profile = sqlx::query_as::<_, FacultyProfile>(
            r#"
            SELECT id, name, email, is_hod, is_class_incharge, department, phone,
                   created_at, updated_at
            FROM faculties
            WHERE id = $1 AND is_valid = TRUE
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }
}
