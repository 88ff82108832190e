//! Batch repository for database operations

use common::error::DatabaseResult;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    batches::BatchStore,
    models::{batch::BatchSummary, student::StudentSummary},
};

#[derive(Clone)]
pub struct BatchRepository {
    pool: PgPool,
}

impl BatchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl BatchStore for BatchRepository {
    async fn list_batches(&self, faculty_id: Uuid) -> DatabaseResult<Vec<BatchSummary>> {
        let batches = sqlx::query_as::<_, BatchSummary>(
            r#"
            SELECT id, batchname
            FROM batches
            WHERE faculty_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(faculty_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(batches)
    }

    async fn resolve_students(&self, ids: &[Uuid]) -> DatabaseResult<Vec<Uuid>> {
        let resolved = sqlx::query_scalar("SELECT id FROM students WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(resolved)
    }

    async fn insert_batch(
        &self,
        faculty_id: Uuid,
        batchname: &str,
        members: &[Uuid],
    ) -> DatabaseResult<BatchSummary> {
        let mut tx = self.pool.begin().await?;

        let batch = sqlx::query_as::<_, BatchSummary>(
            r#"
            INSERT INTO batches (faculty_id, batchname)
            VALUES ($1, $2)
            RETURNING id, batchname
            "#,
        )
        .bind(faculty_id)
        .bind(batchname)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO batch_members (batch_id, student_id)
            SELECT $1, UNNEST($2::uuid[])
            "#,
        )
        .bind(batch.id)
        .bind(members)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(batch)
    }

    async fn replace_batch(
        &self,
        batch_id: Uuid,
        batchname: &str,
        members: &[Uuid],
    ) -> DatabaseResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE batches SET batchname = $2, updated_at = NOW() WHERE id = $1")
            .bind(batch_id)
            .bind(batchname)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM batch_members WHERE batch_id = $1")
            .bind(batch_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO batch_members (batch_id, student_id)
            SELECT $1, UNNEST($2::uuid[])
            "#,
        )
        .bind(batch_id)
        .bind(members)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn batch_members(
        &self,
        faculty_id: Uuid,
        batch_id: Uuid,
    ) -> DatabaseResult<Option<Vec<StudentSummary>>> {
        let owned: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM batches WHERE id = $1 AND faculty_id = $2)",
        )
        .bind(batch_id)
        .bind(faculty_id)
        .fetch_one(&self.pool)
        .await?;
        if !owned {
            return Ok(None);
        }

        let mut members = sqlx::query_as::<_, StudentSummary>(
            r#"
            SELECT s.id, s.name, s.email, s.prn
            FROM batch_members m
            JOIN students s ON s.id = m.student_id
            WHERE m.batch_id = $1
            "#,
        )
        .bind(batch_id)
        .fetch_all(&self.pool)
        .await?;

        members.sort_by(|a, b| a.prn.cmp(&b.prn));
        Ok(Some(members))
    }
}
