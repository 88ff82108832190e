//! Batch models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Batch name and id, without member detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BatchSummary {
    pub id: Uuid,
    pub batchname: String,
}

/// Create or update payload
#[derive(Debug, Clone, Deserialize)]
pub struct BatchRequest {
    pub batchname: String,
    pub students: Vec<Uuid>,
}
