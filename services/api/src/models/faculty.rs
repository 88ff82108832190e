//! Faculty models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Faculty profile, never carrying the password hash
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FacultyProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_hod: bool,
    pub is_class_incharge: bool,
    pub department: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
