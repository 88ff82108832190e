//! Student models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Student profile, never carrying the password hash
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub prn: String,
    #[serde(rename = "dateofjoining")]
    pub date_of_joining: String,
    #[serde(rename = "dateofleaving")]
    pub date_of_leaving: Option<String>,
    pub department: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Short student view used for rosters and batch listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct StudentSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub prn: String,
}

/// Student row created from a roll list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub prn: String,
    pub date_of_joining: String,
    pub date_of_leaving: String,
    pub department: String,
    pub password_hash: String,
}
