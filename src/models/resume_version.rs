use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One historical snapshot of an uploaded resume file. Rows are append-only:
/// every successful ingestion inserts a new version and nothing updates them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeVersion {
    pub id: i64,
    pub candidate_id: i64,
    pub resume_file_path: String,
    pub updated_by: Option<i64>,
    pub updated_by_name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Version row joined with the owning candidate's name, for the
/// cross-candidate updates feed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeUpdate {
    pub id: i64,
    pub candidate_id: i64,
    pub resume_file_path: String,
    pub updated_by_name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}
