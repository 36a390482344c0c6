use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Append-only audit record of a candidate workflow-state change.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateStatusLog {
    pub id: i64,
    pub candidate_id: i64,
    pub hr_id: Option<i64>,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Latest status per candidate for one HR user, joined with the candidate
/// name. The "latest" view is derived from the log, not stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StatusActivity {
    pub id: i64,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}
