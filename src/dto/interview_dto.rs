use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInterviewPayload {
    pub candidate_id: i64,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub interview_type: Option<String>,
    pub interviewer_name: Option<String>,
    pub interviewer_email: Option<String>,
    pub interviewer_role: Option<String>,
    pub interviewer_department: Option<String>,
}

/// Detail edit. Carries no candidate-status sync; use the status route for
/// transitions that must reflect on the candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateInterviewPayload {
    pub scheduled_date: Option<DateTime<Utc>>,
    pub interview_type: Option<String>,
    pub status: Option<String>,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateInterviewStatusPayload {
    pub status: String,
}
