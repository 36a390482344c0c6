use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::candidate::CandidateStatus;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Interview {
    pub id: i64,
    pub candidate_id: i64,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub interview_type: Option<String>,
    pub interviewer_name: Option<String>,
    pub interviewer_email: Option<String>,
    pub interviewer_role: Option<String>,
    pub interviewer_department: Option<String>,
    pub status: String,
    pub feedback: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InterviewWithCandidate {
    pub id: i64,
    pub candidate_id: i64,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub interview_type: Option<String>,
    pub interviewer_name: Option<String>,
    pub interviewer_email: Option<String>,
    pub interviewer_role: Option<String>,
    pub interviewer_department: Option<String>,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
    pub candidate_name: Option<String>,
    pub candidate_email: String,
    pub position: Option<String>,
    pub candidate_status: String,
}

pub const INTERVIEW_STATUSES: &[&str] = &["scheduled", "completed", "cancelled"];

/// Fixed mapping from an interview status to the candidate workflow state it
/// drives. Unknown interview statuses do not touch the candidate.
pub fn candidate_status_for_interview(status: &str) -> Option<CandidateStatus> {
    match status {
        "scheduled" => Some(CandidateStatus::InvitationSent),
        "completed" => Some(CandidateStatus::Interview),
        "cancelled" => Some(CandidateStatus::Applied),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interview_status_drives_candidate_status() {
        assert_eq!(
            candidate_status_for_interview("scheduled"),
            Some(CandidateStatus::InvitationSent)
        );
        assert_eq!(
            candidate_status_for_interview("completed"),
            Some(CandidateStatus::Interview)
        );
        assert_eq!(
            candidate_status_for_interview("cancelled"),
            Some(CandidateStatus::Applied)
        );
        assert_eq!(candidate_status_for_interview("no_show"), None);
    }
}
