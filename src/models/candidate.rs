use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Candidate {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub skills: Option<String>,
    pub education: Option<String>,
    pub current_employer: Option<String>,
    pub overall_experience_years: Option<Decimal>,
    pub relevant_experience_years: Option<Decimal>,
    pub current_salary: Option<Decimal>,
    pub expected_salary: Option<Decimal>,
    pub notice_period: Option<String>,
    pub position: Option<String>,
    pub status: String,
    pub updated_by: Option<i64>,
    pub updated_by_name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Workflow states a candidate moves through. Stored as TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateStatus {
    Applied,
    InvitationSent,
    Interview,
    Offered,
    Hired,
    Rejected,
}

impl CandidateStatus {
    pub const ALL: &'static [CandidateStatus] = &[
        CandidateStatus::Applied,
        CandidateStatus::InvitationSent,
        CandidateStatus::Interview,
        CandidateStatus::Offered,
        CandidateStatus::Hired,
        CandidateStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateStatus::Applied => "applied",
            CandidateStatus::InvitationSent => "invitation_sent",
            CandidateStatus::Interview => "interview",
            CandidateStatus::Offered => "offered",
            CandidateStatus::Hired => "hired",
            CandidateStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.as_str() == value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_every_status() {
        for status in CandidateStatus::ALL {
            assert_eq!(CandidateStatus::parse(status.as_str()), Some(*status));
        }
        assert_eq!(CandidateStatus::parse("shortlisted"), None);
    }
}
