use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Write payload shared by candidate create and update. Email is the only
/// mandatory field; updates are full overwrites of the profile columns.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CandidatePayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(email)]
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
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusPayload {
    pub status: String,
}
