use sqlx::PgPool;

use crate::dto::interview_dto::{CreateInterviewPayload, UpdateInterviewPayload};
use crate::error::{Error, Result};
use crate::middleware::auth::AuthUser;
use crate::models::candidate::CandidateStatus;
use crate::models::interview::{
    candidate_status_for_interview, Interview, InterviewWithCandidate, INTERVIEW_STATUSES,
};
use crate::services::candidate_service::CandidateService;

const INTERVIEW_COLUMNS: &str = r#"
    id, candidate_id, scheduled_date, interview_type, interviewer_name,
    interviewer_email, interviewer_role, interviewer_department, status,
    feedback, created_at
"#;

#[derive(Clone)]
pub struct InterviewService {
    pool: PgPool,
    candidates: CandidateService,
}

impl InterviewService {
    pub fn new(pool: PgPool, candidates: CandidateService) -> Self {
        Self { pool, candidates }
    }

    /// Schedules an interview and moves the candidate to `invitation_sent`
    /// through the logged status transition.
    pub async fn create(
        &self,
        payload: &CreateInterviewPayload,
        actor: &AuthUser,
    ) -> Result<Interview> {
        let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM candidates WHERE id = $1")
            .bind(payload.candidate_id)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_none() {
            return Err(Error::NotFound("Candidate not found".to_string()));
        }

        let interview = sqlx::query_as::<_, Interview>(&format!(
            r#"
            INSERT INTO interviews (
                candidate_id, scheduled_date, interview_type, interviewer_name,
                interviewer_email, interviewer_role, interviewer_department, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'scheduled')
            RETURNING {INTERVIEW_COLUMNS}
            "#
        ))
        .bind(payload.candidate_id)
        .bind(payload.scheduled_date)
        .bind(&payload.interview_type)
        .bind(&payload.interviewer_name)
        .bind(&payload.interviewer_email)
        .bind(&payload.interviewer_role)
        .bind(&payload.interviewer_department)
        .fetch_one(&self.pool)
        .await?;

        self.candidates
            .set_status(payload.candidate_id, actor, CandidateStatus::InvitationSent)
            .await?;

        Ok(interview)
    }

    /// Updates the interview state and syncs the candidate through the fixed
    /// mapping (`scheduled → invitation_sent`, `completed → interview`,
    /// `cancelled → applied`).
    pub async fn update_status(&self, id: i64, status: &str, actor: &AuthUser) -> Result<()> {
        if !INTERVIEW_STATUSES.contains(&status) {
            return Err(Error::BadRequest(format!(
                "Unknown interview status: {status}"
            )));
        }

        let candidate_id = sqlx::query_scalar::<_, i64>(
            "UPDATE interviews SET status = $1 WHERE id = $2 RETURNING candidate_id",
        )
        .bind(status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Interview not found".to_string()))?;

        if let Some(next) = candidate_status_for_interview(status) {
            self.candidates.set_status(candidate_id, actor, next).await?;
        }

        Ok(())
    }

    /// Detail edit without candidate-status sync.
    pub async fn update(&self, id: i64, payload: &UpdateInterviewPayload) -> Result<Interview> {
        if let Some(status) = payload.status.as_deref() {
            if !INTERVIEW_STATUSES.contains(&status) {
                return Err(Error::BadRequest(format!(
                    "Unknown interview status: {status}"
                )));
            }
        }

        sqlx::query_as::<_, Interview>(&format!(
            r#"
            UPDATE interviews SET
                scheduled_date = COALESCE($1, scheduled_date),
                interview_type = COALESCE($2, interview_type),
                status = COALESCE($3, status),
                feedback = COALESCE($4, feedback)
            WHERE id = $5
            RETURNING {INTERVIEW_COLUMNS}
            "#
        ))
        .bind(payload.scheduled_date)
        .bind(&payload.interview_type)
        .bind(&payload.status)
        .bind(&payload.feedback)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Interview not found".to_string()))
    }

    pub async fn list(&self) -> Result<Vec<InterviewWithCandidate>> {
        let interviews = sqlx::query_as::<_, InterviewWithCandidate>(
            r#"
            SELECT
                i.id,
                i.candidate_id,
                i.scheduled_date,
                i.interview_type,
                i.interviewer_name,
                i.interviewer_email,
                i.interviewer_role,
                i.interviewer_department,
                i.status,
                i.created_at,
                TRIM(CONCAT(COALESCE(c.first_name, ''), ' ', COALESCE(c.last_name, ''))) AS candidate_name,
                c.email AS candidate_email,
                c.position,
                c.status AS candidate_status
            FROM interviews i
            INNER JOIN candidates c ON i.candidate_id = c.id
            ORDER BY i.scheduled_date DESC
            LIMIT 5000
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(interviews)
    }

    pub async fn list_by_candidate(&self, candidate_id: i64) -> Result<Vec<Interview>> {
        let interviews = sqlx::query_as::<_, Interview>(&format!(
            r#"
            SELECT {INTERVIEW_COLUMNS}
            FROM interviews
            WHERE candidate_id = $1
            ORDER BY scheduled_date DESC
            "#
        ))
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(interviews)
    }
}
