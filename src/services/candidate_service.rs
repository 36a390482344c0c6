use sqlx::PgPool;

use crate::dto::candidate_dto::CandidatePayload;
use crate::error::{Error, Result};
use crate::middleware::auth::AuthUser;
use crate::models::candidate::{Candidate, CandidateStatus};
use crate::models::status_log::StatusActivity;

const CANDIDATE_COLUMNS: &str = r#"
    id, first_name, last_name, email, phone, skills, education,
    current_employer, overall_experience_years, relevant_experience_years,
    current_salary, expected_salary, notice_period, position, status,
    updated_by, updated_by_name, created_at, updated_at
"#;

#[derive(Clone)]
pub struct CandidateService {
    pool: PgPool,
}

impl CandidateService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a candidate. A duplicate email is rejected with the existing
    /// candidate's id so the caller can redirect instead of retrying blindly;
    /// the unique index catches the create/create race the pre-check misses.
    pub async fn create(&self, payload: &CandidatePayload, actor: &AuthUser) -> Result<Candidate> {
        let status = parse_status(payload.status.as_deref())?.unwrap_or(CandidateStatus::Applied);

        let existing = sqlx::query_scalar::<_, i64>("SELECT id FROM candidates WHERE email = $1")
            .bind(&payload.email)
            .fetch_optional(&self.pool)
            .await?;
        if let Some(id) = existing {
            return Err(Error::DuplicateCandidate { id });
        }

        let inserted = sqlx::query_as::<_, Candidate>(&format!(
            r#"
            INSERT INTO candidates (
                first_name, last_name, email, phone, skills, education,
                current_employer, overall_experience_years, relevant_experience_years,
                current_salary, expected_salary, notice_period, position, status,
                updated_by, updated_by_name
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {CANDIDATE_COLUMNS}
            "#
        ))
        .bind(&payload.first_name)
        .bind(&payload.last_name)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(&payload.skills)
        .bind(&payload.education)
        .bind(&payload.current_employer)
        .bind(payload.overall_experience_years)
        .bind(payload.relevant_experience_years)
        .bind(payload.current_salary)
        .bind(payload.expected_salary)
        .bind(&payload.notice_period)
        .bind(&payload.position)
        .bind(status.as_str())
        .bind(actor.id)
        .bind(&actor.name)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(candidate) => Ok(candidate),
            Err(err) if is_unique_violation(&err) => {
                let id =
                    sqlx::query_scalar::<_, i64>("SELECT id FROM candidates WHERE email = $1")
                        .bind(&payload.email)
                        .fetch_one(&self.pool)
                        .await?;
                Err(Error::DuplicateCandidate { id })
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn get(&self, id: i64) -> Result<Option<Candidate>> {
        let candidate = sqlx::query_as::<_, Candidate>(&format!(
            "SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(candidate)
    }

    pub async fn list(&self) -> Result<Vec<Candidate>> {
        let candidates = sqlx::query_as::<_, Candidate>(&format!(
            "SELECT {CANDIDATE_COLUMNS} FROM candidates ORDER BY created_at DESC LIMIT 5000"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(candidates)
    }

    /// Full overwrite of the profile columns. The status column only changes
    /// when the payload carries a status, and that change is logged.
    pub async fn update(
        &self,
        id: i64,
        payload: &CandidatePayload,
        actor: &AuthUser,
    ) -> Result<Candidate> {
        let status = parse_status(payload.status.as_deref())?;

        let updated = sqlx::query_as::<_, Candidate>(&format!(
            r#"
            UPDATE candidates SET
                first_name = $1,
                last_name = $2,
                email = $3,
                phone = $4,
                skills = $5,
                education = $6,
                current_employer = $7,
                overall_experience_years = $8,
                relevant_experience_years = $9,
                current_salary = $10,
                expected_salary = $11,
                notice_period = $12,
                position = $13,
                status = COALESCE($14, status),
                updated_by = $15,
                updated_by_name = $16,
                updated_at = NOW()
            WHERE id = $17
            RETURNING {CANDIDATE_COLUMNS}
            "#
        ))
        .bind(&payload.first_name)
        .bind(&payload.last_name)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(&payload.skills)
        .bind(&payload.education)
        .bind(&payload.current_employer)
        .bind(payload.overall_experience_years)
        .bind(payload.relevant_experience_years)
        .bind(payload.current_salary)
        .bind(payload.expected_salary)
        .bind(&payload.notice_period)
        .bind(&payload.position)
        .bind(status.map(|s| s.as_str()))
        .bind(actor.id)
        .bind(&actor.name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Candidate not found".to_string()))?;

        if let Some(status) = status {
            self.append_status_log(id, actor.id, status).await?;
        }

        Ok(updated)
    }

    /// Updates the workflow state and appends one audit row. The status
    /// update is not rolled back if the log insert fails.
    pub async fn set_status(
        &self,
        id: i64,
        actor: &AuthUser,
        status: CandidateStatus,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE candidates
            SET status = $1, updated_by = $2, updated_by_name = $3, updated_at = NOW()
            WHERE id = $4
            "#,
        )
        .bind(status.as_str())
        .bind(actor.id)
        .bind(&actor.name)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Candidate not found".to_string()));
        }

        self.append_status_log(id, actor.id, status).await
    }

    /// Deletes a candidate, removing dependent status logs first; the schema
    /// has no cascades.
    pub async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM candidate_status_logs WHERE candidate_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let result = sqlx::query("DELETE FROM candidates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Candidate not found".to_string()));
        }
        Ok(())
    }

    /// Latest logged status per candidate for one HR user, newest first. The
    /// view is derived from the append-only log on every call.
    pub async fn status_activity(&self, hr_id: i64) -> Result<Vec<StatusActivity>> {
        let rows = sqlx::query_as::<_, StatusActivity>(
            r#"
            SELECT sal.id, sal.status, sal.created_at, c.first_name, c.last_name
            FROM candidate_status_logs sal
            JOIN (
                SELECT candidate_id, MAX(created_at) AS latest
                FROM candidate_status_logs
                GROUP BY candidate_id
            ) latest_logs
              ON sal.candidate_id = latest_logs.candidate_id
             AND sal.created_at = latest_logs.latest
            JOIN candidates c ON c.id = sal.candidate_id
            WHERE sal.hr_id = $1
            ORDER BY sal.created_at DESC
            "#,
        )
        .bind(hr_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn append_status_log(
        &self,
        candidate_id: i64,
        hr_id: i64,
        status: CandidateStatus,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO candidate_status_logs (candidate_id, hr_id, status) VALUES ($1, $2, $3)",
        )
        .bind(candidate_id)
        .bind(hr_id)
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn parse_status(value: Option<&str>) -> Result<Option<CandidateStatus>> {
    match value {
        None => Ok(None),
        Some(raw) => CandidateStatus::parse(raw)
            .map(Some)
            .ok_or_else(|| Error::BadRequest(format!("Unknown candidate status: {raw}"))),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err.as_database_error().and_then(|db| db.code()),
        Some(code) if code == "23505"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_values_are_rejected() {
        assert!(parse_status(Some("shortlisted")).is_err());
        assert_eq!(
            parse_status(Some("invitation_sent")).unwrap(),
            Some(CandidateStatus::InvitationSent)
        );
        assert_eq!(parse_status(None).unwrap(), None);
    }
}
