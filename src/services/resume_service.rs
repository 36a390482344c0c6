use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::Utc;
use sqlx::PgPool;

use crate::error::{Error, Result};
use crate::middleware::auth::AuthUser;
use crate::models::resume_version::{ResumeUpdate, ResumeVersion};
use crate::services::docai_service::OcrBackend;
use crate::services::parser_service::{ParsedResumeFields, ResumeParser};
use crate::services::storage_service::ObjectStore;

pub const SIGNED_URL_TTL: Duration = Duration::from_secs(300);

pub struct IngestOutcome {
    pub parsed: ParsedResumeFields,
    pub resume_url: String,
}

#[derive(Clone)]
pub struct ResumeService {
    pool: PgPool,
    parser: ResumeParser,
    store: Arc<dyn ObjectStore>,
}

impl ResumeService {
    pub fn new(pool: PgPool, store: Arc<dyn ObjectStore>, ocr: Arc<dyn OcrBackend>) -> Self {
        Self {
            pool,
            parser: ResumeParser::new(ocr),
            store,
        }
    }

    /// The ingestion pipeline: parse, store, then persist, strictly in that
    /// order with no retries. Parse and storage failures leave no state
    /// behind. A database failure after the storage write leaves an
    /// unreferenced object in the store; keys are generated per upload, so
    /// the orphan is never served and a client resubmission starts clean.
    pub async fn ingest_resume(
        &self,
        candidate_id: i64,
        actor: &AuthUser,
        data: Bytes,
        media_type: &str,
        original_filename: &str,
    ) -> Result<IngestOutcome> {
        let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM candidates WHERE id = $1")
            .bind(candidate_id)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_none() {
            return Err(Error::NotFound("Candidate not found".to_string()));
        }

        let parsed = self.parser.parse(&data, media_type).await?;

        let key = storage_key(original_filename);
        let resume_url = self.store.put(&key, data, media_type).await?;

        // Latest resume wins: the parsed values replace the profile fields
        // wholesale, empty results included (stored as NULL). Email is the
        // identity column and NOT NULL, so it keeps its old value when the
        // parse finds none.
        sqlx::query(
            r#"
            UPDATE candidates SET
                first_name = $1,
                last_name = $2,
                email = COALESCE($3, email),
                phone = $4,
                skills = $5,
                education = $6,
                updated_by = $7,
                updated_by_name = $8,
                updated_at = NOW()
            WHERE id = $9
            "#,
        )
        .bind(none_if_empty(&parsed.first_name))
        .bind(none_if_empty(&parsed.last_name))
        .bind(none_if_empty(&parsed.email))
        .bind(none_if_empty(&parsed.phone))
        .bind(none_if_empty(&parsed.skills))
        .bind(none_if_empty(&parsed.education))
        .bind(actor.id)
        .bind(&actor.name)
        .bind(candidate_id)
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO resume_versions (candidate_id, resume_file_path, updated_by, updated_by_name)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(candidate_id)
        .bind(&resume_url)
        .bind(actor.id)
        .bind(&actor.name)
        .execute(&self.pool)
        .await?;

        tracing::info!(candidate_id, key = %key, "resume ingested");

        Ok(IngestOutcome { parsed, resume_url })
    }

    pub async fn versions_for_candidate(&self, candidate_id: i64) -> Result<Vec<ResumeVersion>> {
        let versions = sqlx::query_as::<_, ResumeVersion>(
            r#"
            SELECT id, candidate_id, resume_file_path, updated_by, updated_by_name, created_at
            FROM resume_versions
            WHERE candidate_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(versions)
    }

    pub async fn get_version(&self, id: i64) -> Result<Option<ResumeVersion>> {
        let version = sqlx::query_as::<_, ResumeVersion>(
            r#"
            SELECT id, candidate_id, resume_file_path, updated_by, updated_by_name, created_at
            FROM resume_versions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(version)
    }

    /// Resolves a version row to a short-lived signed URL instead of
    /// streaming the bytes through this service.
    pub async fn download_url(&self, id: i64) -> Result<String> {
        let version = self
            .get_version(id)
            .await?
            .ok_or_else(|| Error::NotFound("Resume not found".to_string()))?;

        let key = self
            .store
            .object_key(&version.resume_file_path)
            .ok_or_else(|| {
                Error::StorageFailed(format!(
                    "unrecognized storage path: {}",
                    version.resume_file_path
                ))
            })?;

        self.store.signed_get(&key, SIGNED_URL_TTL).await
    }

    pub async fn list_all_updates(&self) -> Result<Vec<ResumeUpdate>> {
        let updates = sqlx::query_as::<_, ResumeUpdate>(
            r#"
            SELECT
                rv.id,
                rv.candidate_id,
                rv.resume_file_path,
                rv.updated_by_name,
                rv.created_at,
                c.first_name,
                c.last_name
            FROM resume_versions rv
            LEFT JOIN candidates c ON c.id = rv.candidate_id
            ORDER BY rv.created_at DESC
            LIMIT 5000
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(updates)
    }
}

fn storage_key(original_filename: &str) -> String {
    let sanitized: String = original_filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("resumes/{}_{}", Utc::now().timestamp_millis(), sanitized)
}

fn none_if_empty(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_key_sanitizes_the_filename() {
        let key = storage_key("John Smith (final).pdf");
        assert!(key.starts_with("resumes/"));
        assert!(key.ends_with("_John_Smith__final_.pdf"));
    }

    #[test]
    fn storage_keys_differ_across_uploads_of_the_same_file() {
        let a = storage_key("cv.pdf");
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = storage_key("cv.pdf");
        assert_ne!(a, b);
    }

    #[test]
    fn empty_parsed_fields_persist_as_null() {
        assert_eq!(none_if_empty(""), None);
        assert_eq!(none_if_empty("Go, Rust"), Some("Go, Rust"));
    }
}
