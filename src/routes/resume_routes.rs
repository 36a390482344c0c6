use axum::{
    extract::{Multipart, Path, State},
    Extension, Json,
};
use bytes::Bytes;

use crate::dto::resume_dto::{DownloadLinkResponse, UploadResumeResponse};
use crate::error::{Error, Result};
use crate::middleware::auth::AuthUser;
use crate::services::parser_service::SUPPORTED_MEDIA_TYPES;
use crate::services::resume_service::SIGNED_URL_TTL;
use crate::AppState;

/// Multipart upload: a `resume` file plus a `candidate_id` text field. The
/// file is validated here before the pipeline runs so a bad request never
/// reaches storage or the database.
pub async fn upload_resume(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<impl axum::response::IntoResponse> {
    let mut candidate_id: Option<i64> = None;
    let mut file: Option<(String, String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "candidate_id" => {
                let raw = field.text().await.unwrap_or_default();
                candidate_id = raw.trim().parse::<i64>().ok();
            }
            "resume" => {
                let filename = field.file_name().unwrap_or("resume.bin").to_string();
                let media_type = field.content_type().unwrap_or_default().to_string();
                let data = field.bytes().await.map_err(|e| {
                    tracing::error!("Failed to read resume upload: {}", e);
                    Error::BadRequest("Failed to read file upload".into())
                })?;
                if !data.is_empty() {
                    file = Some((filename, media_type, data));
                }
            }
            _ => {}
        }
    }

    let (filename, media_type, data) = file.ok_or(Error::MissingFile)?;
    let candidate_id = candidate_id
        .ok_or_else(|| Error::BadRequest("candidate_id is required".to_string()))?;
    if !SUPPORTED_MEDIA_TYPES.contains(&media_type.as_str()) {
        return Err(Error::UnsupportedFormat(media_type));
    }

    let outcome = state
        .resume_service
        .ingest_resume(candidate_id, &user, data, &media_type, &filename)
        .await?;

    Ok(Json(UploadResumeResponse {
        message: "Resume uploaded and parsed successfully".to_string(),
        resume_url: outcome.resume_url,
        parsed: outcome.parsed,
    }))
}

pub async fn get_resumes_by_candidate(
    State(state): State<AppState>,
    Path(candidate_id): Path<i64>,
) -> Result<impl axum::response::IntoResponse> {
    let versions = state
        .resume_service
        .versions_for_candidate(candidate_id)
        .await?;
    Ok(Json(versions))
}

pub async fn get_resume(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse> {
    let version = state.resume_service.get_version(id).await?;
    match version {
        Some(v) => Ok(Json(v)),
        None => Err(Error::NotFound("Resume not found".to_string())),
    }
}

pub async fn download_resume(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse> {
    let url = state.resume_service.download_url(id).await?;
    Ok(Json(DownloadLinkResponse {
        url,
        expires_in: SIGNED_URL_TTL.as_secs(),
    }))
}

pub async fn get_all_resume_updates(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse> {
    let updates = state.resume_service.list_all_updates().await?;
    Ok(Json(updates))
}
