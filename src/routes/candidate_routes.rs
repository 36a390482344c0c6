use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::json;
use validator::Validate;

use crate::dto::candidate_dto::{CandidatePayload, UpdateStatusPayload};
use crate::error::{Error, Result};
use crate::middleware::auth::AuthUser;
use crate::models::candidate::CandidateStatus;
use crate::AppState;

pub async fn create_candidate(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CandidatePayload>,
) -> Result<impl axum::response::IntoResponse> {
    payload.validate()?;
    let candidate = state.candidate_service.create(&payload, &user).await?;
    Ok((StatusCode::CREATED, Json(candidate)))
}

pub async fn list_candidates(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse> {
    let candidates = state.candidate_service.list().await?;
    Ok(Json(candidates))
}

pub async fn get_candidate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse> {
    let candidate = state.candidate_service.get(id).await?;
    match candidate {
        Some(c) => Ok(Json(c)),
        None => Err(Error::NotFound("Candidate not found".to_string())),
    }
}

pub async fn update_candidate(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(payload): Json<CandidatePayload>,
) -> Result<impl axum::response::IntoResponse> {
    payload.validate()?;
    let candidate = state.candidate_service.update(id, &payload, &user).await?;
    Ok(Json(candidate))
}

pub async fn update_candidate_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<impl axum::response::IntoResponse> {
    let status = CandidateStatus::parse(&payload.status).ok_or_else(|| {
        Error::BadRequest(format!("Unknown candidate status: {}", payload.status))
    })?;
    state.candidate_service.set_status(id, &user, status).await?;
    Ok(Json(json!({ "message": "Status updated" })))
}

pub async fn delete_candidate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse> {
    state.candidate_service.delete(id).await?;
    Ok(Json(json!({ "message": "Candidate deleted successfully" })))
}
