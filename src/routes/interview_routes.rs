use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::json;

use crate::dto::interview_dto::{
    CreateInterviewPayload, UpdateInterviewPayload, UpdateInterviewStatusPayload,
};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::AppState;

pub async fn create_interview(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateInterviewPayload>,
) -> Result<impl axum::response::IntoResponse> {
    let interview = state.interview_service.create(&payload, &user).await?;
    Ok((StatusCode::CREATED, Json(interview)))
}

pub async fn list_interviews(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse> {
    let interviews = state.interview_service.list().await?;
    Ok(Json(interviews))
}

pub async fn get_interviews_by_candidate(
    State(state): State<AppState>,
    Path(candidate_id): Path<i64>,
) -> Result<impl axum::response::IntoResponse> {
    let interviews = state
        .interview_service
        .list_by_candidate(candidate_id)
        .await?;
    Ok(Json(interviews))
}

pub async fn update_interview(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateInterviewPayload>,
) -> Result<impl axum::response::IntoResponse> {
    let interview = state.interview_service.update(id, &payload).await?;
    Ok(Json(interview))
}

pub async fn update_interview_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateInterviewStatusPayload>,
) -> Result<impl axum::response::IntoResponse> {
    state
        .interview_service
        .update_status(id, &payload.status, &user)
        .await?;
    Ok(Json(json!({ "message": "Status updated" })))
}
