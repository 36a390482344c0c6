use axum::{extract::State, Extension, Json};

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::AppState;

/// Latest status per candidate touched by the requesting HR user, derived
/// from the append-only status log.
pub async fn get_status_activity(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl axum::response::IntoResponse> {
    let activity = state.candidate_service.status_activity(user.id).await?;
    Ok(Json(activity))
}
