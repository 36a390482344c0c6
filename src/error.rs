use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No resume file uploaded")]
    MissingFile,

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Resume parsing failed: {0}")]
    ParseFailed(String),

    #[error("Object storage error: {0}")]
    StorageFailed(String),

    #[error("Database error: {0}")]
    PersistenceFailed(sqlx::Error),

    #[error("Candidate already exists with this email")]
    DuplicateCandidate { id: i64 },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        if let Error::DuplicateCandidate { id } = self {
            let body = Json(json!({
                "error": "Candidate already exists with this email",
                "candidateId": id,
            }));
            return (StatusCode::CONFLICT, body).into_response();
        }

        let (status, error_message) = match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Error::MissingFile => (
                StatusCode::BAD_REQUEST,
                "No resume file uploaded".to_string(),
            ),
            Error::UnsupportedFormat(mime) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                format!("Unsupported file format: {}", mime),
            ),
            Error::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Json(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::Multipart(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::ParseFailed(detail) => {
                tracing::error!("Resume parsing failed: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Resume parsing failed".to_string(),
                )
            }
            Error::StorageFailed(detail) => {
                tracing::error!("Object storage error: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Object storage error".to_string(),
                )
            }
            Error::PersistenceFailed(err) => {
                tracing::error!("Database error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            Error::Anyhow(err) => {
                tracing::error!("Internal error: {err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                )
            }
            Error::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            Error::DuplicateCandidate { .. } => unreachable!("handled above"),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            other => Error::PersistenceFailed(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn duplicate_candidate_carries_conflicting_id() {
        let resp = Error::DuplicateCandidate { id: 42 }.into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let bytes = to_bytes(resp.into_body(), 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["candidateId"], 42);
    }

    #[tokio::test]
    async fn unsupported_format_maps_to_415() {
        let resp = Error::UnsupportedFormat("image/png".into()).into_response();
        assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn missing_file_maps_to_400() {
        let resp = Error::MissingFile.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
