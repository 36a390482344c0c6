use std::env;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    routing::post,
    Router,
};
use bytes::Bytes;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value as JsonValue;
use tower::ServiceExt;

use hireflow_backend::error::Result;
use hireflow_backend::middleware::auth::Claims;
use hireflow_backend::services::docai_service::OcrBackend;
use hireflow_backend::services::storage_service::ObjectStore;
use hireflow_backend::AppState;

struct StubStore;

#[async_trait::async_trait]
impl ObjectStore for StubStore {
    async fn put(&self, key: &str, _data: Bytes, _content_type: &str) -> Result<String> {
        Ok(format!("https://store.local/resumes-bucket/{key}"))
    }

    async fn signed_get(&self, key: &str, _ttl: Duration) -> Result<String> {
        Ok(format!("https://store.local/signed/{key}"))
    }

    fn object_key(&self, url: &str) -> Option<String> {
        url.split("resumes-bucket/").nth(1).map(str::to_string)
    }
}

struct StubOcr;

#[async_trait::async_trait]
impl OcrBackend for StubOcr {
    async fn process(&self, _content: &[u8], _mime_type: &str) -> Result<String> {
        Ok(String::new())
    }
}

// The pool is lazy and the cases below all fail before any query runs, so no
// database is needed.
fn test_app() -> Router {
    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    env::set_var("DATABASE_URL", "postgres://localhost:5432/hireflow_test");
    env::set_var("JWT_SECRET", "test_secret_key");
    env::set_var("DOCUMENT_AI_ENDPOINT", "https://docai.local");
    env::set_var("DOCUMENT_AI_PROCESSOR", "projects/p/locations/us/processors/x");
    env::set_var("DOCUMENT_AI_ACCESS_TOKEN", "docai-test");
    env::set_var("S3_ENDPOINT", "https://store.local");
    env::set_var("S3_REGION", "us-east-1");
    env::set_var("S3_BUCKET", "resumes-bucket");
    env::set_var("AWS_ACCESS_KEY", "test-access");
    env::set_var("AWS_SECRET_KEY", "test-secret");
    env::set_var("API_RPS", "100");
    let _ = hireflow_backend::config::init_config();

    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy("postgres://localhost:5432/hireflow_test")
        .expect("lazy pool");

    let app_state = AppState::new(pool, Arc::new(StubStore), Arc::new(StubOcr));

    Router::new()
        .route(
            "/api/resumes/upload",
            post(hireflow_backend::routes::resume_routes::upload_resume),
        )
        .layer(axum::middleware::from_fn(
            hireflow_backend::middleware::auth::require_hr,
        ))
        .with_state(app_state)
}

fn bearer_token(role: &str) -> String {
    let claims = Claims {
        sub: "7".to_string(),
        name: "Test HR".to_string(),
        exp: 4102444800, // 2100-01-01
        role: Some(role.to_string()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"test_secret_key"),
    )
    .expect("sign token")
}

const BOUNDARY: &str = "hireflow-test-boundary";

fn multipart_request(token: Option<&str>, parts: &[(&str, Option<(&str, &str)>, &str)]) -> Request<Body> {
    let mut body = String::new();
    for (name, file, value) in parts {
        body.push_str(&format!("--{BOUNDARY}\r\n"));
        match file {
            Some((filename, content_type)) => {
                body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n"
                ));
                body.push_str(&format!("Content-Type: {content_type}\r\n\r\n"));
            }
            None => {
                body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
                ));
            }
        }
        body.push_str(value);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/resumes/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body)).unwrap()
}

#[tokio::test]
async fn upload_without_token_is_unauthorized() {
    let app = test_app();
    let req = multipart_request(None, &[("candidate_id", None, "42")]);
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn upload_with_wrong_role_is_forbidden() {
    let app = test_app();
    let token = bearer_token("candidate");
    let req = multipart_request(Some(&token), &[("candidate_id", None, "42")]);
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn upload_without_file_is_bad_request() {
    let app = test_app();
    let token = bearer_token("hr");
    let req = multipart_request(Some(&token), &[("candidate_id", None, "42")]);
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body: JsonValue = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "No resume file uploaded");
}

#[tokio::test]
async fn upload_with_unsupported_media_type_is_rejected() {
    let app = test_app();
    let token = bearer_token("hr");
    let req = multipart_request(
        Some(&token),
        &[
            ("resume", Some(("photo.png", "image/png")), "not-a-resume"),
            ("candidate_id", None, "42"),
        ],
    );
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body: JsonValue = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].as_str().unwrap().contains("image/png"));
}

#[tokio::test]
async fn upload_without_candidate_id_is_bad_request() {
    let app = test_app();
    let token = bearer_token("hr");
    let req = multipart_request(
        Some(&token),
        &[("resume", Some(("cv.pdf", "application/pdf")), "%PDF-1.4")],
    );
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body: JsonValue = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "candidate_id is required");
}
