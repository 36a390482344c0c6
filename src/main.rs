use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use hireflow_backend::services::docai_service::DocumentAiClient;
use hireflow_backend::services::storage_service::S3ObjectStore;
use hireflow_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    middleware, routes, AppState,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let store = Arc::new(S3ObjectStore::from_config(config).await);
    info!("Object store client initialized (bucket: {})", config.s3_bucket);

    let ocr = Arc::new(DocumentAiClient::new(
        config.docai_endpoint.clone(),
        config.docai_processor.clone(),
        config.docai_access_token.clone(),
    ));
    info!("Document backend client initialized");

    let app_state = AppState::new(pool, store, ocr);

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let api = Router::new()
        .route(
            "/api/resumes/upload",
            post(routes::resume_routes::upload_resume),
        )
        .route(
            "/api/resumes/all-updates",
            get(routes::resume_routes::get_all_resume_updates),
        )
        .route(
            "/api/resumes/download/:id",
            get(routes::resume_routes::download_resume),
        )
        .route(
            "/api/resumes/candidate/:candidate_id",
            get(routes::resume_routes::get_resumes_by_candidate),
        )
        .route("/api/resumes/:id", get(routes::resume_routes::get_resume))
        .route(
            "/api/candidates",
            get(routes::candidate_routes::list_candidates)
                .post(routes::candidate_routes::create_candidate),
        )
        .route(
            "/api/candidates/:id",
            get(routes::candidate_routes::get_candidate)
                .put(routes::candidate_routes::update_candidate)
                .delete(routes::candidate_routes::delete_candidate),
        )
        .route(
            "/api/candidates/:id/status",
            post(routes::candidate_routes::update_candidate_status),
        )
        .route(
            "/api/interviews",
            get(routes::interview_routes::list_interviews)
                .post(routes::interview_routes::create_interview),
        )
        .route(
            "/api/interviews/candidate/:id",
            get(routes::interview_routes::get_interviews_by_candidate),
        )
        .route(
            "/api/interviews/:id",
            put(routes::interview_routes::update_interview),
        )
        .route(
            "/api/interviews/:id/status",
            put(routes::interview_routes::update_interview_status),
        )
        .route(
            "/api/profile/status-activity",
            get(routes::profile::get_status_activity),
        )
        .layer(axum::middleware::from_fn(middleware::auth::require_hr))
        .layer(axum::middleware::from_fn_with_state(
            middleware::rate_limit::Throttle::per_second(config.api_rps),
            middleware::rate_limit::throttle,
        ));

    let app = base_routes
        .merge(api)
        .with_state(app_state)
        .layer(middleware::cors::cors_layer())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
