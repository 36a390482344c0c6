pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use sqlx::PgPool;

use crate::services::{
    candidate_service::CandidateService, docai_service::OcrBackend,
    interview_service::InterviewService, resume_service::ResumeService,
    storage_service::ObjectStore,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub resume_service: ResumeService,
    pub candidate_service: CandidateService,
    pub interview_service: InterviewService,
}

impl AppState {
    /// The object store and OCR backend are injected rather than constructed
    /// here so tests can substitute doubles for both collaborators.
    pub fn new(pool: PgPool, store: Arc<dyn ObjectStore>, ocr: Arc<dyn OcrBackend>) -> Self {
        let resume_service = ResumeService::new(pool.clone(), store, ocr);
        let candidate_service = CandidateService::new(pool.clone());
        let interview_service = InterviewService::new(pool.clone(), candidate_service.clone());

        Self {
            pool,
            resume_service,
            candidate_service,
            interview_service,
        }
    }
}
