pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::web::{api, pages};

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // HTML workflow
        .route("/", get(pages::upload_form).post(pages::upload_resume))
        .route("/job/:job_id", get(pages::job_detail))
        // JSON API
        .route("/api/v1/resumes", post(api::handle_upload))
        .route("/api/v1/jobs", get(api::handle_list_jobs))
        .route("/api/v1/jobs/:job_id", get(api::handle_get_job))
        .fallback(pages::not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
