use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    Json,
};

use crate::errors::AppError;
use crate::models::job::JobPosting;
use crate::state::AppState;
use crate::upload::UploadRejection;

use super::{process_upload, ResumeResults};

/// POST /api/v1/resumes
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ResumeResults>, AppError> {
    let multipart = multipart.map_err(|_| UploadRejection::MissingFile)?;
    Ok(Json(process_upload(&state, multipart).await?))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(State(state): State<AppState>) -> Json<Vec<JobPosting>> {
    Json(state.matcher.catalog().jobs().to_vec())
}

/// GET /api/v1/jobs/:job_id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<JobPosting>, AppError> {
    state
        .matcher
        .get_job(&job_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))
}
