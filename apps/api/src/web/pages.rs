use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::errors::AppError;
use crate::state::AppState;
use crate::upload::UploadRejection;

use super::{process_upload, views};

/// `AppError` rendered as a page instead of JSON.
pub struct PageError(AppError);

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, _code, message) = self.0.parts();
        let page = match self.0 {
            // A refused upload goes back to the form with the reason.
            AppError::Upload(_) => views::index_page(Some(&message)),
            _ => views::error_page(status, &message),
        };
        (status, Html(page)).into_response()
    }
}

/// GET /
pub async fn upload_form() -> Html<String> {
    Html(views::index_page(None))
}

/// POST /
pub async fn upload_resume(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Html<String>, PageError> {
    let multipart = multipart.map_err(|_| AppError::Upload(UploadRejection::MissingFile))?;
    let results = process_upload(&state, multipart).await?;
    Ok(Html(views::results_page(&results)))
}

/// GET /job/:job_id
pub async fn job_detail(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Html<String>, PageError> {
    let job = state
        .matcher
        .get_job(&job_id)
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
    Ok(Html(views::job_page(job, state.matcher.catalog().headers())))
}

/// Fallback for unknown paths.
pub async fn not_found() -> (StatusCode, Html<String>) {
    (
        StatusCode::NOT_FOUND,
        Html(views::error_page(StatusCode::NOT_FOUND, "Page not found")),
    )
}
