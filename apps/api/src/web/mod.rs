//! Upload workflow shared by the HTML pages and the JSON API.

pub mod api;
pub mod pages;
pub mod views;

use anyhow::Context;
use axum::extract::Multipart;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::job::JobMatch;
use crate::models::resume::ResumeRecord;
use crate::state::AppState;
use crate::upload::{validate_contents, validate_upload, RESUME_FIELD};

/// Everything the results page and `POST /api/v1/resumes` show.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeResults {
    pub resume: ResumeRecord,
    pub matches: Vec<JobMatch>,
    pub match_count: usize,
    pub parsed_at: DateTime<Utc>,
}

struct UploadedFile {
    filename: Option<String>,
    bytes: Bytes,
}

/// Pulls the `resume` field out of the form. Other fields are skipped.
async fn read_resume_field(multipart: &mut Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }
        let filename = Some(field.file_name().unwrap_or_default().to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
        return Ok(UploadedFile { filename, bytes });
    }
    Ok(UploadedFile {
        filename: None,
        bytes: Bytes::new(),
    })
}

/// Validates, saves, parses and matches one uploaded resume.
pub async fn process_upload(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<ResumeResults, AppError> {
    let upload = read_resume_field(&mut multipart).await?;
    let extension = validate_upload(upload.filename.as_deref())?;
    validate_contents(&upload.bytes)?;

    let original = upload.filename.unwrap_or_default();
    let path = state
        .uploads
        .save(&original, &upload.bytes)
        .await
        .context("Failed to save upload")?;
    info!(
        "Stored {} upload {original:?} as {}",
        extension.as_str(),
        path.display()
    );

    let parser = state.parser.clone();
    let matcher = state.matcher.clone();
    let top_n = state.config.match_top_n;

    let (resume, matches) = tokio::task::spawn_blocking(move || {
        let resume = parser.parse(&path)?;
        let matches = matcher.match_jobs(&resume.skill_list(), &resume.experience, top_n);
        Ok::<_, AppError>((resume, matches))
    })
    .await
    .context("Resume parsing task failed")??;

    info!(
        "Matched {} jobs for upload {original:?} ({} skills)",
        matches.len(),
        resume.skills.len()
    );

    Ok(ResumeResults {
        match_count: matches.len(),
        resume,
        matches,
        parsed_at: Utc::now(),
    })
}
