//! Axum route handlers for the Analysis API.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use tracing::debug;

use crate::analysis::{run_analysis, AnalysisReport};
use crate::errors::AppError;
use crate::state::AppState;

pub const JOB_DESCRIPTION_FIELD: &str = "job_description";
pub const RESUME_FIELD: &str = "resume";

/// POST /api/v1/analyze
///
/// Multipart form with a `job_description` text field and a `resume` PDF.
/// Input problems come back as 400/422 before any model call; model failures
/// come back as a 200 report with `status: "failed"`.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisReport>, AppError> {
    let mut job_description: Option<String> = None;
    let mut resume: Option<Bytes> = None;

    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(JOB_DESCRIPTION_FIELD) => {
                job_description = Some(field.text().await.map_err(upload_error)?);
            }
            Some(RESUME_FIELD) => {
                debug!(
                    "Resume upload: file_name={:?}, content_type={:?}",
                    field.file_name(),
                    field.content_type()
                );
                resume = Some(field.bytes().await.map_err(upload_error)?);
            }
            other => debug!("Ignoring unexpected form field {other:?}"),
        }
    }

    let report = run_analysis(
        &state.analyzer,
        &state.config.budgets,
        job_description.as_deref(),
        resume,
    )
    .await?;

    Ok(Json(report))
}

fn upload_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("The uploaded resume is too large.".to_string())
    } else {
        AppError::Validation(format!("Malformed upload: {}", e.body_text()))
    }
}
