// ATS analysis: validate input, extract résumé text, compose the prompt, run
// it through the Analyzer and package the reply for the page.
// All model calls go through llm_client via the Analyzer.

pub mod analyzer;
pub mod handlers;
pub mod prompt;
pub mod sections;

use anyhow::anyhow;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::analysis::analyzer::{AnalysisOutcome, Analyzer, FailureKind};
use crate::analysis::prompt::{compose_prompt, PromptBudgets, PROMPT_VERSION};
use crate::analysis::sections::{has_required_sections, parse_match_score};
use crate::errors::AppError;
use crate::extraction::extract_document_text;

pub const MISSING_JOB_DESCRIPTION: &str = "Please paste a job description.";
pub const MISSING_RESUME: &str = "Please upload your resume PDF.";
pub const BLANK_RESUME: &str = "No text could be extracted from the resume. \
    Please upload a text-based PDF rather than a scanned image.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct TruncationReport {
    pub job_description: bool,
    pub resume: bool,
}

/// What the page renders after a submission.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub analysis_id: Uuid,
    pub status: AnalysisStatus,
    /// Model reply verbatim, or the failure sentinel.
    pub result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_kind: Option<FailureKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub match_score: Option<u8>,
    pub sections_complete: bool,
    pub resume_pages: usize,
    pub truncation: TruncationReport,
    pub prompt_version: &'static str,
    pub analyzed_at: DateTime<Utc>,
}

/// Runs one submission end to end. Input problems are returned as errors
/// before the model is ever called; model failures come back inside the
/// report.
pub async fn run_analysis(
    analyzer: &Analyzer,
    budgets: &PromptBudgets,
    job_description: Option<&str>,
    resume: Option<Bytes>,
) -> Result<AnalysisReport, AppError> {
    let job_description = job_description
        .filter(|jd| !jd.trim().is_empty())
        .ok_or_else(|| AppError::Validation(MISSING_JOB_DESCRIPTION.to_string()))?;
    let resume = resume
        .filter(|bytes| !bytes.is_empty())
        .ok_or_else(|| AppError::Validation(MISSING_RESUME.to_string()))?;

    let analysis_id = Uuid::new_v4();
    analyze_resume(analyzer, budgets, analysis_id, job_description, resume)
        .instrument(info_span!("analysis", %analysis_id))
        .await
}

async fn analyze_resume(
    analyzer: &Analyzer,
    budgets: &PromptBudgets,
    analysis_id: Uuid,
    job_description: &str,
    resume: Bytes,
) -> Result<AnalysisReport, AppError> {
    let extracted = tokio::task::spawn_blocking(move || extract_document_text(&resume))
        .await
        .map_err(|e| AppError::Internal(anyhow!("Extraction task failed: {e}")))?;

    if let Some(warning) = &extracted.warning {
        return Err(AppError::UnprocessableEntity(warning.clone()));
    }
    if extracted.is_blank() {
        return Err(AppError::UnprocessableEntity(BLANK_RESUME.to_string()));
    }

    let prompt = compose_prompt(job_description, &extracted.text, budgets);
    info!(
        "Prompt composed: {} chars, jd_truncated={}, resume_truncated={}",
        prompt.text.chars().count(),
        prompt.job_description_truncated,
        prompt.resume_truncated
    );

    let outcome = analyzer.analyze(&prompt.text).await;
    let result = outcome.display_text().to_string();

    let (status, diagnostic, failure_kind, model, match_score, sections_complete) = match outcome {
        AnalysisOutcome::Completed { text, model } => (
            AnalysisStatus::Completed,
            None,
            None,
            Some(model),
            parse_match_score(&text),
            has_required_sections(&text),
        ),
        AnalysisOutcome::Failed { kind, diagnostic } => (
            AnalysisStatus::Failed,
            Some(diagnostic),
            Some(kind),
            None,
            None,
            false,
        ),
    };

    Ok(AnalysisReport {
        analysis_id,
        status,
        result,
        diagnostic,
        failure_kind,
        model,
        match_score,
        sections_complete,
        resume_pages: extracted.page_count,
        truncation: TruncationReport {
            job_description: prompt.job_description_truncated,
            resume: prompt.resume_truncated,
        },
        prompt_version: PROMPT_VERSION,
        analyzed_at: Utc::now(),
    })
}
