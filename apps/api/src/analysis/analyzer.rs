//! Analyzer — runs a composed prompt against the selected model and folds
//! every failure into an `AnalysisOutcome` instead of an error.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::llm_client::model_selection::select_model;
use crate::llm_client::{LlmError, TextGenerator};

/// Text shown in place of a result when the analysis could not run.
pub const ANALYSIS_FAILED_SENTINEL: &str = "Analysis unavailable. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Authentication,
    RateLimited,
    NoUsableBackend,
    Upstream,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Completed { text: String, model: String },
    Failed { kind: FailureKind, diagnostic: String },
}

impl AnalysisOutcome {
    /// The model's text, or the sentinel when the call failed.
    pub fn display_text(&self) -> &str {
        match self {
            AnalysisOutcome::Completed { text, .. } => text,
            AnalysisOutcome::Failed { .. } => ANALYSIS_FAILED_SENTINEL,
        }
    }

    fn from_error(error: &LlmError) -> Self {
        let (kind, diagnostic) = match error {
            LlmError::Auth(_) => (
                FailureKind::Authentication,
                "The analysis service rejected the configured API key.".to_string(),
            ),
            LlmError::Quota(_) => (
                FailureKind::RateLimited,
                "The analysis service quota is exhausted. Wait a minute and resubmit."
                    .to_string(),
            ),
            LlmError::NoUsableModel { tried, .. } => (
                FailureKind::NoUsableBackend,
                format!("No analysis model is available (tried {}).", tried.join(", ")),
            ),
            LlmError::Blocked(reason) => (
                FailureKind::Upstream,
                format!("The analysis service declined the request ({reason})."),
            ),
            LlmError::EmptyContent => (
                FailureKind::Upstream,
                "The analysis service returned an empty response.".to_string(),
            ),
            LlmError::Http(e) if e.is_timeout() => (
                FailureKind::Upstream,
                "The analysis service timed out.".to_string(),
            ),
            _ => (
                FailureKind::Upstream,
                "The analysis service returned an error.".to_string(),
            ),
        };
        AnalysisOutcome::Failed { kind, diagnostic }
    }
}

/// Owns the generator and the process-wide model choice.
///
/// The model is selected on first use and cached for the life of the process.
/// A failed selection caches nothing, so the next request tries again.
pub struct Analyzer {
    generator: Arc<dyn TextGenerator>,
    candidates: Vec<String>,
    selected: OnceCell<String>,
}

impl Analyzer {
    pub fn new(generator: Arc<dyn TextGenerator>, candidates: Vec<String>) -> Self {
        Self {
            generator,
            candidates,
            selected: OnceCell::new(),
        }
    }

    /// Skips selection and uses `model` for every request.
    pub fn pinned(generator: Arc<dyn TextGenerator>, model: String) -> Self {
        Self {
            generator,
            candidates: vec![model.clone()],
            selected: OnceCell::new_with(Some(model)),
        }
    }

    /// The model in use, if one has been selected yet.
    pub fn selected_model(&self) -> Option<&str> {
        self.selected.get().map(String::as_str)
    }

    async fn model(&self) -> Result<&str, LlmError> {
        self.selected
            .get_or_try_init(|| select_model(self.generator.as_ref(), &self.candidates))
            .await
            .map(String::as_str)
    }

    /// Sends `prompt` and returns the model's reply verbatim.
    pub async fn analyze(&self, prompt: &str) -> AnalysisOutcome {
        let model = match self.model().await {
            Ok(model) => model,
            Err(e) => {
                warn!("Model selection failed: {e}");
                return AnalysisOutcome::from_error(&e);
            }
        };

        match self.generator.generate(model, prompt).await {
            Ok(text) => {
                info!("Analysis completed with {model} ({} chars)", text.len());
                AnalysisOutcome::Completed {
                    text,
                    model: model.to_string(),
                }
            }
            Err(e) => {
                warn!("Analysis call to {model} failed: {e}");
                AnalysisOutcome::from_error(&e)
            }
        }
    }
}
