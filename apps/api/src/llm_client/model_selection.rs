//! Model selection: walk a ranked list of model identifiers and keep the first
//! one that answers a trivial request.

use tracing::{info, warn};

use super::{LlmError, TextGenerator};

/// Deliberately tiny so selection costs next to nothing against the quota.
pub const SMOKE_PROMPT: &str = "Reply with the single word OK.";

/// Returns the first candidate that answers `SMOKE_PROMPT`.
///
/// An authentication or quota failure ends selection at once: every
/// candidate shares the same key and quota, so trying the rest would only
/// repeat the rejection and spend more of an exhausted quota.
pub async fn select_model(
    generator: &dyn TextGenerator,
    candidates: &[String],
) -> Result<String, LlmError> {
    let mut last_error: Option<LlmError> = None;

    for model in candidates {
        match generator.generate(model, SMOKE_PROMPT).await {
            Ok(_) => {
                info!("Selected model {model}");
                return Ok(model.clone());
            }
            Err(LlmError::Auth(message)) => {
                warn!("Smoke check for {model} rejected the API key");
                return Err(LlmError::Auth(message));
            }
            Err(LlmError::Quota(message)) => {
                warn!("Smoke check for {model} hit the quota");
                return Err(LlmError::Quota(message));
            }
            Err(e) => {
                warn!("Smoke check for {model} failed: {e}");
                last_error = Some(e);
            }
        }
    }

    Err(LlmError::NoUsableModel {
        tried: candidates.to_vec(),
        last_error: last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no candidates configured".to_string()),
    })
}
