use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Holds the generator and the once-selected model for the process.
    pub analyzer: Arc<Analyzer>,
    pub config: Config,
}
