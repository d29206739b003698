mod analysis;
mod config;
mod errors;
mod extraction;
mod llm_client;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::analyzer::Analyzer;
use crate::config::Config;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; a missing API key stops the process here.
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CareerCraft v{}", env!("CARGO_PKG_VERSION"));
    info!("API key loaded from {}", config.api_key_source);

    // Initialize LLM client
    let gemini = GeminiClient::new(
        config.gemini_api_base.clone(),
        config.gemini_api_key.clone(),
        Duration::from_secs(config.llm_timeout_secs),
    )?;
    let analyzer = match &config.pinned_model {
        Some(model) => {
            info!("LLM client initialized (pinned model: {model})");
            Analyzer::pinned(Arc::new(gemini), model.clone())
        }
        None => {
            info!(
                "LLM client initialized (candidates: {})",
                config.model_candidates.join(", ")
            );
            Analyzer::new(Arc::new(gemini), config.model_candidates.clone())
        }
    };
    info!(
        "Prompt budgets: job_description={} chars, resume={} chars",
        config.budgets.job_description, config.budgets.resume
    );

    // Build app state
    let state = AppState {
        analyzer: Arc::new(analyzer),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
