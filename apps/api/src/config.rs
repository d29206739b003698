use anyhow::{bail, Context, Result};

use crate::analysis::prompt::PromptBudgets;

/// Credential sources, checked in this order. The last entry names a file
/// whose contents hold the key (container-secret style).
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];
pub const API_KEY_FILE_ENV_VAR: &str = "GEMINI_API_KEY_FILE";

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Ranked fallback list. Model names drift on the provider side, so the first
/// one that answers a smoke check wins.
pub const DEFAULT_MODEL_CANDIDATES: [&str; 3] =
    ["gemini-2.0-flash", "gemini-1.5-flash", "gemini-1.5-pro"];

/// Application configuration loaded from environment variables.
/// Startup fails if no API credential can be resolved.
#[derive(Clone)]
pub struct Config {
    pub gemini_api_key: String,
    /// Name of the variable the key came from; safe to log.
    pub api_key_source: &'static str,
    pub gemini_api_base: String,
    /// Ranked candidates for model selection.
    pub model_candidates: Vec<String>,
    /// Set when `GEMINI_MODEL` pins a model; selection is skipped.
    pub pinned_model: Option<String>,
    pub budgets: PromptBudgets,
    pub max_upload_bytes: usize,
    pub llm_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

// Hand-written so the key never ends up in a log line.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("gemini_api_key", &"<redacted>")
            .field("api_key_source", &self.api_key_source)
            .field("gemini_api_base", &self.gemini_api_base)
            .field("model_candidates", &self.model_candidates)
            .field("pinned_model", &self.pinned_model)
            .field("budgets", &self.budgets)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("llm_timeout_secs", &self.llm_timeout_secs)
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests can supply a
    /// substitute environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (gemini_api_key, api_key_source) = resolve_api_key(&lookup)?;

        let pinned_model = non_blank(lookup("GEMINI_MODEL"));
        let model_candidates = match &pinned_model {
            Some(model) => vec![model.clone()],
            None => match non_blank(lookup("GEMINI_MODELS")) {
                Some(list) => parse_model_list(&list),
                None => DEFAULT_MODEL_CANDIDATES.iter().map(|m| m.to_string()).collect(),
            },
        };
        if model_candidates.is_empty() {
            bail!("GEMINI_MODELS must name at least one model");
        }

        let defaults = PromptBudgets::default();
        let budgets = PromptBudgets {
            job_description: parse_or(
                &lookup,
                "JOB_DESCRIPTION_CHAR_BUDGET",
                defaults.job_description,
            )?,
            resume: parse_or(&lookup, "RESUME_CHAR_BUDGET", defaults.resume)?,
        };

        Ok(Config {
            gemini_api_key,
            api_key_source,
            gemini_api_base: non_blank(lookup("GEMINI_API_BASE"))
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
            model_candidates,
            pinned_model,
            budgets,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            llm_timeout_secs: parse_or(&lookup, "LLM_TIMEOUT_SECS", 120)?,
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

/// Resolves the API key from the first source that yields a non-blank value,
/// returning it with the name of that source.
fn resolve_api_key<F>(lookup: &F) -> Result<(String, &'static str)>
where
    F: Fn(&str) -> Option<String>,
{
    for var in API_KEY_ENV_VARS {
        if let Some(key) = non_blank(lookup(var)) {
            return Ok((key, var));
        }
    }

    if let Some(path) = non_blank(lookup(API_KEY_FILE_ENV_VAR)) {
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {API_KEY_FILE_ENV_VAR} at '{path}'"))?;
        if let Some(key) = non_blank(Some(contents)) {
            return Ok((key, API_KEY_FILE_ENV_VAR));
        }
    }

    bail!(
        "No API key configured: set one of {}, {} or {API_KEY_FILE_ENV_VAR}",
        API_KEY_ENV_VARS[0],
        API_KEY_ENV_VARS[1]
    )
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_model_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from)
        .collect()
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match non_blank(lookup(key)) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
