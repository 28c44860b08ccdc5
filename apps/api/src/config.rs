use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing; the search credential
/// is deliberately optional — its absence means silent no-search mode.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    pub brave_search_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
    /// Fan-out cap: successful drafts per generation request.
    pub max_drafts: usize,
    /// Web-search snippets requested per angle.
    pub search_result_count: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            brave_search_api_key: std::env::var("BRAVE_SEARCH_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5001".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_drafts: parse_positive(
                &std::env::var("MAX_DRAFTS").unwrap_or_else(|_| "3".to_string()),
                "MAX_DRAFTS",
            )?,
            search_result_count: parse_positive(
                &std::env::var("SEARCH_RESULT_COUNT").unwrap_or_else(|_| "3".to_string()),
                "SEARCH_RESULT_COUNT",
            )?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Parses a cap value. Zero is rejected: a zero draft cap would make every
/// generation request fail before any work is launched.
fn parse_positive(raw: &str, key: &str) -> Result<usize> {
    let value = raw
        .parse::<usize>()
        .with_context(|| format!("{key} must be a positive integer"))?;
    anyhow::ensure!(value > 0, "{key} must be a positive integer, got 0");
    Ok(value)
}
