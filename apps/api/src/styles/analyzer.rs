//! Style analyzer — turns a raw posts corpus into a structured style analysis.
//!
//! Reuses the same JSON extraction as the rest of the service; extraction
//! failures surface the raw model output so the user can see what came back.

use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::extraction::extract_json;
use crate::llm_client::CompletionProvider;
use crate::prompts::{build_analysis_prompt, ANALYSIS_SYSTEM};

/// Analysis wants determinism, not variety.
pub const ANALYSIS_TEMPERATURE: f32 = 0.1;
pub const ANALYSIS_MAX_TOKENS: u32 = 1000;

/// Minimum corpus length for a meaningful analysis.
pub const MIN_POSTS_TEXT_CHARS: usize = 100;

/// Name used when the model omits a `style_name` suggestion.
const FALLBACK_STYLE_NAME: &str = "Unnamed Style";

/// Structured result of style analysis, ready for auto-save.
#[derive(Debug, Clone)]
pub struct StyleAnalysis {
    pub style_name: String,
    pub analysis: Value,
}

/// Analyzes a posts corpus into a style profile.
///
/// The model is asked for exactly one JSON object; `extract_json` repairs
/// fences and commentary before parsing. The suggested `style_name` is pulled
/// from the analysis itself, falling back to a placeholder.
pub async fn analyze_style(
    llm: &dyn CompletionProvider,
    posts_text: &str,
) -> Result<StyleAnalysis, AppError> {
    let prompt = build_analysis_prompt(posts_text);
    let raw = llm
        .complete(&prompt, ANALYSIS_SYSTEM, ANALYSIS_MAX_TOKENS, ANALYSIS_TEMPERATURE)
        .await?;

    let analysis = extract_json(&raw)?;

    let style_name = analysis
        .get("style_name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(FALLBACK_STYLE_NAME)
        .to_string();

    info!("style analysis complete: suggested name {style_name:?}");

    Ok(StyleAnalysis {
        style_name,
        analysis,
    })
}
