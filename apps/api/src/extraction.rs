//! Structured-output extraction — recovers a single JSON object from free-form
//! model output.
//!
//! Models instructed to emit "only the JSON object" still routinely wrap it in
//! commentary or markdown code fences. This module is the single place that
//! repairs that: an ordered fallback list (fence strip → as-is → first/last
//! brace scan), then one parse. Pure and deterministic — no I/O — so it can be
//! tested against literal fixtures.

use serde_json::Value;
use thiserror::Error;

/// Why a model response could not be coerced into a JSON object.
///
/// Carries the raw upstream text so callers can surface it for debugging.
/// The two variants are distinct on purpose: `NoStructureFound` means the
/// output contained no object at all, `ParseFailed` means a candidate was
/// located but was not valid JSON.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("no JSON object found in model output")]
    NoStructureFound { raw: String },

    #[error("model output could not be parsed as JSON: {source}")]
    ParseFailed {
        raw: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ExtractionError {
    /// The raw model output that failed extraction.
    pub fn raw_output(&self) -> &str {
        match self {
            ExtractionError::NoStructureFound { raw } => raw,
            ExtractionError::ParseFailed { raw, .. } => raw,
        }
    }
}

/// Extracts exactly one JSON object from raw model output.
///
/// Candidate selection, in order:
/// 1. text delimited by ``` / ```json fences → fence contents
/// 2. text already shaped like `{ ... }` → taken as-is
/// 3. substring from the first `{` to the last `}` → brace scan
/// 4. otherwise `NoStructureFound`
///
/// The candidate is then parsed; invalid JSON yields `ParseFailed`.
pub fn extract_json(raw: &str) -> Result<Value, ExtractionError> {
    let trimmed = raw.trim();

    let candidate = if trimmed.starts_with("```") {
        strip_code_fences(trimmed)
    } else if trimmed.starts_with('{') && trimmed.ends_with('}') {
        trimmed
    } else {
        match (trimmed.find('{'), trimmed.rfind('}')) {
            (Some(start), Some(end)) if end > start => &trimmed[start..=end],
            _ => {
                return Err(ExtractionError::NoStructureFound {
                    raw: raw.to_string(),
                })
            }
        }
    };

    serde_json::from_str(candidate).map_err(|source| ExtractionError::ParseFailed {
        raw: raw.to_string(),
        source,
    })
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let body = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text)
        .trim_start();
    body.strip_suffix("```").map(str::trim).unwrap_or(body)
}
