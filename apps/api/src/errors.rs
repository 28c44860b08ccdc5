use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::ExtractionError;
use crate::generation::orchestrator::PipelineError;
use crate::llm_client::LlmError;

/// JSON body extractor that reports rejections through the standard error
/// envelope. Axum's bare `Json` answers missing or malformed bodies with a
/// plain-text 422; handlers take `AppJson` instead so every invalid input
/// becomes a 400 `VALIDATION_ERROR` before any external call is made.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Raw upstream text is surfaced only for extraction failures; provider
        // connection failures carry no useful payload.
        let mut raw_output: Option<String> = None;

        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Extraction(e) => {
                tracing::warn!("could not extract analysis JSON: {e}; raw: {}", e.raw_output());
                raw_output = Some(e.raw_output().to_string());
                let message = match e {
                    ExtractionError::NoStructureFound { .. } => {
                        "Could not extract JSON analysis from AI model response.".to_string()
                    }
                    ExtractionError::ParseFailed { .. } => {
                        "Failed to parse analysis from AI model".to_string()
                    }
                };
                (StatusCode::INTERNAL_SERVER_ERROR, "EXTRACTION_ERROR", message)
            }
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                match e {
                    LlmError::ConnectionFailed(_) => (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "LLM_CONNECTION_ERROR",
                        "Failed to connect to the AI model provider".to_string(),
                    ),
                    LlmError::RateLimited => (
                        StatusCode::TOO_MANY_REQUESTS,
                        "LLM_RATE_LIMITED",
                        "Rate limit exceeded. Please try again later.".to_string(),
                    ),
                    LlmError::Status { status, .. } => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "LLM_API_ERROR",
                        format!("AI model API error: {status}"),
                    ),
                    LlmError::EmptyContent => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "LLM_API_ERROR",
                        "AI model returned empty content".to_string(),
                    ),
                }
            }
            AppError::Pipeline(PipelineError::AllAttemptsFailed { .. }) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "GENERATION_FAILED",
                "Failed to generate any drafts. Check inputs or logs.".to_string(),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let Some(raw) = raw_output {
            error["raw_output"] = json!(raw);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
