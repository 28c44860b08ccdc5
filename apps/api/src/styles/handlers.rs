//! Axum route handlers for style analysis and style CRUD.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::errors::{AppError, AppJson};
use crate::models::style::StyleSummaryRow;
use crate::state::AppState;
use crate::styles::analyzer::{analyze_style, MIN_POSTS_TEXT_CHARS};
use crate::styles::store::{delete_style, list_styles, save_style};

#[derive(Debug, Deserialize)]
pub struct AnalyzeStyleRequest {
    pub posts_text: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeStyleResponse {
    pub message: String,
    pub style_id: Uuid,
    pub style_name: String,
    pub analysis: Value,
}

#[derive(Debug, Serialize)]
pub struct DeleteStyleResponse {
    pub message: String,
}

/// POST /api/analyze-style
///
/// Analyzes a posts corpus and auto-saves the resulting style profile.
/// Validation happens before any external call is made.
pub async fn handle_analyze_style(
    State(state): State<AppState>,
    AppJson(request): AppJson<AnalyzeStyleRequest>,
) -> Result<Json<AnalyzeStyleResponse>, AppError> {
    if request.posts_text.trim().chars().count() < MIN_POSTS_TEXT_CHARS {
        return Err(AppError::Validation(format!(
            "Insufficient post text provided for analysis (min {MIN_POSTS_TEXT_CHARS} chars recommended)."
        )));
    }

    let result = analyze_style(state.llm.as_ref(), &request.posts_text).await?;

    let style_id = save_style(&state.db, &result.style_name, &result.analysis).await?;
    info!("style {:?} analyzed and auto-saved as {style_id}", result.style_name);

    Ok(Json(AnalyzeStyleResponse {
        message: format!("Style analyzed and saved as '{}'!", result.style_name),
        style_id,
        style_name: result.style_name,
        analysis: result.analysis,
    }))
}

/// GET /api/styles
pub async fn handle_list_styles(
    State(state): State<AppState>,
) -> Result<Json<Vec<StyleSummaryRow>>, AppError> {
    let styles = list_styles(&state.db).await?;
    Ok(Json(styles))
}

/// DELETE /api/styles/:style_id
pub async fn handle_delete_style(
    State(state): State<AppState>,
    Path(style_id): Path<Uuid>,
) -> Result<Json<DeleteStyleResponse>, AppError> {
    if !delete_style(&state.db, style_id).await? {
        return Err(AppError::NotFound("Style not found".to_string()));
    }
    info!("deleted style {style_id}");
    Ok(Json(DeleteStyleResponse {
        message: "Style deleted successfully".to_string(),
    }))
}
