//! Axum route handler for the generation endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::{AppError, AppJson};
use crate::generation::orchestrator::{generate_drafts, FanoutLimits, GenerateRequest};
use crate::state::AppState;
use crate::styles::store::find_style_by_id;

#[derive(Debug, Serialize)]
pub struct GeneratePostResponse {
    pub generated_posts: Vec<String>,
}

/// POST /api/generate-post
///
/// Full pipeline: validate → fetch style profile → angle fan-out with search
/// enrichment → aggregate drafts. Partial failures are tolerated; the request
/// fails only when no angle produced a draft.
pub async fn handle_generate_post(
    State(state): State<AppState>,
    AppJson(request): AppJson<GenerateRequest>,
) -> Result<Json<GeneratePostResponse>, AppError> {
    if request.topic.trim().is_empty() || request.key_points.trim().is_empty() {
        return Err(AppError::Validation(
            "Missing required fields (style_id, topic, key_points)".to_string(),
        ));
    }

    let style = find_style_by_id(&state.db, request.style_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Style not found".to_string()))?;

    let limits = FanoutLimits {
        max_drafts: state.config.max_drafts,
        search_results_per_angle: state.config.search_result_count,
    };

    let drafts = generate_drafts(
        state.llm.as_ref(),
        state.search.as_ref(),
        &style.analysis,
        &request,
        limits,
    )
    .await?;

    Ok(Json(GeneratePostResponse {
        generated_posts: drafts,
    }))
}
