//! Axum route handlers for saved drafts.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::{AppError, AppJson};
use crate::models::draft::DraftRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveDraftRequest {
    pub draft_text: String,
    /// Style used to generate the draft, kept for context.
    pub style_id: Option<Uuid>,
    /// Original topic, kept for context.
    pub topic: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveDraftResponse {
    pub message: String,
    pub draft_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct DeleteDraftResponse {
    pub message: String,
}

/// POST /api/drafts
pub async fn handle_save_draft(
    State(state): State<AppState>,
    AppJson(request): AppJson<SaveDraftRequest>,
) -> Result<(StatusCode, Json<SaveDraftResponse>), AppError> {
    if request.draft_text.trim().is_empty() {
        return Err(AppError::Validation("Missing draft_text".to_string()));
    }

    let draft_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO drafts (id, draft_text, style_id, topic)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(draft_id)
    .bind(&request.draft_text)
    .bind(request.style_id)
    .bind(&request.topic)
    .execute(&state.db)
    .await?;

    info!("saved draft {draft_id}");

    Ok((
        StatusCode::CREATED,
        Json(SaveDraftResponse {
            message: "Draft saved successfully!".to_string(),
            draft_id,
        }),
    ))
}

/// GET /api/drafts
///
/// Returns all saved drafts, newest first.
pub async fn handle_list_drafts(
    State(state): State<AppState>,
) -> Result<Json<Vec<DraftRow>>, AppError> {
    let drafts = sqlx::query_as::<_, DraftRow>(
        "SELECT * FROM drafts ORDER BY created_at DESC",
    )
    .fetch_all(&state.db)
    .await?;
    Ok(Json(drafts))
}

/// DELETE /api/drafts/:draft_id
pub async fn handle_delete_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<Uuid>,
) -> Result<Json<DeleteDraftResponse>, AppError> {
    let result = sqlx::query("DELETE FROM drafts WHERE id = $1")
        .bind(draft_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Draft not found".to_string()));
    }

    info!("deleted draft {draft_id}");
    Ok(Json(DeleteDraftResponse {
        message: "Draft deleted successfully".to_string(),
    }))
}
