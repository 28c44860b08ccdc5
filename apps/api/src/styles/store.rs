//! Persistence for style profiles. Read side is consumed by the generation
//! pipeline; every request re-fetches the profile by id.

use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::style::{StyleRow, StyleSummaryRow};

/// Inserts a new style profile and returns its id.
pub async fn save_style(pool: &PgPool, name: &str, analysis: &Value) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO styles (id, name, analysis)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(analysis)
    .execute(pool)
    .await?;
    Ok(id)
}

/// Fetches a full style profile by id.
pub async fn find_style_by_id(pool: &PgPool, id: Uuid) -> Result<Option<StyleRow>, sqlx::Error> {
    sqlx::query_as::<_, StyleRow>("SELECT * FROM styles WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Lists all styles, newest first, id and name only.
pub async fn list_styles(pool: &PgPool) -> Result<Vec<StyleSummaryRow>, sqlx::Error> {
    sqlx::query_as::<_, StyleSummaryRow>(
        "SELECT id, name FROM styles ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await
}

/// Deletes a style by id. Returns whether a row was actually removed.
pub async fn delete_style(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM styles WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() == 1)
}
