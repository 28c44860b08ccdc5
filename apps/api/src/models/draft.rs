use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A saved post draft. `style_id` and `topic` are optional context recorded
/// at save time; the referenced style may be deleted independently.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DraftRow {
    pub id: Uuid,
    pub draft_text: String,
    pub style_id: Option<Uuid>,
    pub topic: Option<String>,
    pub created_at: DateTime<Utc>,
}
