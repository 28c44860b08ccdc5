use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted style profile. `analysis` is the structured output of style
/// analysis, stored as JSONB and never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StyleRow {
    pub id: Uuid,
    pub name: String,
    pub analysis: Value,
    pub created_at: DateTime<Utc>,
}

/// Listing projection: id and name only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StyleSummaryRow {
    pub id: Uuid,
    pub name: String,
}
