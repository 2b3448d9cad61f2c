use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A per-user interest signal keyed on `(user_id, tag)`.
///
/// Rows are never hard-deleted: opting out of a tag clears
/// `explicitly_selected` while the historical `interaction_count` stays.
/// `weight` is derived by the personalization pipeline elsewhere; this
/// service only orders by it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserInterestRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub tag: String,
    pub interaction_count: i64,
    pub explicitly_selected: bool,
    pub weight: f64,
    pub last_interaction: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
