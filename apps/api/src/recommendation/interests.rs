//! User interest tracker — records explicit/implicit tag signals.
//!
//! Interest rows are append-or-update only. Removing a tag clears
//! `explicitly_selected` and keeps the row, so historical counts survive
//! opt-outs.

use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::interest::UserInterestRow;

/// Tag add/remove payload for POST /api/recommendations/interests.
#[derive(Debug, Default, Deserialize)]
pub struct InterestUpdate {
    #[serde(default)]
    pub add: Vec<String>,
    #[serde(default)]
    pub remove: Vec<String>,
}

/// Canonical interest key: trimmed and lowercased, so "Tea" and " tea "
/// address the same row.
pub fn canonical_tag(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Canonicalizes a tag list, dropping tags that are empty after trimming.
/// Duplicates are kept — a repeated tag in one request is a repeated signal.
pub fn canonical_tags(tags: &[String]) -> Vec<String> {
    tags.iter()
        .map(|t| canonical_tag(t))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Applies `add` signals (upsert: count +1, explicit flag set, timestamp
/// refreshed) followed by `remove` signals (explicit flag cleared on
/// matching rows; absent rows silently ignored).
pub async fn record_interests(
    pool: &PgPool,
    user_id: Uuid,
    update: &InterestUpdate,
) -> Result<(), AppError> {
    let add = canonical_tags(&update.add);
    let remove = canonical_tags(&update.remove);

    if add.is_empty() && remove.is_empty() {
        return Err(AppError::Validation(
            "add or remove must contain at least one tag".to_string(),
        ));
    }

    for tag in &add {
        sqlx::query(
            r#"
            INSERT INTO user_interests
                (id, user_id, tag, interaction_count, explicitly_selected, weight, last_interaction)
            VALUES ($1, $2, $3, 1, TRUE, 0.0, NOW())
            ON CONFLICT (user_id, tag) DO UPDATE SET
                interaction_count = user_interests.interaction_count + 1,
                explicitly_selected = TRUE,
                last_interaction = NOW()
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(tag)
        .execute(pool)
        .await?;
    }

    if !remove.is_empty() {
        sqlx::query(
            "UPDATE user_interests SET explicitly_selected = FALSE WHERE user_id = $1 AND tag = ANY($2)",
        )
        .bind(user_id)
        .bind(&remove)
        .execute(pool)
        .await?;
    }

    info!(
        "Recorded interest signals for user {user_id}: {} add, {} remove",
        add.len(),
        remove.len()
    );
    Ok(())
}

/// All interest rows for a user, strongest first. `weight` is computed by
/// the personalization pipeline; the tag key makes equal weights stable.
pub async fn list_interests(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<UserInterestRow>, AppError> {
    let rows = sqlx::query_as::<_, UserInterestRow>(
        "SELECT * FROM user_interests WHERE user_id = $1 ORDER BY weight DESC, tag ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_tag_folds_case_and_whitespace() {
        assert_eq!(canonical_tag("Tea"), "tea");
        assert_eq!(canonical_tag("  Pu-Erh  "), "pu-erh");
        assert_eq!(canonical_tag("tea"), canonical_tag(" TEA "));
    }

    #[test]
    fn test_canonical_tag_passes_through_cjk() {
        assert_eq!(canonical_tag("菊花茶"), "菊花茶");
    }

    #[test]
    fn test_canonical_tags_drops_blank_entries() {
        let tags = vec!["Tea".to_string(), "   ".to_string(), String::new()];
        assert_eq!(canonical_tags(&tags), vec!["tea".to_string()]);
    }

    #[test]
    fn test_canonical_tags_keeps_duplicates() {
        // "Tea" then "tea" collapse to the same key but stay as two signals,
        // so the upsert loop increments the count twice
        let tags = vec!["Tea".to_string(), "tea".to_string()];
        assert_eq!(
            canonical_tags(&tags),
            vec!["tea".to_string(), "tea".to_string()]
        );
    }
}
