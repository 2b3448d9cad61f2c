use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Wildcard value accepted by the `contentType` query parameter.
pub const CONTENT_TYPE_WILDCARD: &str = "all";

/// Content families served by the recommendation endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Article,
    Quiz,
    Tutorial,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Article => "article",
            ContentType::Quiz => "quiz",
            ContentType::Tutorial => "tutorial",
        }
    }

    /// Parses a raw query value. Returns `None` for anything that is not a
    /// known content type — the wildcard is handled by the caller.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "article" => Some(ContentType::Article),
            "quiz" => Some(ContentType::Quiz),
            "tutorial" => Some(ContentType::Tutorial),
            _ => None,
        }
    }
}

/// A published content item as stored in `content_items`.
///
/// Engagement counters are mutated by the interaction-tracking service;
/// this service only reads them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContentRow {
    pub id: Uuid,
    pub content_type: String,
    pub title: String,
    pub tags: Vec<String>,
    pub status: String,
    pub is_active: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub view_count: i64,
    pub like_count: i64,
    pub share_count: i64,
    pub seasonal_relevance: Option<String>,
    pub recommendation_score: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl ContentRow {
    /// An item is eligible for recommendation only once published and active.
    pub fn is_eligible(&self) -> bool {
        self.status == "published" && self.is_active && self.published_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_types() {
        assert_eq!(ContentType::parse("article"), Some(ContentType::Article));
        assert_eq!(ContentType::parse("quiz"), Some(ContentType::Quiz));
        assert_eq!(ContentType::parse("tutorial"), Some(ContentType::Tutorial));
    }

    #[test]
    fn test_parse_rejects_unknown_and_wildcard() {
        assert_eq!(ContentType::parse("all"), None);
        assert_eq!(ContentType::parse("podcast"), None);
        assert_eq!(ContentType::parse(""), None);
    }

    #[test]
    fn test_as_str_round_trips() {
        for ct in [ContentType::Article, ContentType::Quiz, ContentType::Tutorial] {
            assert_eq!(ContentType::parse(ct.as_str()), Some(ct));
        }
    }
}
