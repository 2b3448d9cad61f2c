//! Trending selector — ranks published content by decayed engagement.
//!
//! The database narrows to eligible candidates; scoring, ordering, and
//! truncation run in Rust over the fetched rows so the whole contract is
//! testable without a database.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::content::{ContentRow, ContentType};
use crate::recommendation::scoring::{days_since_published, trending_score, EngagementWeights};

/// Result size when the caller does not pass `limit`.
pub const DEFAULT_LIMIT: usize = 10;

// ────────────────────────────────────────────────────────────────────────────
// Request parameters
// ────────────────────────────────────────────────────────────────────────────

/// Lookback window anchored at "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Day,
    #[default]
    Week,
    Month,
}

impl TimeRange {
    /// Lenient parse — unrecognized values fall back to the weekly window.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("day") => TimeRange::Day,
            Some("month") => TimeRange::Month,
            _ => TimeRange::Week,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Day => "day",
            TimeRange::Week => "week",
            TimeRange::Month => "month",
        }
    }

    /// Window start for a request arriving at `now`.
    /// Month is a calendar month, not a fixed 30 days.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            TimeRange::Day => now - Duration::days(1),
            TimeRange::Week => now - Duration::days(7),
            TimeRange::Month => now - Months::new(1),
        }
    }
}

/// Resolved trending request.
#[derive(Debug, Clone)]
pub struct TrendingParams {
    /// `None` means the `all` wildcard — no type restriction.
    pub content_type: Option<ContentType>,
    pub limit: usize,
    pub time_range: TimeRange,
    /// Non-empty requires the item's tags to intersect this set.
    pub tags: Vec<String>,
}

/// A content item with its computed trending score. Raw metrics stay on the
/// item so callers can audit the ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredContent {
    #[serde(flatten)]
    pub item: ContentRow,
    pub trending_score: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Ranker seam
// ────────────────────────────────────────────────────────────────────────────

/// The trending ranker seam. Implement this to swap ranking backends
/// without touching the endpoint, handler, or caller code.
///
/// Carried in `AppState` as `Arc<dyn TrendingRanker>`.
#[async_trait]
pub trait TrendingRanker: Send + Sync {
    async fn rank(
        &self,
        items: Vec<ContentRow>,
        params: &TrendingParams,
        now: DateTime<Utc>,
    ) -> Result<Vec<ScoredContent>, AppError>;
}

/// Default ranker: pure decayed-engagement scoring, no external calls.
pub struct EngagementDecayRanker;

#[async_trait]
impl TrendingRanker for EngagementDecayRanker {
    async fn rank(
        &self,
        items: Vec<ContentRow>,
        params: &TrendingParams,
        now: DateTime<Utc>,
    ) -> Result<Vec<ScoredContent>, AppError> {
        Ok(rank_trending(items, params, now))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core ranking algorithm
// ────────────────────────────────────────────────────────────────────────────

/// Filters, scores, sorts, and truncates candidates.
///
/// Order is deterministic: trending score descending, then `published_at`
/// descending (freshest wins exact ties), then `id` ascending.
pub fn rank_trending(
    items: Vec<ContentRow>,
    params: &TrendingParams,
    now: DateTime<Utc>,
) -> Vec<ScoredContent> {
    let cutoff = params.time_range.cutoff(now);
    let weights = EngagementWeights::default();

    let mut scored: Vec<ScoredContent> = items
        .into_iter()
        .filter_map(|item| {
            let published_at = item.published_at?;
            if !item.is_eligible() || published_at < cutoff {
                return None;
            }
            if !matches_type(&item, params.content_type) || !matches_tags(&item, &params.tags) {
                return None;
            }
            let age_days = days_since_published(published_at, now);
            let score = trending_score(
                item.view_count,
                item.like_count,
                item.share_count,
                age_days,
                &weights,
            );
            Some(ScoredContent {
                item,
                trending_score: score,
            })
        })
        .collect();

    scored.sort_by(|a, b| {
        b.trending_score
            .partial_cmp(&a.trending_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.item.published_at.cmp(&a.item.published_at))
            .then_with(|| a.item.id.cmp(&b.item.id))
    });
    scored.truncate(params.limit);
    scored
}

fn matches_type(item: &ContentRow, filter: Option<ContentType>) -> bool {
    filter.map_or(true, |ct| item.content_type == ct.as_str())
}

fn matches_tags(item: &ContentRow, requested: &[String]) -> bool {
    requested.is_empty() || item.tags.iter().any(|t| requested.contains(t))
}

// ────────────────────────────────────────────────────────────────────────────
// Candidate query
// ────────────────────────────────────────────────────────────────────────────

/// Fetches eligible candidates inside the window. The same predicates are
/// re-applied in `rank_trending`; the query only keeps the fetch bounded.
pub async fn fetch_trending_candidates(
    pool: &PgPool,
    cutoff: DateTime<Utc>,
    content_type: Option<ContentType>,
    tags: &[String],
) -> Result<Vec<ContentRow>, AppError> {
    let rows = sqlx::query_as::<_, ContentRow>(
        r#"
        SELECT * FROM content_items
        WHERE status = 'published'
          AND is_active = TRUE
          AND published_at IS NOT NULL
          AND published_at >= $1
          AND ($2::text IS NULL OR content_type = $2)
          AND (cardinality($3::text[]) = 0 OR tags && $3)
        "#,
    )
    .bind(cutoff)
    .bind(content_type.map(|ct| ct.as_str()))
    .bind(tags)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
