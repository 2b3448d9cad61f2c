//! Axum route handlers for the Recommendation API.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::content::{ContentRow, ContentType, CONTENT_TYPE_WILDCARD};
use crate::models::interest::UserInterestRow;
use crate::recommendation::composer::{compose_mixed, MixRatios};
use crate::recommendation::interests::{list_interests, record_interests, InterestUpdate};
use crate::recommendation::seasonal::{fetch_seasonal, Season};
use crate::recommendation::trending::{
    fetch_trending_candidates, ScoredContent, TimeRange, TrendingParams, DEFAULT_LIMIT,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingQuery {
    pub content_type: Option<String>,
    pub limit: Option<u32>,
    pub time_range: Option<String>,
    /// Comma-separated tag list.
    pub tags: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingResponse {
    pub success: bool,
    pub count: usize,
    pub time_range: String,
    pub recommendations: Vec<ScoredContent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalQuery {
    pub content_type: Option<String>,
    pub limit: Option<u32>,
    pub season: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalResponse {
    pub success: bool,
    pub count: usize,
    pub season: String,
    pub recommendations: Vec<ContentRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MixedQuery {
    pub limit: Option<u32>,
    pub articles: Option<f64>,
    pub quizzes: Option<f64>,
    pub tutorials: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MixedResponse {
    pub success: bool,
    pub count: usize,
    pub ratios: MixRatios,
    pub recommendations: Vec<ScoredContent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestUpdateResponse {
    pub success: bool,
    pub message: String,
    pub count: usize,
    pub interests: Vec<UserInterestRow>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<UserInterestRow>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/recommendations/trending
///
/// Decayed-engagement ranking over the requested window, type, and tags.
pub async fn handle_trending(
    State(state): State<AppState>,
    Query(query): Query<TrendingQuery>,
) -> Result<Json<TrendingResponse>, AppError> {
    let params = TrendingParams {
        content_type: resolve_type_filter(query.content_type.as_deref())?,
        limit: resolve_limit(query.limit)?,
        time_range: TimeRange::parse(query.time_range.as_deref()),
        tags: split_tags(query.tags.as_deref()),
    };

    let now = Utc::now();
    let cutoff = params.time_range.cutoff(now);
    let candidates =
        fetch_trending_candidates(&state.db, cutoff, params.content_type, &params.tags).await?;
    let recommendations = state.ranker.rank(candidates, &params, now).await?;

    Ok(Json(TrendingResponse {
        success: true,
        count: recommendations.len(),
        time_range: params.time_range.as_str().to_string(),
        recommendations,
    }))
}

/// GET /api/recommendations/seasonal
///
/// Season-tagged items ordered by their stored recommendation score.
/// The season defaults to the current calendar month's bucket.
pub async fn handle_seasonal(
    State(state): State<AppState>,
    Query(query): Query<SeasonalQuery>,
) -> Result<Json<SeasonalResponse>, AppError> {
    let content_type = resolve_type_filter(query.content_type.as_deref())?;
    let limit = resolve_limit(query.limit)?;
    let season = match query.season.as_deref() {
        Some(raw) => Season::parse(raw)
            .ok_or_else(|| AppError::Validation(format!("Unknown season '{raw}'")))?,
        None => Season::current(Utc::now()),
    };

    let recommendations = fetch_seasonal(&state.db, season, content_type, limit).await?;

    Ok(Json(SeasonalResponse {
        success: true,
        count: recommendations.len(),
        season: season.as_str().to_string(),
        recommendations,
    }))
}

/// GET /api/recommendations/mixed
///
/// Blends articles, quizzes, and tutorials by the requested ratios
/// (defaults 0.5/0.3/0.2; normalized if they do not sum to 1).
pub async fn handle_mixed(
    State(state): State<AppState>,
    Query(query): Query<MixedQuery>,
) -> Result<Json<MixedResponse>, AppError> {
    let limit = resolve_limit(query.limit)?;
    let defaults = MixRatios::default();
    let ratios = MixRatios {
        articles: query.articles.unwrap_or(defaults.articles),
        quizzes: query.quizzes.unwrap_or(defaults.quizzes),
        tutorials: query.tutorials.unwrap_or(defaults.tutorials),
    };
    if ratios.articles < 0.0 || ratios.quizzes < 0.0 || ratios.tutorials < 0.0 {
        return Err(AppError::Validation(
            "ratios must be non-negative".to_string(),
        ));
    }
    if ratios.sum() <= 0.0 {
        return Err(AppError::Validation(
            "ratios must sum to a positive value".to_string(),
        ));
    }

    let recommendations = compose_mixed(
        &state.db,
        state.ranker.as_ref(),
        &ratios,
        limit,
        Utc::now(),
    )
    .await?;

    Ok(Json(MixedResponse {
        success: true,
        count: recommendations.len(),
        ratios: ratios.normalized(),
        recommendations,
    }))
}

/// POST /api/recommendations/interests
///
/// Records add/remove interest signals and returns the updated rows.
pub async fn handle_update_interests(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
    Json(update): Json<InterestUpdate>,
) -> Result<Json<InterestUpdateResponse>, AppError> {
    record_interests(&state.db, params.user_id, &update).await?;
    let interests = list_interests(&state.db, params.user_id).await?;

    Ok(Json(InterestUpdateResponse {
        success: true,
        message: "Interests updated".to_string(),
        count: interests.len(),
        interests,
    }))
}

/// GET /api/recommendations/interests
///
/// All interest rows for a user, ordered by descending weight.
pub async fn handle_list_interests(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<InterestListResponse>, AppError> {
    let data = list_interests(&state.db, params.user_id).await?;

    Ok(Json(InterestListResponse {
        success: true,
        count: data.len(),
        data,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Parameter resolution
// ────────────────────────────────────────────────────────────────────────────

fn resolve_type_filter(raw: Option<&str>) -> Result<Option<ContentType>, AppError> {
    match raw {
        None => Ok(None),
        Some(CONTENT_TYPE_WILDCARD) => Ok(None),
        Some(value) => ContentType::parse(value)
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("Unknown contentType '{value}'"))),
    }
}

fn resolve_limit(raw: Option<u32>) -> Result<usize, AppError> {
    match raw {
        None => Ok(DEFAULT_LIMIT),
        Some(0) => Err(AppError::Validation(
            "limit must be a positive integer".to_string(),
        )),
        Some(n) => Ok(n as usize),
    }
}

fn split_tags(raw: Option<&str>) -> Vec<String> {
    raw.map(|csv| {
        csv.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_filter_wildcard_and_absent_mean_no_filter() {
        assert_eq!(resolve_type_filter(None).unwrap(), None);
        assert_eq!(resolve_type_filter(Some("all")).unwrap(), None);
    }

    #[test]
    fn test_type_filter_rejects_unknown() {
        assert!(resolve_type_filter(Some("podcast")).is_err());
        assert_eq!(
            resolve_type_filter(Some("quiz")).unwrap(),
            Some(ContentType::Quiz)
        );
    }

    #[test]
    fn test_limit_defaults_and_rejects_zero() {
        assert_eq!(resolve_limit(None).unwrap(), DEFAULT_LIMIT);
        assert_eq!(resolve_limit(Some(3)).unwrap(), 3);
        assert!(resolve_limit(Some(0)).is_err());
    }

    #[test]
    fn test_split_tags_trims_and_drops_blanks() {
        assert_eq!(
            split_tags(Some("pu-erh, ginseng ,,  ")),
            vec!["pu-erh".to_string(), "ginseng".to_string()]
        );
        assert!(split_tags(None).is_empty());
        assert!(split_tags(Some("")).is_empty());
    }
}
