use std::sync::Arc;

use sqlx::PgPool;

use crate::recommendation::trending::TrendingRanker;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Pluggable trending ranker. Default: EngagementDecayRanker.
    pub ranker: Arc<dyn TrendingRanker>,
}
