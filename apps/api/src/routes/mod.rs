pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::recommendation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/recommendations/trending",
            get(handlers::handle_trending),
        )
        .route(
            "/api/recommendations/seasonal",
            get(handlers::handle_seasonal),
        )
        .route("/api/recommendations/mixed", get(handlers::handle_mixed))
        .route(
            "/api/recommendations/interests",
            get(handlers::handle_list_interests).post(handlers::handle_update_interests),
        )
        .with_state(state)
}
