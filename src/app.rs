use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/moods/catalog", get(handlers::catalog))
        .route("/api/moods", get(handlers::list_moods).post(handlers::create_mood))
        .route("/api/moods/today", get(handlers::get_today))
        .route("/api/moods/latest", get(handlers::get_latest))
        .route("/api/submission", get(handlers::get_submission))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/history", get(handlers::get_history))
        .route("/api/calendar", get(handlers::get_calendar))
        .with_state(state)
}
