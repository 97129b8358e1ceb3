use axum::{extract::State, http::StatusCode, response::IntoResponse, response::Response, Json};
use serde_json::json;
use std::sync::Arc;

use crate::types::PlannerState;

/// GET /health
pub async fn get_health() -> Response {
    (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response()
}

/// GET /search/cache_stats
///
/// Returns search cache statistics for monitoring.
pub async fn get_cache_stats(State(s): State<Arc<PlannerState>>) -> Response {
    s.search_cache.cleanup_expired();
    (StatusCode::OK, Json(s.search_cache.stats())).into_response()
}
