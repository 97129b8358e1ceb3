use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::server::types::ApiErrorType;
use crate::types::PlannerState;

/// POST /suggest
/// Asks the suggestion service for a timetable built from the saved offerings
pub async fn post_suggest(State(s): State<Arc<PlannerState>>) -> Response {
    info!("POST /suggest");

    match s.suggest().await {
        Ok(suggestion) => (StatusCode::OK, Json(suggestion)).into_response(),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}
