use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::server::types::ApiErrorType;
use crate::types::{PlannerState, Weekday};

/// GET /myclasses
/// Returns every saved offering grouped by weekday
pub async fn get_my_classes(State(s): State<Arc<PlannerState>>) -> Response {
    info!("GET /myclasses");

    match s.weekly_schedule() {
        Ok(schedule) => (StatusCode::OK, Json(schedule)).into_response(),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// GET /myclasses/:day
/// Returns the saved offerings for one weekday (`mo`, `mon` or `monday`)
pub async fn get_day_classes(
    Path(day): Path<String>,
    State(s): State<Arc<PlannerState>>,
) -> Response {
    info!("GET /myclasses/{}", day);

    let day: Weekday = match day.parse() {
        Ok(day) => day,
        Err(e) => {
            return ApiErrorType::from((
                StatusCode::BAD_REQUEST,
                "Unknown weekday",
                Some(format!("{}", e)),
            ))
            .into_response()
        }
    };

    match s.day_schedule(day) {
        Ok(offerings) => (StatusCode::OK, Json(offerings)).into_response(),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}
