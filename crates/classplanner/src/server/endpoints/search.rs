use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::server::types::ApiErrorType;
use crate::server::util::session_key;
use crate::types::PlannerState;

/// Body of a course search.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// Subject code, e.g. "CS"
    pub subject: String,
    /// Course number, e.g. "0445"
    pub course: String,
    /// Term code; the configured term when absent
    #[serde(default)]
    pub term: Option<String>,
}

/// POST /search
/// Searches a course and replaces the session's search results
pub async fn post_search(
    State(s): State<Arc<PlannerState>>,
    headers: HeaderMap,
    request: Result<Json<SearchRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => return ApiErrorType::from(rejection).into_response(),
    };
    info!("POST /search {} {}", request.subject, request.course);

    let subject = request.subject.trim();
    let course = request.course.trim();
    if subject.is_empty() || course.is_empty() {
        return ApiErrorType::from((
            StatusCode::BAD_REQUEST,
            "Subject and course are required",
            None,
        ))
        .into_response();
    }

    let session = session_key(&headers);
    match s
        .search(&session, request.term.as_deref(), subject, course)
        .await
    {
        Ok(offerings) => (StatusCode::OK, Json(offerings)).into_response(),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}

/// GET /search
/// Returns the session's current search results
pub async fn get_search_results(
    State(s): State<Arc<PlannerState>>,
    headers: HeaderMap,
) -> Response {
    let session = session_key(&headers);
    (StatusCode::OK, Json(s.search_results(&session))).into_response()
}

/// POST /add/:index
/// Saves one of the session's search results into the schedule
pub async fn post_add(
    index: Result<Path<usize>, PathRejection>,
    State(s): State<Arc<PlannerState>>,
    headers: HeaderMap,
) -> Response {
    let Path(index) = match index {
        Ok(index) => index,
        Err(rejection) => return ApiErrorType::from(rejection).into_response(),
    };
    info!("POST /add/{}", index);

    let session = session_key(&headers);
    match s.select(&session, index) {
        Ok(offering) => (StatusCode::CREATED, Json(offering)).into_response(),
        Err(e) => ApiErrorType::from(e).into_response(),
    }
}
