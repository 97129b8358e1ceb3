use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::error::ScheduleError;

/// JSON error body returned by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiErrorType {
    #[serde(skip)]
    status: StatusCode,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl From<(StatusCode, &str, Option<String>)> for ApiErrorType {
    fn from((status, error, details): (StatusCode, &str, Option<String>)) -> Self {
        Self {
            status,
            error: error.to_string(),
            details,
        }
    }
}

impl From<ScheduleError> for ApiErrorType {
    fn from(err: ScheduleError) -> Self {
        let (status, message) = match &err {
            ScheduleError::InputParse { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Course data could not be grouped into offerings",
            ),
            ScheduleError::IndexOutOfRange { .. } => (
                StatusCode::NOT_FOUND,
                "No such search result - please search again",
            ),
            ScheduleError::Provider { .. } => {
                (StatusCode::BAD_GATEWAY, "Course data source unavailable")
            }
            ScheduleError::Suggestion { .. } => {
                (StatusCode::BAD_GATEWAY, "Suggestion service unavailable")
            }
            ScheduleError::Store { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to access saved classes")
            }
            ScheduleError::Config { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Server misconfigured")
            }
        };

        if !err.is_user_error() {
            error!(error = %err, "Request failed");
        }

        Self::from((status, message, Some(err.to_string())))
    }
}

impl From<JsonRejection> for ApiErrorType {
    fn from(rejection: JsonRejection) -> Self {
        Self::from((
            rejection.status(),
            "Invalid request body",
            Some(rejection.body_text()),
        ))
    }
}

impl From<PathRejection> for ApiErrorType {
    fn from(rejection: PathRejection) -> Self {
        Self::from((
            rejection.status(),
            "Invalid path parameter",
            Some(rejection.body_text()),
        ))
    }
}

impl IntoResponse for ApiErrorType {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
