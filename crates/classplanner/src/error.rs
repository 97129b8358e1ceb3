//! Error types for the class planner.

use thiserror::Error;

/// Errors that can occur while searching, selecting or scheduling offerings.
#[derive(Debug, Error, Clone)]
pub enum ScheduleError {
    /// Raw section data could not be turned into offerings
    #[error("Input error: {message}")]
    InputParse { message: String },

    /// The course-data source was unreachable or returned something unexpected
    #[error("Course provider error: {message}")]
    Provider { message: String },

    /// A selection index no longer addresses the cached search results
    #[error("Index {index} is out of range for {len} search results")]
    IndexOutOfRange { index: usize, len: usize },

    /// The record store failed
    #[error("Store error: {message}")]
    Store { message: String },

    /// The text-generation service failed or replied with nothing usable
    #[error("Suggestion error: {message}")]
    Suggestion { message: String },

    /// Configuration could not be read
    #[error("Config error: {message}")]
    Config { message: String },
}

impl ScheduleError {
    pub fn input(message: impl Into<String>) -> Self {
        ScheduleError::InputParse {
            message: message.into(),
        }
    }

    /// Returns true if the caller can fix this error by changing the request
    /// (a new search, a different index or course code).
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ScheduleError::InputParse { .. } | ScheduleError::IndexOutOfRange { .. }
        )
    }
}

impl From<reqwest::Error> for ScheduleError {
    fn from(err: reqwest::Error) -> Self {
        ScheduleError::Provider {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ScheduleError {
    fn from(err: serde_json::Error) -> Self {
        ScheduleError::Provider {
            message: format!("Unexpected response shape: {}", err),
        }
    }
}

impl From<rusqlite::Error> for ScheduleError {
    fn from(err: rusqlite::Error) -> Self {
        ScheduleError::Store {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for ScheduleError {
    fn from(err: url::ParseError) -> Self {
        ScheduleError::Config {
            message: format!("Invalid URL: {}", err),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
