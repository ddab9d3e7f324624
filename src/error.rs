use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a backend call. Transport, status and decode errors are not
/// distinguished beyond the optional HTTP status.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: Option<StatusCode>,
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    pub fn with_status(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self {
            status: err.status(),
            message: err.to_string(),
        }
    }
}

/// Misuse of the console panels
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PanelError {
    #[error("the ledger integration is disabled")]
    NotConnected,
    #[error("the configuration has not been loaded from the backend")]
    NotLoaded,
    #[error("the edit form is not open")]
    NotEditing,
    #[error("`{value}` is not a valid {field}")]
    UnknownOption { field: &'static str, value: String },
    #[error("period start {start} is after end {end}")]
    InvalidPeriod { start: String, end: String },
    #[error("period of {days} days exceeds the {max} day limit")]
    PeriodTooLong { days: i64, max: u32 },
}
