//! Unified error type for fx-summary.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Start date {start} must be before or equal to end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Breakdown must be 'day' or 'none', got '{0}'")]
    InvalidBreakdown(String),

    #[error("No rate data available for {0}")]
    NoDataAvailable(String),

    #[error("Cannot summarize an empty rate series")]
    EmptySeries,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors caused by the caller's input rather than by the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidQuery(_)
                | Error::InvalidDate(_)
                | Error::InvalidRange { .. }
                | Error::InvalidBreakdown(_)
        )
    }

    /// True when a request was valid but no rates exist for it.
    pub fn is_no_data(&self) -> bool {
        matches!(self, Error::NoDataAvailable(_) | Error::EmptySeries)
    }
}
