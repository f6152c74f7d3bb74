//! Report error types.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur during dashboard aggregation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Invalid date range.
    #[error("Invalid date range: start {from} is after end {to}")]
    InvalidDateRange {
        /// Start of the requested window.
        from: NaiveDate,
        /// End of the requested window.
        to: NaiveDate,
    },
}
