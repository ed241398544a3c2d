//! Error handling for case aging and CSV ingestion.
//!
//! Provides error types with context for holiday calendar loading,
//! configuration, and business-day span validation. Unparsable dates are
//! not errors: the calculator degrades those to `Age::NotAvailable`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid holiday date '{value}' in calendar {calendar}")]
    InvalidHoliday { calendar: String, value: String },

    #[error("Holiday calendar not found at path: {path}")]
    CalendarNotFound { path: PathBuf },

    #[error("Business-day span too large: {start} to {end} covers {span_days} days (limit {limit})")]
    RangeTooLarge {
        start: String,
        end: String,
        span_days: i64,
        limit: i64,
    },

    #[error("Invalid timezone: {name}")]
    InvalidTimezone { name: String },

    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

pub type Result<T> = std::result::Result<T, CaseError>;
