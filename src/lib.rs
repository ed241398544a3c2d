//! casetrack Library
//!
//! Business-day aging and CSV ingestion for telecom complaint cases
//! (Colombian regulatory context).
//!
//! This library provides tools for:
//! - Counting business days between dates, excluding weekends and holidays
//! - Aging cases from their filing date, with frozen ages for resolved cases
//!   and per-office SLA offsets
//! - Loading versioned holiday calendars from JSON
//! - Parsing comma- or semicolon-delimited case exports with quoted fields
//! - Normalizing and extracting fields from case data
//! - Importing case files into a merged case set keyed by SN

pub mod business_days;
pub mod calendar;
pub mod config;
pub mod constants;
pub mod csv_parser;
pub mod error;
pub mod fields;
pub mod ingest;
pub mod models;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use business_days::{calculate_business_days, calculate_case_age};
pub use calendar::HolidayCalendar;
pub use config::{AgingPolicy, AppConfig};
pub use csv_parser::{ParseOptions, parse_csv, parse_csv_with, write_csv};
pub use error::{CaseError, Result};
pub use models::{Age, CaseRecord, Delimiter, ParsedTable};
