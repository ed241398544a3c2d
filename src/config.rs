//! Configuration management and validation.
//!
//! Provides the aging policy (terminal statuses, per-office offsets), the
//! holiday calendar location, the clock timezone and CSV defaults. Values
//! come from a JSON file, falling back to built-in defaults.

use crate::calendar::HolidayCalendar;
use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_TIMEZONE, MAX_SPAN_DAYS, OESIA_ADJUSTMENT_DAYS,
    OESIA_OFFICE_PATTERN, TERMINAL_STATUSES,
};
use crate::error::{CaseError, Result};
use crate::models::Delimiter;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Fixed number of days added to the age of cases handled by an office
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficeAdjustment {
    /// Case-insensitive fragment matched against the office name
    pub pattern: String,
    pub days: u32,
}

impl OfficeAdjustment {
    pub fn new(pattern: impl Into<String>, days: u32) -> Self {
        Self {
            pattern: pattern.into(),
            days,
        }
    }

    /// Whether `office` contains this adjustment's pattern, ignoring case
    pub fn matches(&self, office: &str) -> bool {
        !self.pattern.is_empty()
            && office
                .to_uppercase()
                .contains(&self.pattern.to_uppercase())
    }
}

/// Rules applied when computing the age of a case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgingPolicy {
    /// Statuses whose stored age is reported instead of recomputed
    pub terminal_statuses: Vec<String>,

    /// Office offsets; the first matching entry applies
    pub office_adjustments: Vec<OfficeAdjustment>,

    /// Largest calendar span walked before failing with `RangeTooLarge`
    pub max_span_days: i64,
}

impl Default for AgingPolicy {
    fn default() -> Self {
        Self {
            terminal_statuses: TERMINAL_STATUSES.iter().map(|s| s.to_string()).collect(),
            office_adjustments: vec![OfficeAdjustment::new(
                OESIA_OFFICE_PATTERN,
                OESIA_ADJUSTMENT_DAYS,
            )],
            max_span_days: MAX_SPAN_DAYS,
        }
    }
}

impl AgingPolicy {
    pub fn is_terminal(&self, status: &str) -> bool {
        self.terminal_statuses.iter().any(|s| s == status)
    }

    /// Days to add for a case handled by `office`
    pub fn office_adjustment(&self, office: &str) -> u32 {
        self.office_adjustments
            .iter()
            .find(|adj| adj.matches(office))
            .map(|adj| adj.days)
            .unwrap_or(0)
    }
}

/// Global configuration for casetrack
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Holiday calendar file; the built-in Colombian calendar is used when unset
    pub holidays_path: Option<PathBuf>,

    /// IANA timezone used to determine "today"
    pub timezone: String,

    /// Forced CSV delimiter; sniffed from the header line when unset
    pub default_delimiter: Option<Delimiter>,

    /// Case aging rules
    pub aging: AgingPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            holidays_path: None,
            timezone: DEFAULT_TIMEZONE.to_string(),
            default_delimiter: None,
            aging: AgingPolicy::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load from the user config directory if a file exists there, else defaults
    pub fn load_or_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// `<config dir>/casetrack/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn validate(&self) -> Result<()> {
        self.tz()?;
        if self.aging.max_span_days <= 0 {
            return Err(CaseError::Configuration {
                message: format!(
                    "max_span_days must be positive, got {}",
                    self.aging.max_span_days
                ),
            });
        }
        Ok(())
    }

    /// Parsed clock timezone
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| CaseError::InvalidTimezone {
                name: self.timezone.clone(),
            })
    }

    /// The configured holiday calendar, or the built-in one
    pub fn holiday_calendar(&self) -> Result<HolidayCalendar> {
        match &self.holidays_path {
            Some(path) => HolidayCalendar::load(path),
            None => Ok(HolidayCalendar::colombia_default()),
        }
    }

    /// Use a holiday calendar file
    pub fn with_holidays_path(mut self, path: PathBuf) -> Self {
        self.holidays_path = Some(path);
        self
    }

    /// Use a different clock timezone
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    /// Force a CSV delimiter
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.default_delimiter = Some(delimiter);
        self
    }

    /// Replace the aging policy
    pub fn with_aging(mut self, aging: AgingPolicy) -> Self {
        self.aging = aging;
        self
    }
}
