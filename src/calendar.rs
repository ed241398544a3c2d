//! Holiday calendar loading and lookup.
//!
//! A calendar is a named, versioned set of non-business dates. Weekends are
//! not stored here; the calculator excludes them on its own. Calendars are
//! loaded from JSON files so a new year can be added without a rebuild:
//!
//! ```json
//! { "name": "colombia", "version": "2027", "dates": ["2027-01-01", "2027-01-11"] }
//! ```

use crate::constants::{
    COLOMBIAN_HOLIDAYS, DEFAULT_CALENDAR_NAME, DEFAULT_CALENDAR_VERSION, ISO_DATE_FORMAT,
};
use crate::error::{CaseError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

/// On-disk representation of a calendar file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CalendarFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
    dates: Vec<String>,
}

/// Set of non-business dates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayCalendar {
    name: String,
    version: String,
    dates: BTreeSet<NaiveDate>,
}

impl HolidayCalendar {
    /// Empty calendar: only weekends are non-business days
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in Colombian calendar for 2025 and 2026
    pub fn colombia_default() -> Self {
        let dates = COLOMBIAN_HOLIDAYS
            .iter()
            .filter_map(|d| NaiveDate::parse_from_str(d, ISO_DATE_FORMAT).ok())
            .collect();

        Self {
            name: DEFAULT_CALENDAR_NAME.to_string(),
            version: DEFAULT_CALENDAR_VERSION.to_string(),
            dates,
        }
    }

    /// Build a calendar from ISO date strings, rejecting any that do not parse
    pub fn from_iso_strings<I, S>(dates: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut calendar = Self::new();
        for value in dates {
            let value = value.as_ref();
            let date = parse_holiday(value, "inline")?;
            calendar.dates.insert(date);
        }
        Ok(calendar)
    }

    /// Parse a calendar from its JSON form
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: CalendarFile = serde_json::from_str(json)?;
        let name = file.name.unwrap_or_default();

        let dates = file
            .dates
            .iter()
            .map(|value| parse_holiday(value, &name))
            .collect::<Result<BTreeSet<_>>>()?;

        Ok(Self {
            name,
            version: file.version.unwrap_or_default(),
            dates,
        })
    }

    /// Load a calendar from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CaseError::CalendarNotFound {
                path: path.to_path_buf(),
            });
        }

        let json = std::fs::read_to_string(path)?;
        let mut calendar = Self::from_json_str(&json)?;
        if calendar.name.is_empty() {
            calendar.name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
        }

        debug!(
            "Loaded holiday calendar '{}' ({}) with {} dates from {}",
            calendar.name,
            calendar.version,
            calendar.len(),
            path.display()
        );

        Ok(calendar)
    }

    /// Serialize to the JSON file form
    pub fn to_json_string(&self) -> Result<String> {
        let file = CalendarFile {
            name: Some(self.name.clone()),
            version: Some(self.version.clone()),
            dates: self.iso_dates().collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    pub fn with_name(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.name = name.into();
        self.version = version.into();
        self
    }

    pub fn insert(&mut self, date: NaiveDate) -> bool {
        self.dates.insert(date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    /// Membership by ISO string; strings that are not dates are never members
    pub fn contains_iso(&self, value: &str) -> bool {
        NaiveDate::parse_from_str(value.trim(), ISO_DATE_FORMAT)
            .map(|date| self.contains(date))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Dates in ascending order
    pub fn iter(&self) -> impl Iterator<Item = &NaiveDate> {
        self.dates.iter()
    }

    pub fn iso_dates(&self) -> impl Iterator<Item = String> + '_ {
        self.dates
            .iter()
            .map(|d| d.format(ISO_DATE_FORMAT).to_string())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

fn parse_holiday(value: &str, calendar: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), ISO_DATE_FORMAT).map_err(|_| {
        CaseError::InvalidHoliday {
            calendar: calendar.to_string(),
            value: value.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, ISO_DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_colombia_default_covers_both_years() {
        let calendar = HolidayCalendar::colombia_default();
        assert_eq!(calendar.len(), COLOMBIAN_HOLIDAYS.len());
        assert!(calendar.contains(date("2025-08-07")));
        assert!(calendar.contains(date("2026-12-25")));
        assert!(!calendar.contains(date("2025-08-08")));
        assert_eq!(calendar.name(), "colombia");
    }

    #[test]
    fn test_from_iso_strings_rejects_garbage() {
        let ok = HolidayCalendar::from_iso_strings(["2025-01-01", " 2025-05-01 "]).unwrap();
        assert_eq!(ok.len(), 2);

        let err = HolidayCalendar::from_iso_strings(["2025-01-01", "01/05/2025"]).unwrap_err();
        match err {
            CaseError::InvalidHoliday { value, .. } => assert_eq!(value, "01/05/2025"),
            other => panic!("Expected InvalidHoliday error, got {:?}", other),
        }
    }

    #[test]
    fn test_contains_iso() {
        let calendar = HolidayCalendar::from_iso_strings(["2025-12-25"]).unwrap();
        assert!(calendar.contains_iso("2025-12-25"));
        assert!(!calendar.contains_iso("2025-12-24"));
        assert!(!calendar.contains_iso("christmas"));
    }

    #[test]
    fn test_load_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"{{ "name": "co", "version": "2027", "dates": ["2027-01-01", "2027-01-11"] }}"#
        )
        .unwrap();

        let calendar = HolidayCalendar::load(temp_file.path()).unwrap();
        assert_eq!(calendar.name(), "co");
        assert_eq!(calendar.version(), "2027");
        assert_eq!(calendar.len(), 2);
        assert!(calendar.contains(date("2027-01-11")));
    }

    #[test]
    fn test_load_missing_file() {
        let result = HolidayCalendar::load(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(CaseError::CalendarNotFound { .. })));
    }

    #[test]
    fn test_json_round_trip_keeps_dates_sorted() {
        let calendar = HolidayCalendar::from_iso_strings(["2026-01-12", "2026-01-01"])
            .unwrap()
            .with_name("co", "2026");
        let json = calendar.to_json_string().unwrap();
        let reloaded = HolidayCalendar::from_json_str(&json).unwrap();

        assert_eq!(reloaded, calendar);
        let dates: Vec<String> = reloaded.iso_dates().collect();
        assert_eq!(dates, vec!["2026-01-01", "2026-01-12"]);
    }
}
