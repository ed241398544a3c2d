//! Core data structures shared by the parser, the calculator and the CLI.
//!
//! Defines the age value with its `N/A` sentinel, case records as read from
//! the case store, parsed CSV tables and the supported delimiters.

use crate::constants::{
    FIELD_CUN, FIELD_FILING_DATE, FIELD_OFFICE, FIELD_SN, FIELD_STATUS, FIELD_STORED_AGE,
    NOT_AVAILABLE,
};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Elapsed business days, or the `N/A` sentinel when they cannot be computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Age {
    Days(u32),
    NotAvailable,
}

impl Age {
    /// Numeric value, if any
    pub fn days(&self) -> Option<u32> {
        match self {
            Age::Days(days) => Some(*days),
            Age::NotAvailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Age::Days(_))
    }

    /// Add a fixed offset to a numeric age; the sentinel is left untouched
    pub fn plus(self, extra: u32) -> Self {
        match self {
            Age::Days(days) => Age::Days(days.saturating_add(extra)),
            Age::NotAvailable => Age::NotAvailable,
        }
    }

    /// Interpret a stored age value ("12", " 3 ") as an age
    pub fn from_stored(value: &str) -> Self {
        value
            .trim()
            .parse::<u32>()
            .map(Age::Days)
            .unwrap_or(Age::NotAvailable)
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Age::Days(days) => write!(f, "{}", days),
            Age::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

// Numbers stay numbers in JSON; the sentinel is the string "N/A"
impl Serialize for Age {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Age::Days(days) => serializer.serialize_u32(*days),
            Age::NotAvailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

/// One parsed CSV row: header name to field value
pub type Row = HashMap<String, String>;

/// A case as stored in the case store: named string fields ordered by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseRecord {
    fields: BTreeMap<String, String>,
}

impl CaseRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field setter
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Field value, treating blank values as absent
    pub fn get_non_blank(&self, name: &str) -> Option<&str> {
        self.get(name).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn status(&self) -> Option<&str> {
        self.get(FIELD_STATUS)
    }

    pub fn stored_age(&self) -> Option<&str> {
        self.get(FIELD_STORED_AGE)
    }

    pub fn filing_date(&self) -> Option<&str> {
        self.get_non_blank(FIELD_FILING_DATE)
    }

    pub fn office(&self) -> Option<&str> {
        self.get(FIELD_OFFICE)
    }

    pub fn sn(&self) -> Option<&str> {
        self.get(FIELD_SN)
    }

    pub fn cun(&self) -> Option<&str> {
        self.get(FIELD_CUN)
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }
}

impl From<Row> for CaseRecord {
    fn from(fields: Row) -> Self {
        Self {
            fields: fields.into_iter().collect(),
        }
    }
}

/// Result of parsing delimited text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedTable {
    /// Column headers in file order, blank headers removed
    pub headers: Vec<String>,
    /// One mapping per non-blank row
    pub data: Vec<Row>,
}

impl ParsedTable {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    /// Convert rows into case records for aging
    pub fn into_cases(self) -> Vec<CaseRecord> {
        self.data.into_iter().map(CaseRecord::from).collect()
    }
}

/// Field delimiters accepted by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    Comma,
    Semicolon,
}

impl Delimiter {
    pub fn as_char(&self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Semicolon => ';',
        }
    }

    pub fn as_byte(&self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Semicolon => b';',
        }
    }

    /// Pick the delimiter more frequent in `line`; comma wins ties
    pub fn sniff(line: &str) -> Self {
        let commas = line.matches(',').count();
        let semicolons = line.matches(';').count();
        if commas >= semicolons {
            Delimiter::Comma
        } else {
            Delimiter::Semicolon
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delimiter::Comma => f.write_str("comma"),
            Delimiter::Semicolon => f.write_str("semicolon"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_display_and_sentinel() {
        assert_eq!(Age::Days(7).to_string(), "7");
        assert_eq!(Age::NotAvailable.to_string(), "N/A");
        assert_eq!(Age::NotAvailable.plus(2), Age::NotAvailable);
        assert_eq!(Age::Days(3).plus(2), Age::Days(5));
    }

    #[test]
    fn test_age_serializes_as_number_or_sentinel() {
        assert_eq!(serde_json::to_string(&Age::Days(4)).unwrap(), "4");
        assert_eq!(serde_json::to_string(&Age::NotAvailable).unwrap(), "\"N/A\"");
    }

    #[test]
    fn test_age_from_stored() {
        assert_eq!(Age::from_stored(" 12 "), Age::Days(12));
        assert_eq!(Age::from_stored("N/A"), Age::NotAvailable);
        assert_eq!(Age::from_stored(""), Age::NotAvailable);
        assert_eq!(Age::from_stored("-3"), Age::NotAvailable);
    }

    #[test]
    fn test_delimiter_sniff() {
        assert_eq!(Delimiter::sniff("a,b,c"), Delimiter::Comma);
        assert_eq!(Delimiter::sniff("a;b;c"), Delimiter::Semicolon);
        assert_eq!(Delimiter::sniff("a;b,c"), Delimiter::Comma);
        assert_eq!(Delimiter::sniff("header"), Delimiter::Comma);
        assert_eq!(Delimiter::sniff("a;b;c,d"), Delimiter::Semicolon);
    }

    #[test]
    fn test_case_record_serializes_in_field_order() {
        let row: Row = [("SN", "7"), ("Dia", "2"), ("obs", "x"), ("CUN", "c")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let json = serde_json::to_string(&CaseRecord::from(row)).unwrap();
        assert_eq!(json, r#"{"CUN":"c","Dia":"2","SN":"7","obs":"x"}"#);
    }

    #[test]
    fn test_case_record_blank_filing_date_is_absent() {
        let case = CaseRecord::new().with(FIELD_FILING_DATE, "   ");
        assert_eq!(case.filing_date(), None);

        let case = CaseRecord::new().with(FIELD_FILING_DATE, "2025-08-07");
        assert_eq!(case.filing_date(), Some("2025-08-07"));
    }
}
