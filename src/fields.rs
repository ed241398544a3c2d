//! Field-level helpers for case data.
//!
//! Normalizes dates and customer ids coming from exports, and pulls related
//! complaint numbers, e-mail addresses and street addresses out of free-text
//! observations.

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::LazyLock;

// Digits and word boundaries are ASCII

static SLASH_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,2})/([0-9]{1,2})/([0-9]{4})$").expect("Invalid date regex")
});

static COMPLAINT_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?-u:\b)([0-9]{16}|[0-9]{20})(?-u:\b)").expect("Invalid complaint regex")
});

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9_.-]+@[A-Za-z0-9_.-]+\.[A-Za-z0-9_]+").expect("Invalid email regex")
});

// Colombian street nomenclature: "Calle 10 # 5-20", "Cra. 7 No 32-16", "Av 68 ..."
static ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?-u:\b)(?:calle|cll|carrera|cra|k|avenida|av|transversal|trans|diagonal|diag|dg)\.?\s*[0-9\sA-Za-zñÑáéíóúÁÉÍÓÚ#.\-]+",
    )
    .expect("Invalid address regex")
});

/// Convert `M/D/YYYY` into `YYYY-MM-DD`.
///
/// Blank input gives an empty string; anything else that does not match is
/// returned unchanged.
pub fn normalize_date(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    match SLASH_DATE.captures(trimmed) {
        Some(caps) => format!("{}-{:0>2}-{:0>2}", &caps[3], &caps[1], &caps[2]),
        None => value.to_string(),
    }
}

/// Customer id without the check-digit suffix ("900123456-7" -> "900123456")
pub fn normalize_nuip(value: &str) -> String {
    value
        .split('-')
        .next()
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// First standalone 16- or 20-digit complaint number in `text`
pub fn extract_related_complaint_number(text: &str) -> Option<String> {
    COMPLAINT_NUMBER
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Contact details found in free text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedContacts {
    pub emails: Vec<String>,
    pub addresses: Vec<String>,
}

/// Collect distinct e-mail and street addresses, in order of appearance
pub fn extract_addresses(text: &str) -> ExtractedContacts {
    ExtractedContacts {
        emails: distinct_matches(&EMAIL, text),
        addresses: distinct_matches(&ADDRESS, text),
    }
}

fn distinct_matches(re: &Regex, text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    re.find_iter(text)
        .map(|m| m.as_str().to_string())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

/// Minutes between two timestamps, rounded half up.
///
/// Accepts RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS` taken as UTC.
pub fn duration_in_minutes(start: &str, end: &str) -> Option<i64> {
    let start = parse_timestamp(start)?;
    let end = parse_timestamp(end)?;
    let millis = (end - start).num_milliseconds() as f64;
    Some((millis / 60_000.0 + 0.5).floor() as i64)
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}
