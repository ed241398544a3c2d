//! Case import from parsed exports.
//!
//! Rows are keyed by SN. A row whose SN is already known updates that case
//! (row fields win); a new SN creates a case with default status, assignment
//! date and the imported age kept as `Dia_Original_CSV`. Every imported row
//! gets its filing date normalized to ISO form and its age recomputed as of
//! the import date.

use crate::business_days::calculate_business_days_with_limit;
use crate::calendar::HolidayCalendar;
use crate::config::AgingPolicy;
use crate::constants::{
    DEFAULT_STATUS, FIELD_ASSIGNED_DATE, FIELD_FILING_DATE, FIELD_OBSERVATION, FIELD_OFFICE,
    FIELD_ORIGINAL_AGE, FIELD_RELATED_COMPLAINT, FIELD_SN, FIELD_STATUS, FIELD_STORED_AGE,
    ISO_DATE_FORMAT, NOT_AVAILABLE,
};
use crate::fields::{extract_related_complaint_number, normalize_date};
use crate::models::{Age, CaseRecord, ParsedTable, Row};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Import statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestStats {
    /// Rows seen in the input
    pub total_rows: usize,

    /// Cases created
    pub added: usize,

    /// Existing cases updated
    pub updated: usize,

    /// Rows without an SN
    pub skipped: usize,

    /// Rows whose age could not be computed
    pub errors: Vec<String>,
}

impl IngestStats {
    /// Merge counts from another import run
    pub fn absorb(&mut self, other: IngestStats) {
        self.total_rows += other.total_rows;
        self.added += other.added;
        self.updated += other.updated;
        self.skipped += other.skipped;
        self.errors.extend(other.errors);
    }
}

/// Accumulates cases across one or more imported tables
#[derive(Debug, Clone)]
pub struct CaseIngestor<'a> {
    holidays: &'a HolidayCalendar,
    policy: &'a AgingPolicy,
    today: NaiveDate,
    cases: HashMap<String, CaseRecord>,
    order: Vec<String>,
}

impl<'a> CaseIngestor<'a> {
    pub fn new(holidays: &'a HolidayCalendar, policy: &'a AgingPolicy, today: NaiveDate) -> Self {
        Self {
            holidays,
            policy,
            today,
            cases: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Seed with cases already in the store
    pub fn with_existing(mut self, existing: impl IntoIterator<Item = CaseRecord>) -> Self {
        for case in existing {
            if let Some(sn) = case.get_non_blank(FIELD_SN).map(str::to_string) {
                self.remember(sn, case);
            }
        }
        self
    }

    /// Import every row of `table`
    pub fn ingest(&mut self, table: ParsedTable) -> IngestStats {
        let mut stats = IngestStats::default();

        for row in table.data {
            stats.total_rows += 1;
            let Some(sn) = row
                .get(FIELD_SN)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
            else {
                stats.skipped += 1;
                continue;
            };

            let original_age = row
                .get(FIELD_STORED_AGE)
                .cloned()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string());
            let prepared = self.prepare_row(&sn, row, &mut stats);

            match self.cases.get_mut(&sn) {
                Some(existing) => {
                    for (name, value) in prepared {
                        existing.insert(name, value);
                    }
                    stats.updated += 1;
                }
                None => {
                    let case = self.new_case(prepared, original_age);
                    self.remember(sn, case);
                    stats.added += 1;
                }
            }
        }

        debug!(
            "Ingested {} rows: {} added, {} updated, {} skipped",
            stats.total_rows, stats.added, stats.updated, stats.skipped
        );

        stats
    }

    /// Cases in first-seen order
    pub fn cases(&self) -> impl Iterator<Item = &CaseRecord> {
        self.order.iter().filter_map(|sn| self.cases.get(sn))
    }

    pub fn into_cases(mut self) -> Vec<CaseRecord> {
        self.order
            .iter()
            .filter_map(|sn| self.cases.remove(sn))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn remember(&mut self, sn: String, case: CaseRecord) {
        if self.cases.insert(sn.clone(), case).is_none() {
            self.order.push(sn);
        }
    }

    /// Normalize the filing date and recompute the age of an imported row
    fn prepare_row(&self, sn: &str, mut row: Row, stats: &mut IngestStats) -> Row {
        let filing_date = normalize_date(row.get(FIELD_FILING_DATE).map_or("", String::as_str));
        let today = self.today.format(ISO_DATE_FORMAT).to_string();

        let age = match calculate_business_days_with_limit(
            &filing_date,
            &today,
            self.holidays,
            self.policy.max_span_days,
        ) {
            Ok(age) => age,
            Err(e) => {
                warn!("Could not age case {}: {}", sn, e);
                stats.errors.push(format!("SN {}: {}", sn, e));
                Age::NotAvailable
            }
        };

        let adjustment = row
            .get(FIELD_OFFICE)
            .map(|office| self.policy.office_adjustment(office))
            .unwrap_or(0);
        let age = age.plus(adjustment);

        row.insert(FIELD_FILING_DATE.to_string(), filing_date);
        row.insert(FIELD_STORED_AGE.to_string(), age.to_string());
        row
    }

    /// New case from a prepared row; `original_age` is the imported `Dia`
    fn new_case(&self, row: Row, original_age: String) -> CaseRecord {
        let related = row
            .get(FIELD_OBSERVATION)
            .and_then(|obs| extract_related_complaint_number(obs))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let status_missing = row
            .get(FIELD_STATUS)
            .is_none_or(|status| status.trim().is_empty());

        let mut case = CaseRecord::from(row);
        if status_missing {
            case.insert(FIELD_STATUS, DEFAULT_STATUS);
        }
        case.insert(FIELD_ORIGINAL_AGE, original_age);
        case.insert(FIELD_RELATED_COMPLAINT, related);
        case.insert(
            FIELD_ASSIGNED_DATE,
            self.today.format(ISO_DATE_FORMAT).to_string(),
        );
        case
    }
}
