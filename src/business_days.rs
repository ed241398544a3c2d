//! Business-day counting and case aging.
//!
//! Days are counted strictly after the start date through the end date
//! inclusive, skipping Saturdays, Sundays and calendar holidays. Dates that
//! cannot be parsed produce `Age::NotAvailable` so a table cell always has
//! something to show; spans longer than the configured limit are rejected
//! with `CaseError::RangeTooLarge`.

use crate::calendar::HolidayCalendar;
use crate::config::AgingPolicy;
use crate::constants::{ISO_DATE_FORMAT, MAX_SPAN_DAYS};
use crate::error::{CaseError, Result};
use crate::models::{Age, CaseRecord};
use chrono::{Datelike, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use tracing::debug;

/// Parse a `YYYY-MM-DD` calendar date, ignoring surrounding whitespace
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), ISO_DATE_FORMAT).ok()
}

/// Parse a `YYYY-MM-DD` date supplied by a caller, failing with `InvalidDate`
pub fn parse_required_date(value: &str) -> Result<NaiveDate> {
    parse_iso_date(value).ok_or_else(|| CaseError::InvalidDate {
        value: value.to_string(),
    })
}

/// Monday to Friday and not a holiday
pub fn is_business_day(date: NaiveDate, holidays: &HolidayCalendar) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !holidays.contains(date)
}

/// Count business days in `(start, end]`.
///
/// Returns 0 when `start` is after `end`. Fails when the span exceeds
/// `max_span_days` calendar days.
pub fn count_business_days(
    start: NaiveDate,
    end: NaiveDate,
    holidays: &HolidayCalendar,
    max_span_days: i64,
) -> Result<u32> {
    if start > end {
        return Ok(0);
    }

    let span_days = (end - start).num_days();
    if span_days > max_span_days {
        return Err(CaseError::RangeTooLarge {
            start: start.format(ISO_DATE_FORMAT).to_string(),
            end: end.format(ISO_DATE_FORMAT).to_string(),
            span_days,
            limit: max_span_days,
        });
    }

    let count = start
        .iter_days()
        .skip(1)
        .take_while(|day| *day <= end)
        .filter(|day| is_business_day(*day, holidays))
        .count();

    Ok(count as u32)
}

/// Business days between two ISO date strings, with the default span limit
pub fn calculate_business_days(start: &str, end: &str, holidays: &HolidayCalendar) -> Result<Age> {
    calculate_business_days_with_limit(start, end, holidays, MAX_SPAN_DAYS)
}

/// Business days between two ISO date strings.
///
/// Unparsable input yields `Age::NotAvailable` rather than an error.
pub fn calculate_business_days_with_limit(
    start: &str,
    end: &str,
    holidays: &HolidayCalendar,
    max_span_days: i64,
) -> Result<Age> {
    let (Some(start_date), Some(end_date)) = (parse_iso_date(start), parse_iso_date(end)) else {
        debug!("Unparsable date range '{}' to '{}'", start, end);
        return Ok(Age::NotAvailable);
    };

    count_business_days(start_date, end_date, holidays, max_span_days).map(Age::Days)
}

/// Today's date in America/Bogota
pub fn bogota_today() -> NaiveDate {
    today_in(chrono_tz::America::Bogota)
}

/// Today's date in `tz`
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// Age of a case in business days as of `today`.
///
/// Cases in a terminal status report their stored age unchanged. Open cases
/// are aged from their filing date, plus any office adjustment.
pub fn calculate_case_age(
    case: &CaseRecord,
    holidays: &HolidayCalendar,
    today: NaiveDate,
    policy: &AgingPolicy,
) -> Result<Age> {
    if case.status().is_some_and(|status| policy.is_terminal(status)) {
        return Ok(Age::from_stored(case.stored_age().unwrap_or_default()));
    }

    let Some(filing_date) = case.filing_date() else {
        return Ok(Age::NotAvailable);
    };

    let Some(filed) = parse_iso_date(filing_date) else {
        debug!("Case {:?} has unparsable filing date '{}'", case.sn(), filing_date);
        return Ok(Age::NotAvailable);
    };

    let age = count_business_days(filed, today, holidays, policy.max_span_days)?;
    let adjustment = case
        .office()
        .map(|office| policy.office_adjustment(office))
        .unwrap_or(0);

    Ok(Age::Days(age).plus(adjustment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{FIELD_FILING_DATE, FIELD_OFFICE, FIELD_STATUS, FIELD_STORED_AGE};

    fn date(s: &str) -> NaiveDate {
        parse_iso_date(s).unwrap()
    }

    fn no_holidays() -> HolidayCalendar {
        HolidayCalendar::new()
    }

    #[test]
    fn test_thursday_to_monday() {
        // Thu Aug 7 2025 -> Fri 8 counts, weekend skipped, Mon 11 counts
        let age = calculate_business_days("2025-08-07", "2025-08-11", &no_holidays()).unwrap();
        assert_eq!(age, Age::Days(2));
    }

    #[test]
    fn test_same_day_is_zero() {
        let age = calculate_business_days("2025-08-07", "2025-08-07", &no_holidays()).unwrap();
        assert_eq!(age, Age::Days(0));
    }

    #[test]
    fn test_reversed_range_is_zero() {
        let age = calculate_business_days("2025-08-11", "2025-08-07", &no_holidays()).unwrap();
        assert_eq!(age, Age::Days(0));
    }

    #[test]
    fn test_unparsable_dates_are_not_available() {
        let holidays = no_holidays();
        assert_eq!(
            calculate_business_days("07/08/2025", "2025-08-11", &holidays).unwrap(),
            Age::NotAvailable
        );
        assert_eq!(
            calculate_business_days("2025-08-07", "", &holidays).unwrap(),
            Age::NotAvailable
        );
        assert_eq!(
            calculate_business_days("2025-02-30", "2025-03-03", &holidays).unwrap(),
            Age::NotAvailable
        );
    }

    #[test]
    fn test_holiday_is_skipped() {
        let holidays = HolidayCalendar::colombia_default();
        // Fri Aug 15 2025 -> Mon 18 is a holiday, only Tue 19 counts
        assert_eq!(
            calculate_business_days("2025-08-15", "2025-08-19", &holidays).unwrap(),
            Age::Days(1)
        );
        // Start date holiday is excluded anyway
        assert_eq!(
            calculate_business_days("2025-08-07", "2025-08-11", &holidays).unwrap(),
            Age::Days(2)
        );
    }

    #[test]
    fn test_weekend_only_range() {
        // Fri to Sun
        let age = calculate_business_days("2025-08-08", "2025-08-10", &no_holidays()).unwrap();
        assert_eq!(age, Age::Days(0));
    }

    #[test]
    fn test_full_weeks_count_weekdays() {
        // Mon Jan 6 2025 through Mon Feb 3 2025: four full weeks after the start
        let count = count_business_days(
            date("2025-01-06"),
            date("2025-02-03"),
            &no_holidays(),
            MAX_SPAN_DAYS,
        )
        .unwrap();
        assert_eq!(count, 20);
    }

    #[test]
    fn test_adding_holidays_never_increases_count() {
        let start = date("2025-03-01");
        let end = date("2025-04-30");
        let mut holidays = no_holidays();
        let mut previous = count_business_days(start, end, &holidays, MAX_SPAN_DAYS).unwrap();

        for day in ["2025-03-15", "2025-03-20", "2025-03-21", "2025-03-24", "2025-04-17"] {
            let was_business = is_business_day(date(day), &holidays);
            holidays.insert(date(day));
            let current = count_business_days(start, end, &holidays, MAX_SPAN_DAYS).unwrap();
            if was_business {
                assert_eq!(current, previous - 1, "holiday {} should remove one day", day);
            } else {
                assert_eq!(current, previous, "weekend holiday {} changes nothing", day);
            }
            previous = current;
        }
    }

    #[test]
    fn test_span_over_limit_is_an_error() {
        let result = calculate_business_days("1990-01-01", "2025-01-01", &no_holidays());
        match result {
            Err(CaseError::RangeTooLarge {
                span_days, limit, ..
            }) => {
                assert!(span_days > limit);
                assert_eq!(limit, 10_000);
            }
            other => panic!("Expected RangeTooLarge error, got {:?}", other),
        }
    }

    #[test]
    fn test_span_at_limit_is_counted() {
        let start = date("2000-01-01");
        let end = start + chrono::Duration::days(10);
        assert!(count_business_days(start, end, &no_holidays(), 10).is_ok());
        assert!(count_business_days(start, end, &no_holidays(), 9).is_err());
    }

    #[test]
    fn test_case_age_open_case() {
        let case = CaseRecord::new()
            .with(FIELD_STATUS, "Pendiente")
            .with(FIELD_FILING_DATE, "2025-08-07");
        let age = calculate_case_age(
            &case,
            &no_holidays(),
            date("2025-08-11"),
            &AgingPolicy::default(),
        )
        .unwrap();
        assert_eq!(age, Age::Days(2));
    }

    #[test]
    fn test_case_age_oesia_adjustment() {
        let case = CaseRecord::new()
            .with(FIELD_FILING_DATE, "2025-08-07")
            .with(FIELD_OFFICE, "Centro Oesia Medellin");
        let age = calculate_case_age(
            &case,
            &no_holidays(),
            date("2025-08-11"),
            &AgingPolicy::default(),
        )
        .unwrap();
        assert_eq!(age, Age::Days(4));
    }

    #[test]
    fn test_case_age_oesia_does_not_touch_sentinel() {
        let case = CaseRecord::new()
            .with(FIELD_FILING_DATE, "not a date")
            .with(FIELD_OFFICE, "OESIA");
        let age = calculate_case_age(
            &case,
            &no_holidays(),
            date("2025-08-11"),
            &AgingPolicy::default(),
        )
        .unwrap();
        assert_eq!(age, Age::NotAvailable);
    }

    #[test]
    fn test_case_age_terminal_status_is_frozen() {
        let case = CaseRecord::new()
            .with(FIELD_STATUS, "Resuelto")
            .with(FIELD_STORED_AGE, "9")
            .with(FIELD_FILING_DATE, "2020-01-01")
            .with(FIELD_OFFICE, "OESIA");
        let age = calculate_case_age(
            &case,
            &no_holidays(),
            date("2025-08-11"),
            &AgingPolicy::default(),
        )
        .unwrap();
        assert_eq!(age, Age::Days(9));

        let finalized = CaseRecord::new().with(FIELD_STATUS, "Finalizado");
        let age = calculate_case_age(
            &finalized,
            &no_holidays(),
            date("2025-08-11"),
            &AgingPolicy::default(),
        )
        .unwrap();
        assert_eq!(age, Age::NotAvailable);
    }

    #[test]
    fn test_case_age_missing_filing_date() {
        let case = CaseRecord::new().with(FIELD_STATUS, "Escalado");
        let age = calculate_case_age(
            &case,
            &no_holidays(),
            date("2025-08-11"),
            &AgingPolicy::default(),
        )
        .unwrap();
        assert_eq!(age, Age::NotAvailable);
    }

    #[test]
    fn test_case_age_inputs_unchanged() {
        let case = CaseRecord::new().with(FIELD_FILING_DATE, "2025-08-07");
        let holidays = HolidayCalendar::colombia_default();
        let before = (case.clone(), holidays.clone());

        calculate_case_age(&case, &holidays, date("2025-09-01"), &AgingPolicy::default()).unwrap();

        assert_eq!((case, holidays), before);
    }

    #[test]
    fn test_bogota_today_is_near_utc_today() {
        let utc_today = Utc::now().date_naive();
        let diff = (utc_today - bogota_today()).num_days();
        assert!((0..=1).contains(&diff));
    }

    #[test]
    fn test_today_in_other_timezone() {
        // UTC+14 is never behind UTC
        let utc_today = Utc::now().date_naive();
        let diff = (today_in(chrono_tz::Pacific::Kiritimati) - utc_today).num_days();
        assert!((0..=1).contains(&diff));
    }

    #[test]
    fn test_parse_required_date() {
        assert_eq!(parse_required_date(" 2025-08-11 ").unwrap(), date("2025-08-11"));
        assert!(matches!(
            parse_required_date("11/08/2025"),
            Err(CaseError::InvalidDate { value }) if value == "11/08/2025"
        ));
        assert!(matches!(
            parse_required_date("2025-02-30"),
            Err(CaseError::InvalidDate { .. })
        ));
    }
}
