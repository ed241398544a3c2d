//! Holidays command: list the active holiday calendar

use super::resolve_calendar;
use crate::calendar::HolidayCalendar;
use crate::cli::args::{HolidaysArgs, OutputFormat};
use crate::config::AppConfig;
use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use colored::*;

pub async fn run_holidays(args: HolidaysArgs, config: &AppConfig) -> Result<()> {
    let calendar = resolve_calendar(args.holidays.as_deref(), config)?;
    let dates = dates_in_year(&calendar, args.year);

    match args.output_format {
        OutputFormat::Json => {
            let iso: Vec<String> = dates.iter().map(|d| d.to_string()).collect();
            let json = serde_json::json!({
                "name": calendar.name(),
                "version": calendar.version(),
                "dates": iso,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Human => {
            println!(
                "{} {} {}",
                "Holiday calendar:".bright_green().bold(),
                calendar.name().bright_cyan(),
                format!("({})", calendar.version()).bright_black()
            );
            for date in &dates {
                println!("  {}  {}", date, date.format("%A").to_string().bright_black());
            }
            println!();
            println!("{} dates", dates.len().to_string().bright_yellow());
        }
    }
    Ok(())
}

fn dates_in_year(calendar: &HolidayCalendar, year: Option<i32>) -> Vec<NaiveDate> {
    calendar
        .iter()
        .filter(|d| year.is_none_or(|y| d.year() == y))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dates_in_year() {
        let calendar = HolidayCalendar::colombia_default();
        let all = dates_in_year(&calendar, None);
        let y2026 = dates_in_year(&calendar, Some(2026));
        assert_eq!(all.len(), calendar.len());
        assert_eq!(y2026.len(), 18);
        assert!(y2026.iter().all(|d| d.year() == 2026));
        assert!(dates_in_year(&calendar, Some(2030)).is_empty());
    }
}
