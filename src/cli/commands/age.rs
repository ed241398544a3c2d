//! Age command: current business-day age of every case in a file

use super::{read_case_file, resolve_calendar, resolve_today};
use crate::business_days::calculate_case_age;
use crate::calendar::HolidayCalendar;
use crate::cli::args::{AgeArgs, OutputFormat};
use crate::config::{AgingPolicy, AppConfig};
use crate::constants::NOT_AVAILABLE;
use crate::csv_parser::{ParseOptions, parse_csv_with};
use crate::models::{Age, CaseRecord};
use anyhow::Result;
use chrono::NaiveDate;
use colored::*;
use serde::Serialize;
use tracing::{info, warn};

/// One line of the age report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseAgeLine {
    pub sn: String,
    pub cun: String,
    pub status: String,
    pub office: String,
    pub age: Age,
}

pub async fn run_age(args: AgeArgs, config: &AppConfig) -> Result<()> {
    let calendar = resolve_calendar(args.holidays.as_deref(), config)?;
    let today = resolve_today(args.today.as_deref(), config)?;

    let text = read_case_file(&args.input).await?;
    let options = ParseOptions {
        delimiter: args.delimiter.or(config.default_delimiter),
    };
    let cases = parse_csv_with(&text, &options).into_cases();
    info!("Aging {} cases as of {}", cases.len(), today);

    let lines = age_cases(&cases, &calendar, today, &config.aging);

    match args.output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&lines)?),
        OutputFormat::Human => print_lines(&lines, today),
    }
    Ok(())
}

/// Totals shown under the age report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AgeSummary {
    pub cases: usize,
    pub without_age: usize,
    pub oldest: Option<u32>,
}

impl AgeSummary {
    pub fn from_lines(lines: &[CaseAgeLine]) -> Self {
        Self {
            cases: lines.len(),
            without_age: lines.iter().filter(|l| !l.age.is_available()).count(),
            oldest: lines.iter().filter_map(|l| l.age.days()).max(),
        }
    }
}

/// Age each case; cases whose span is too large are reported as `N/A`
pub fn age_cases(
    cases: &[CaseRecord],
    calendar: &HolidayCalendar,
    today: NaiveDate,
    policy: &AgingPolicy,
) -> Vec<CaseAgeLine> {
    cases
        .iter()
        .map(|case| {
            let age = calculate_case_age(case, calendar, today, policy).unwrap_or_else(|e| {
                warn!("Case {}: {}", case.sn().unwrap_or("?"), e);
                Age::NotAvailable
            });

            CaseAgeLine {
                sn: case.sn().unwrap_or_default().to_string(),
                cun: case.cun().unwrap_or_default().to_string(),
                status: case.status().unwrap_or_default().to_string(),
                office: case.office().unwrap_or_default().to_string(),
                age,
            }
        })
        .collect()
}

fn print_lines(lines: &[CaseAgeLine], today: NaiveDate) {
    println!(
        "{}",
        format!("Case ages as of {}", today).bright_green().bold()
    );
    println!();
    println!(
        "  {:<22} {:<22} {:<18} {:>6}",
        "SN".bold(),
        "CUN".bold(),
        "Estado".bold(),
        "Días".bold()
    );

    for line in lines {
        let age = match line.age {
            Age::Days(days) => days.to_string().bright_yellow(),
            Age::NotAvailable => line.age.to_string().bright_black(),
        };
        println!(
            "  {:<22} {:<22} {:<18} {:>6}",
            line.sn, line.cun, line.status, age
        );
    }

    let summary = AgeSummary::from_lines(lines);
    println!();
    println!(
        "{} cases, oldest {} business days, {} without age",
        summary.cases.to_string().bright_yellow(),
        summary
            .oldest
            .map_or_else(|| NOT_AVAILABLE.to_string(), |d| d.to_string())
            .bright_yellow(),
        summary.without_age.to_string().bright_yellow()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_parser::parse_csv;

    #[test]
    fn test_age_cases() {
        let cases = parse_csv(
            "SN;CUN;Estado_Gestion;Dia;Fecha Radicado;nombre_oficina\n\
             1;C1;Pendiente;;2025-08-07;Centro\n\
             2;C2;Resuelto;11;2025-08-07;Centro\n\
             3;C3;Escalado;;2025-08-07;oesia\n\
             4;C4;Pendiente;;;Centro\n",
        )
        .into_cases();

        let today = NaiveDate::from_ymd_opt(2025, 8, 11).unwrap();
        let lines = age_cases(
            &cases,
            &HolidayCalendar::colombia_default(),
            today,
            &AgingPolicy::default(),
        );

        let ages: Vec<Age> = lines.iter().map(|l| l.age).collect();
        assert_eq!(
            ages,
            vec![Age::Days(2), Age::Days(11), Age::Days(4), Age::NotAvailable]
        );
        assert_eq!(lines[2].cun, "C3");

        let summary = AgeSummary::from_lines(&lines);
        assert_eq!(
            summary,
            AgeSummary {
                cases: 4,
                without_age: 1,
                oldest: Some(11),
            }
        );
    }

    #[test]
    fn test_summary_of_unaged_cases() {
        let summary = AgeSummary::from_lines(&[CaseAgeLine {
            sn: "1".to_string(),
            cun: String::new(),
            status: String::new(),
            office: String::new(),
            age: Age::NotAvailable,
        }]);
        assert_eq!(summary.oldest, None);
        assert_eq!(summary.without_age, 1);
        assert_eq!(AgeSummary::from_lines(&[]), AgeSummary::default());
    }

    #[test]
    fn test_oversized_span_reported_as_not_available() {
        let cases = vec![CaseRecord::new().with("Fecha Radicado", "1950-01-01")];
        let today = NaiveDate::from_ymd_opt(2025, 8, 11).unwrap();
        let lines = age_cases(
            &cases,
            &HolidayCalendar::new(),
            today,
            &AgingPolicy::default(),
        );
        assert_eq!(lines[0].age, Age::NotAvailable);
        assert_eq!(lines[0].sn, "");
    }
}
