//! Business-days command: count working days between two dates

use super::resolve_calendar;
use crate::business_days::calculate_business_days_with_limit;
use crate::cli::args::BusinessDaysArgs;
use crate::config::AppConfig;
use crate::models::Age;
use anyhow::Result;
use tracing::info;

pub async fn run_business_days(args: BusinessDaysArgs, config: &AppConfig) -> Result<()> {
    let age = business_days(&args, config)?;
    println!("{}", age);
    Ok(())
}

fn business_days(args: &BusinessDaysArgs, config: &AppConfig) -> Result<Age> {
    let calendar = resolve_calendar(args.holidays.as_deref(), config)?;
    let age = calculate_business_days_with_limit(
        &args.start,
        &args.end,
        &calendar,
        config.aging.max_span_days,
    )?;

    info!("{} -> {}: {} business days", args.start, args.end, age);
    Ok(age)
}
