//! Command implementations for the casetrack CLI
//!
//! Each command lives in its own module. This module dispatches on the parsed
//! arguments and holds the pieces every command shares: logging setup,
//! configuration loading, and calendar and date resolution.

pub mod age;
pub mod business_days;
pub mod export;
pub mod holidays;
pub mod ingest;
pub mod parse;

use crate::business_days::{parse_required_date, today_in};
use crate::calendar::HolidayCalendar;
use crate::cli::args::{Args, Commands};
use crate::config::AppConfig;
use crate::csv_parser::decode_text;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::Path;
use tracing::debug;

/// Main command runner
pub async fn run(args: Args) -> Result<()> {
    setup_logging(args.get_log_level());

    let config = load_config(args.config_file.as_deref())?;
    debug!("Effective configuration: {:?}", config);

    match args.command {
        Some(Commands::BusinessDays(cmd)) => business_days::run_business_days(cmd, &config).await,
        Some(Commands::Parse(cmd)) => parse::run_parse(cmd, &config).await,
        Some(Commands::Age(cmd)) => age::run_age(cmd, &config).await,
        Some(Commands::Ingest(cmd)) => ingest::run_ingest(cmd, &config).await,
        Some(Commands::Export(cmd)) => export::run_export(cmd, &config).await,
        Some(Commands::Holidays(cmd)) => holidays::run_holidays(cmd, &config).await,
        None => anyhow::bail!("No command given. Run `casetrack --help` for usage."),
    }
}

/// Set up structured logging on stderr
///
/// `RUST_LOG` takes precedence over the verbosity flags.
pub fn setup_logging(log_level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("casetrack={}", log_level)));

    // A subscriber may already be installed when commands run inside tests
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .try_init();

    debug!("Logging initialized at level: {}", log_level);
}

/// Load configuration from an explicit file, the user config dir, or defaults
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => AppConfig::load_or_default().context("Failed to load default configuration"),
    }
}

/// Holiday calendar from a command-line override or the configuration
pub fn resolve_calendar(override_path: Option<&Path>, config: &AppConfig) -> Result<HolidayCalendar> {
    let calendar = match override_path {
        Some(path) => HolidayCalendar::load(path)
            .with_context(|| format!("Failed to load holiday calendar {}", path.display()))?,
        None => config
            .holiday_calendar()
            .context("Failed to load configured holiday calendar")?,
    };

    debug!(
        "Using holiday calendar '{}' {} ({} dates)",
        calendar.name(),
        calendar.version(),
        calendar.len()
    );
    Ok(calendar)
}

/// Reference date from `--today`, or today in the configured timezone
pub fn resolve_today(today: Option<&str>, config: &AppConfig) -> Result<NaiveDate> {
    match today {
        Some(value) => parse_required_date(value).context("Invalid --today argument"),
        None => Ok(today_in(config.tz()?)),
    }
}

/// Read a case file, accepting UTF-8 or ISO-8859-1 content
pub async fn read_case_file(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(decode_text(&bytes))
}

/// Write `contents` to `path`, or to stdout when no path is given
pub async fn write_output(path: Option<&Path>, contents: &str) -> Result<()> {
    match path {
        Some(path) => tokio::fs::write(path, contents)
            .await
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{}", contents.trim_end_matches('\n'));
            Ok(())
        }
    }
}
