//! Ingest command: import case files and emit the merged case set as JSON

use super::{read_case_file, resolve_calendar, resolve_today, write_output};
use crate::cli::args::IngestArgs;
use crate::config::AppConfig;
use crate::csv_parser::{ParseOptions, parse_csv_with};
use crate::ingest::{CaseIngestor, IngestStats};
use crate::models::CaseRecord;
use anyhow::{Context, Result};
use colored::*;
use std::path::Path;
use tracing::info;

pub async fn run_ingest(args: IngestArgs, config: &AppConfig) -> Result<()> {
    let calendar = resolve_calendar(args.holidays.as_deref(), config)?;
    let today = resolve_today(args.today.as_deref(), config)?;
    let options = ParseOptions {
        delimiter: args.delimiter.or(config.default_delimiter),
    };

    let existing = match &args.existing {
        Some(path) => load_existing(path).await?,
        None => Vec::new(),
    };
    info!("Starting import with {} existing cases", existing.len());

    let mut ingestor = CaseIngestor::new(&calendar, &config.aging, today).with_existing(existing);
    let mut totals = IngestStats::default();

    for input in &args.inputs {
        let text = read_case_file(input).await?;
        let stats = ingestor.ingest(parse_csv_with(&text, &options));
        info!(
            "{}: {} added, {} updated, {} skipped",
            input.display(),
            stats.added,
            stats.updated,
            stats.skipped
        );
        totals.absorb(stats);
    }

    let cases = ingestor.into_cases();
    let json = serde_json::to_string_pretty(&cases)?;
    write_output(args.output.as_deref(), &json).await?;

    // Keep stdout clean for the JSON when no output file is given
    eprintln!(
        "{} {} new cases added, {} existing updated, {} skipped",
        "Import complete:".bright_green().bold(),
        totals.added,
        totals.updated,
        totals.skipped
    );
    for error in &totals.errors {
        eprintln!("  {} {}", "warning:".yellow(), error);
    }
    Ok(())
}

/// Load previously stored cases from a JSON array
async fn load_existing(path: &Path) -> Result<Vec<CaseRecord>> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read existing cases {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Invalid case JSON in {}", path.display()))
}
