//! Command-line argument definitions for casetrack
//!
//! Defines the CLI interface using the clap derive API: one subcommand per
//! operation plus global logging and configuration flags.

use crate::models::Delimiter;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for casetrack
///
/// Ages telecom complaint cases in business days and ingests case exports
/// from comma- or semicolon-separated files.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "casetrack",
    version,
    about = "Business-day case aging and CSV ingestion for complaint tracking",
    long_about = "Computes the age of complaint cases in business days (weekends and \
                  holidays excluded), and parses, normalizes and re-exports case files \
                  in comma or semicolon separated format."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    ///
    /// JSON configuration file. If not specified, looks for
    /// <config dir>/casetrack/config.json and falls back to defaults.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        global = true,
        help = "Path to configuration file (JSON format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Count business days between two dates
    BusinessDays(BusinessDaysArgs),
    /// Parse a case file and report its columns and rows
    Parse(ParseArgs),
    /// Report the current age of every case in a file
    Age(AgeArgs),
    /// Import one or more case files, merging rows by SN
    Ingest(IngestArgs),
    /// Re-serialize a case file with normalized fields
    Export(ExportArgs),
    /// List the active holiday calendar
    Holidays(HolidaysArgs),
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

/// Arguments for the business-days command
#[derive(Debug, Clone, Parser)]
pub struct BusinessDaysArgs {
    /// Start date (YYYY-MM-DD), not counted
    #[arg(value_name = "START")]
    pub start: String,

    /// End date (YYYY-MM-DD), counted
    #[arg(value_name = "END")]
    pub end: String,

    /// Holiday calendar file (JSON); overrides the configured calendar
    #[arg(long = "holidays", value_name = "FILE")]
    pub holidays: Option<PathBuf>,
}

/// Arguments for the parse command
#[derive(Debug, Clone, Parser)]
pub struct ParseArgs {
    /// Case file to parse
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Force the field delimiter instead of sniffing it from the header line
    #[arg(short = 'd', long = "delimiter", value_enum)]
    pub delimiter: Option<Delimiter>,

    #[arg(long = "output-format", value_enum, default_value = "human")]
    pub output_format: OutputFormat,
}

/// Arguments for the age command
#[derive(Debug, Clone, Parser)]
pub struct AgeArgs {
    /// Case file to age
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Age as of this date (YYYY-MM-DD) instead of today in the configured timezone
    #[arg(long = "today", value_name = "DATE")]
    pub today: Option<String>,

    /// Holiday calendar file (JSON); overrides the configured calendar
    #[arg(long = "holidays", value_name = "FILE")]
    pub holidays: Option<PathBuf>,

    /// Force the field delimiter instead of sniffing it from the header line
    #[arg(short = 'd', long = "delimiter", value_enum)]
    pub delimiter: Option<Delimiter>,

    #[arg(long = "output-format", value_enum, default_value = "human")]
    pub output_format: OutputFormat,
}

/// Arguments for the ingest command
#[derive(Debug, Clone, Parser)]
pub struct IngestArgs {
    /// Case files, imported in order
    #[arg(value_name = "FILE", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Cases already in the store (JSON array of case objects)
    #[arg(long = "existing", value_name = "FILE")]
    pub existing: Option<PathBuf>,

    /// Write merged cases here as JSON instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Import date (YYYY-MM-DD) instead of today in the configured timezone
    #[arg(long = "today", value_name = "DATE")]
    pub today: Option<String>,

    /// Holiday calendar file (JSON); overrides the configured calendar
    #[arg(long = "holidays", value_name = "FILE")]
    pub holidays: Option<PathBuf>,

    /// Force the field delimiter instead of sniffing it from the header line
    #[arg(short = 'd', long = "delimiter", value_enum)]
    pub delimiter: Option<Delimiter>,
}

/// Arguments for the export command
#[derive(Debug, Clone, Parser)]
pub struct ExportArgs {
    /// Case file to re-serialize
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Delimiter of the output file
    #[arg(long = "to", value_enum, default_value = "comma")]
    pub to: Delimiter,

    /// Force the input delimiter instead of sniffing it from the header line
    #[arg(short = 'd', long = "delimiter", value_enum)]
    pub delimiter: Option<Delimiter>,

    /// Output file; stdout when not given
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for the holidays command
#[derive(Debug, Clone, Parser)]
pub struct HolidaysArgs {
    /// Holiday calendar file (JSON); overrides the configured calendar
    #[arg(long = "holidays", value_name = "FILE")]
    pub holidays: Option<PathBuf>,

    /// Only list dates in this year
    #[arg(long = "year")]
    pub year: Option<i32>,

    #[arg(long = "output-format", value_enum, default_value = "human")]
    pub output_format: OutputFormat,
}

impl Args {
    /// Log level from the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }
}
