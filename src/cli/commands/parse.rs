//! Parse command: report the structure of a case file

use super::read_case_file;
use crate::cli::args::{OutputFormat, ParseArgs};
use crate::config::AppConfig;
use crate::csv_parser::{ParseOptions, parse_csv_with};
use crate::models::ParsedTable;
use anyhow::Result;
use colored::*;
use tracing::{info, warn};

pub async fn run_parse(args: ParseArgs, config: &AppConfig) -> Result<()> {
    let text = read_case_file(&args.input).await?;
    let options = ParseOptions {
        delimiter: args.delimiter.or(config.default_delimiter),
    };
    let table = parse_csv_with(&text, &options);

    if table.is_empty() {
        warn!("{} has no data rows", args.input.display());
    }
    info!(
        "Parsed {}: {} columns, {} rows",
        args.input.display(),
        table.headers.len(),
        table.row_count()
    );

    match args.output_format {
        OutputFormat::Json => println!("{}", table_json(&table)?),
        OutputFormat::Human => print_summary(&table),
    }
    Ok(())
}

/// Table as JSON with each row's fields in header order
fn table_json(table: &ParsedTable) -> Result<String> {
    let rows: Vec<serde_json::Map<String, serde_json::Value>> = table
        .data
        .iter()
        .map(|row| {
            table
                .headers
                .iter()
                .filter_map(|h| row.get(h).map(|v| (h.clone(), v.clone().into())))
                .collect()
        })
        .collect();

    let json = serde_json::json!({ "headers": table.headers, "data": rows });
    Ok(serde_json::to_string_pretty(&json)?)
}

fn print_summary(table: &ParsedTable) {
    println!("{}", "Columns:".bright_green().bold());
    for (i, header) in table.headers.iter().enumerate() {
        println!("  {:>3}. {}", i + 1, header.bright_cyan());
    }
    println!();
    println!(
        "{} {}",
        "Rows:".bright_green().bold(),
        table.row_count().to_string().bright_yellow()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_parser::parse_csv;

    #[test]
    fn test_table_json_shape() {
        let table = parse_csv("b;a\n1;2\n");
        let json: serde_json::Value = serde_json::from_str(&table_json(&table).unwrap()).unwrap();

        assert_eq!(json["headers"], serde_json::json!(["b", "a"]));
        assert_eq!(json["data"][0]["b"], "1");
        assert_eq!(json["data"][0]["a"], "2");
    }

    #[test]
    fn test_table_json_empty() {
        let json: serde_json::Value =
            serde_json::from_str(&table_json(&ParsedTable::default()).unwrap()).unwrap();
        assert_eq!(json["data"], serde_json::json!([]));
    }
}
