//! Export command: re-serialize a case file with normalized fields

use super::{read_case_file, write_output};
use crate::cli::args::ExportArgs;
use crate::config::AppConfig;
use crate::csv_parser::{ParseOptions, parse_csv_with, write_csv};
use anyhow::Result;
use tracing::{info, warn};

pub async fn run_export(args: ExportArgs, config: &AppConfig) -> Result<()> {
    let text = read_case_file(&args.input).await?;
    let options = ParseOptions {
        delimiter: args.delimiter.or(config.default_delimiter),
    };
    let table = parse_csv_with(&text, &options);
    if table.is_empty() {
        warn!("{} has no data rows; output will be empty", args.input.display());
    }

    let csv = write_csv(&table, args.to)?;
    write_output(args.output.as_deref(), &csv).await?;

    info!(
        "Exported {} rows from {} ({} delimited)",
        table.row_count(),
        args.input.display(),
        args.to
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_parser::parse_csv;
    use crate::models::Delimiter;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_export_semicolon_to_comma() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.csv");
        let output = dir.path().join("out.csv");
        std::fs::write(
            &input,
            "SN;Nombre_Cliente;obs\n1;ana gómez;\"pago, no aplicado\"\n",
        )
        .unwrap();

        let args = ExportArgs {
            input,
            to: Delimiter::Comma,
            delimiter: None,
            output: Some(output.clone()),
        };
        run_export(args, &AppConfig::default()).await.unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(
            written,
            "SN,Nombre_Cliente,obs\n1,ANA GÓMEZ,\"pago, no aplicado\"\n"
        );
        assert_eq!(parse_csv(&written).row_count(), 1);
    }
}
