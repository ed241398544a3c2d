//! Delimited text ingestion for case exports.
//!
//! Case exports arrive as comma- or semicolon-separated text with optional
//! double-quoted fields. The header line decides the delimiter unless one is
//! forced through [`ParseOptions`]. Parsing never fails: malformed input
//! degrades to an empty table or best-effort rows.

use crate::constants::{FIELD_CUSTOMER_NAME, FIELD_NUIP, NUIP_MAX_LEN, NUIP_TRUNCATE_PREFIXES};
use crate::error::{CaseError, Result};
use crate::models::{Delimiter, ParsedTable, Row};
use tracing::debug;

/// Parser settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Forced delimiter; sniffed from the header line when `None`
    pub delimiter: Option<Delimiter>,
}

impl ParseOptions {
    pub fn with_delimiter(delimiter: Delimiter) -> Self {
        Self {
            delimiter: Some(delimiter),
        }
    }
}

/// Parse delimited text, sniffing the delimiter from the header line
pub fn parse_csv(text: &str) -> ParsedTable {
    parse_csv_with(text, &ParseOptions::default())
}

/// Parse delimited text with explicit options
pub fn parse_csv_with(text: &str, options: &ParseOptions) -> ParsedTable {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let Some(header_end) = text.find('\n') else {
        return ParsedTable::default();
    };

    let header_line = text[..header_end].trim();
    let delimiter = options
        .delimiter
        .unwrap_or_else(|| Delimiter::sniff(header_line));

    let rows = split_records(&text[header_end + 1..], delimiter.as_char());
    if rows.is_empty() {
        return ParsedTable::default();
    }

    // Positions are kept for blank headers so later columns do not shift
    let positional_headers: Vec<String> = header_line
        .split(delimiter.as_char())
        .map(|h| h.trim().replace('"', ""))
        .collect();

    let data: Vec<Row> = rows
        .iter()
        .map(|fields| build_row(&positional_headers, fields))
        .collect();

    let headers: Vec<String> = positional_headers
        .into_iter()
        .filter(|h| !h.trim().is_empty())
        .collect();

    debug!(
        "Parsed {} rows with {} columns (delimiter: {})",
        data.len(),
        headers.len(),
        delimiter
    );

    ParsedTable { headers, data }
}

/// Split the body into records of raw fields.
///
/// Quoted sections may contain the delimiter and line breaks. A doubled quote
/// inside a quoted section is a literal quote. Outside quotes `\r` is dropped
/// and `\n` ends the record. Records whose fields are all blank are skipped.
fn split_records(body: &str, delimiter: char) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            '\r' => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                push_non_blank(&mut records, std::mem::take(&mut record));
            }
            c if c == delimiter => record.push(std::mem::take(&mut field)),
            c => field.push(c),
        }
    }

    record.push(field);
    push_non_blank(&mut records, record);
    records
}

fn push_non_blank(records: &mut Vec<Vec<String>>, record: Vec<String>) {
    if record.iter().any(|f| !f.trim().is_empty()) {
        records.push(record);
    }
}

/// Map fields onto headers by position, skipping blank header positions
fn build_row(headers: &[String], fields: &[String]) -> Row {
    headers
        .iter()
        .enumerate()
        .filter(|(_, header)| !header.trim().is_empty())
        .map(|(index, header)| {
            let raw = fields.get(index).map(String::as_str).unwrap_or("");
            (header.clone(), normalize_field(header, raw))
        })
        .collect()
}

/// Trim, unquote and apply per-column fixes to a field value
fn normalize_field(header: &str, raw: &str) -> String {
    let mut value = raw.trim().to_string();
    if value.starts_with('"') && value.ends_with('"') {
        value = if value.len() >= 2 {
            value[1..value.len() - 1].replace("\"\"", "\"")
        } else {
            String::new()
        };
    }

    if header == FIELD_NUIP {
        truncate_nuip(value)
    } else if header == FIELD_CUSTOMER_NAME {
        value.to_uppercase()
    } else {
        value
    }
}

/// IDs starting with 8 or 9 carry trailing check characters past nine digits
fn truncate_nuip(value: String) -> String {
    let has_prefix = value.starts_with(NUIP_TRUNCATE_PREFIXES);
    if has_prefix && value.chars().count() > NUIP_MAX_LEN {
        value.chars().take(NUIP_MAX_LEN).collect()
    } else {
        value
    }
}

/// Serialize a table back to delimited text.
///
/// Columns follow `table.headers`; fields containing the delimiter, quotes or
/// line breaks are quoted.
pub fn write_csv(table: &ParsedTable, delimiter: Delimiter) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter.as_byte())
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(&table.headers)?;
    for row in &table.data {
        writer.write_record(
            table
                .headers
                .iter()
                .map(|h| row.get(h).map(String::as_str).unwrap_or("")),
        )?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| CaseError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| CaseError::Configuration {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

/// Decode file bytes as UTF-8, falling back to ISO-8859-1
pub fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.strip_prefix('\u{feff}').unwrap_or(text).to_string(),
        Err(_) => {
            debug!("Input is not UTF-8, decoding as ISO-8859-1");
            bytes.iter().map(|&b| b as char).collect()
        }
    }
}
