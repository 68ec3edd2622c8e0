//! CSV reading for source exports and target templates
//!
//! Exports arrive from different tools with different delimiters, so the
//! delimiter is sniffed from the header line unless given explicitly. Every
//! source column is read as text: the transform decides what a value means.

use crate::constants::CANDIDATE_DELIMITERS;
use crate::error::{Result, ShipError};
use crate::schema::TargetSchema;
use polars::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

const BOM: char = '\u{feff}';

/// Read the first line of a file, without its line terminator
fn read_header_line(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(ShipError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut reader = BufReader::new(File::open(path)?);
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line
        .trim_start_matches(BOM)
        .trim_end_matches(['\r', '\n'])
        .to_string())
}

/// Number of fields a line splits into under a delimiter, quotes honoured
fn field_count(line: &str, delimiter: u8) -> usize {
    ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(|record| record.ok())
        .map_or(0, |record| record.len())
}

/// Pick the candidate delimiter that splits the header into the most fields
///
/// Ties go to the earlier candidate; a line none of them splits is treated
/// as comma separated.
pub fn sniff_delimiter(header_line: &str) -> u8 {
    let mut best = (CANDIDATE_DELIMITERS[0], 1);
    for &delimiter in CANDIDATE_DELIMITERS {
        let fields = field_count(header_line, delimiter);
        if fields > best.1 {
            best = (delimiter, fields);
        }
    }
    best.0
}

/// Read a source export with every column as text and trimmed headers
pub fn read_source(path: &Path, delimiter: Option<u8>) -> Result<DataFrame> {
    let header = read_header_line(path)?;
    let delimiter = delimiter.unwrap_or_else(|| sniff_delimiter(&header));
    debug!(
        "Reading source export {} with delimiter {:?}",
        path.display(),
        delimiter as char
    );

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(
            CsvParseOptions::default()
                .with_separator(delimiter)
                .with_truncate_ragged_lines(true),
        )
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let trimmed: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.trim_start_matches(BOM).trim().to_string())
        .collect();
    df.set_column_names(trimmed)?;

    debug!(
        "Read {} rows x {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );
    Ok(df)
}

/// Read the header row of a target template
pub fn read_template(path: &Path, delimiter: Option<u8>) -> Result<TargetSchema> {
    let header = read_header_line(path)?;
    if header.trim().is_empty() {
        return Err(ShipError::invalid_template(format!(
            "{} has no header row",
            path.display()
        )));
    }

    let delimiter = delimiter.unwrap_or_else(|| sniff_delimiter(&header));
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_path(path)?;
    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|name| name.trim_start_matches(BOM).to_string())
        .collect();
    debug!(
        "Template {} declares {} columns",
        path.display(),
        columns.len()
    );
    TargetSchema::new(columns)
}
