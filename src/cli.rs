//! Command-line interface components.

use crate::config::TransformConfig;
use crate::constants::{
    DEFAULT_CHUNK_SIZE, DEFAULT_COUNTRY, DEFAULT_OUTPUT_FILENAME, DEFAULT_UNIT_WEIGHT,
};
use crate::error::{Result, ShipError};
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "wine2weship")]
#[command(about = "Convert a shipment export into a WeShip import file for US deliveries")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Source shipment export (CSV)
    #[arg(value_name = "INPUT")]
    pub input_path: PathBuf,

    /// WeShip template whose header row defines the output columns
    #[arg(short, long, value_name = "TEMPLATE")]
    pub template: PathBuf,

    /// Output CSV path (defaults to wine2weship_output.csv next to the input)
    #[arg(short, long = "output")]
    pub output_path: Option<PathBuf>,

    /// Destination country kept by the filter
    #[arg(long, default_value = DEFAULT_COUNTRY)]
    pub country: String,

    /// Maximum bottles per package
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: u32,

    /// Weight per bottle
    #[arg(long, default_value_t = DEFAULT_UNIT_WEIGHT)]
    pub unit_weight: f64,

    /// Field delimiter for input and template (sniffed from the header when omitted)
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,

    /// Number of output rows to preview (0 disables the preview)
    #[arg(long, default_value_t = 10)]
    pub preview: usize,

    /// Transform and report without writing the output file
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Get the output path, defaulting to a file next to the input
    pub fn get_output_path(&self) -> PathBuf {
        match &self.output_path {
            Some(path) => path.clone(),
            None => self
                .input_path
                .parent()
                .unwrap_or(Path::new("."))
                .join(DEFAULT_OUTPUT_FILENAME),
        }
    }

    /// Log level implied by the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Build the transform configuration from defaults and flags
    pub fn to_config(&self) -> Result<TransformConfig> {
        let config = TransformConfig::default()
            .with_country(self.country.clone())
            .with_chunk_size(self.chunk_size)
            .with_unit_weight(self.unit_weight);
        config.validate()?;

        if self.output_path.as_deref() == Some(self.input_path.as_path()) {
            return Err(ShipError::configuration(
                "output path must differ from the input path",
            ));
        }
        Ok(config)
    }
}

/// Parse a single-byte delimiter, accepting `\t` and `tab` for tabs
fn parse_delimiter(value: &str) -> std::result::Result<u8, String> {
    match value {
        "\\t" | "tab" => Ok(b'\t'),
        _ => {
            let bytes = value.as_bytes();
            if bytes.len() == 1 {
                Ok(bytes[0])
            } else {
                Err(format!(
                    "delimiter must be a single ASCII character, got {:?}",
                    value
                ))
            }
        }
    }
}
