//! Error handling for shipment transformation.
//!
//! Only structural problems surface here: unreadable files, a source export
//! missing a required column, or a target template that cannot be used.
//! Field-level problems degrade to empty or zero values and never become errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShipError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Required column '{column}' missing from source export ({role})")]
    MissingColumn { column: String, role: &'static str },

    #[error("Invalid target template: {reason}")]
    InvalidTemplate { reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl ShipError {
    /// Create a missing column error for a source role
    pub fn missing_column(column: impl Into<String>, role: &'static str) -> Self {
        Self::MissingColumn {
            column: column.into(),
            role,
        }
    }

    /// Create an invalid template error
    pub fn invalid_template(reason: impl Into<String>) -> Self {
        Self::InvalidTemplate {
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether this error comes from the shape of the data rather than I/O
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ShipError::MissingColumn { .. } | ShipError::InvalidTemplate { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ShipError>;
