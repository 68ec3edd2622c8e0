//! wine2weship Library
//!
//! Converts shipment exports into WeShip carrier import files for domestic
//! US wine deliveries.
//!
//! This library provides tools for:
//! - Normalizing free-text region fields to 2-letter US state codes
//! - Extracting bottle counts from free-text merchandise descriptions
//! - Splitting orders into carrier-legal packages with per-package weight
//! - Resolving logical fields against a drifting carrier template
//! - Expanding filtered export rows into the carrier import table

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod normalize;
pub mod package;
pub mod processor;
pub mod schema;

// Re-export commonly used types
pub use config::{SourceColumns, TransformConfig};
pub use error::{Result, ShipError};
pub use models::{CellValue, OutputRow, ShipmentOutput, ShipmentTable, TransformStats};
pub use normalize::{normalize_state, parse_quantity, recover_state};
pub use processor::transform;
pub use schema::{FieldMappingTable, LogicalField, ResolvedMapping, TargetSchema, resolve};
