//! Pipeline tests for the row expansion transform
//!
//! Builds small in-memory exports and checks filtering, expansion, column
//! resolution and structural error reporting.


use crate::config::TransformConfig;
use crate::models::{CellValue, ShipmentOutput};
use crate::processor::transform;
use crate::schema::{FieldMappingTable, LogicalField, TargetSchema};
use polars::prelude::*;

/// The full WeShip template, canonical headers in order
pub fn weship_schema() -> TargetSchema {
    TargetSchema::new(LogicalField::ALL.iter().map(|f| f.canonical_name())).unwrap()
}

/// A source export row with every known column populated
pub struct ExportRow {
    pub country: &'static str,
    pub order_id: &'static str,
    pub region: &'static str,
    pub postal_code: &'static str,
    pub description: &'static str,
}

impl ExportRow {
    pub fn us(order_id: &'static str, region: &'static str, description: &'static str) -> Self {
        Self {
            country: "United States of America",
            order_id,
            region,
            postal_code: "73301",
            description,
        }
    }
}

/// Build an export frame using the default source headers
pub fn export_frame(rows: &[ExportRow]) -> DataFrame {
    let column = |f: fn(&ExportRow) -> &'static str| rows.iter().map(f).collect::<Vec<_>>();
    df!(
        "Paese" => column(|r| r.country),
        "ID Spedizione" => column(|r| r.order_id),
        "Destinatario" => column(|_| "Jane Doe"),
        "Indirizzo" => column(|_| "1 Main St"),
        "Città" => column(|_| "Austin"),
        "Provincia" => column(|r| r.region),
        "CAP" => column(|r| r.postal_code),
        "Telefono" => column(|_| "+1 512 555 0100"),
        "e-mail" => column(|_| "jane@example.com"),
        "Descrizione merce" => column(|r| r.description),
        "Importo Netto Assicurazione" => column(|_| "150"),
    )
    .unwrap()
}

/// Run the transform with the WeShip mapping and default configuration
pub fn run(input: &DataFrame, schema: &TargetSchema) -> ShipmentOutput {
    transform(
        input,
        schema,
        FieldMappingTable::weship(),
        &TransformConfig::default(),
    )
    .unwrap()
}

/// Text of a cell, rendering integers as they are written out
pub fn cell(output: &ShipmentOutput, row: usize, column: &str) -> String {
    output
        .table
        .value(row, column)
        .map(CellValue::to_string)
        .unwrap_or_else(|| panic!("no cell at row {} column {}", row, column))
}
