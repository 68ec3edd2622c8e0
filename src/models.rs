//! Core data structures for shipment transformation.
//!
//! Defines the output row and table types, the per-run statistics and the
//! combined transform result handed back to callers.

use crate::error::Result;
use crate::schema::{ResolvedMapping, TargetSchema};
use polars::prelude::{Column, DataFrame};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single output cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellValue {
    Text(String),
    Integer(i64),
}

impl CellValue {
    pub fn empty() -> Self {
        CellValue::Text(String::new())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(text) => Some(text),
            CellValue::Integer(_) => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            CellValue::Integer(value) => Some(*value),
            CellValue::Text(_) => None,
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(text) => f.write_str(text),
            CellValue::Integer(value) => write!(f, "{}", value),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Integer(i64::from(value))
    }
}

/// One package row, holding a cell for every schema column in schema order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    cells: Vec<CellValue>,
}

impl OutputRow {
    /// A row with every column set to the empty string
    pub fn empty(schema: &TargetSchema) -> Self {
        Self {
            cells: vec![CellValue::empty(); schema.len()],
        }
    }

    /// Overwrite the cell at a schema position
    pub fn set(&mut self, index: usize, value: impl Into<CellValue>) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = value.into();
        }
    }

    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }

    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }
}

/// The transformed carrier import table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipmentTable {
    schema: TargetSchema,
    rows: Vec<OutputRow>,
}

impl ShipmentTable {
    pub fn new(schema: TargetSchema, rows: Vec<OutputRow>) -> Self {
        Self { schema, rows }
    }

    pub fn schema(&self) -> &TargetSchema {
        &self.schema
    }

    pub fn columns(&self) -> &[String] {
        self.schema.columns()
    }

    pub fn rows(&self) -> &[OutputRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell of a row by column name
    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        let index = self.schema.index_of(column)?;
        self.rows.get(row)?.get(index)
    }

    /// Convert to a polars DataFrame in schema column order
    ///
    /// Columns holding only integers become `Int64`; every other column is
    /// written as text.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let columns = self
            .schema
            .columns()
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let cells = self.rows.iter().map(|row| &row.cells[index]);
                let integers: Option<Vec<i64>> = cells.clone().map(CellValue::as_integer).collect();
                match integers {
                    Some(values) if !values.is_empty() => Column::new(name.as_str().into(), values),
                    _ => {
                        let values: Vec<String> = cells.map(CellValue::to_string).collect();
                        Column::new(name.as_str().into(), values)
                    }
                }
            })
            .collect::<Vec<_>>();

        Ok(DataFrame::new(columns)?)
    }
}

/// Statistics for one transform run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformStats {
    /// Rows in the source export
    pub rows_read: usize,
    /// Rows kept by the country filter
    pub rows_kept: usize,
    /// Rows dropped by the country filter
    pub rows_filtered: usize,
    /// Output rows, one per package
    pub packages: usize,
    /// Bottles across all kept rows
    pub total_units: u64,
    /// Kept rows whose region gave no state code
    pub unresolved_states: usize,
    /// Kept rows whose description gave no bottle count
    pub zero_quantity_rows: usize,
    /// Template columns appended during resolution
    pub synthesized_columns: Vec<String>,
}

impl TransformStats {
    /// Share of source rows kept by the country filter, as a percentage
    pub fn keep_rate(&self) -> f64 {
        if self.rows_read == 0 {
            0.0
        } else {
            (self.rows_kept as f64 / self.rows_read as f64) * 100.0
        }
    }

    /// Average packages per kept row
    pub fn packages_per_row(&self) -> f64 {
        if self.rows_kept == 0 {
            0.0
        } else {
            self.packages as f64 / self.rows_kept as f64
        }
    }

    /// Whether any kept row degraded to an empty state or zero quantity
    pub fn has_degraded_rows(&self) -> bool {
        self.unresolved_states > 0 || self.zero_quantity_rows > 0
    }

    pub fn summary(&self) -> String {
        format!(
            "{} rows read, {} kept ({:.1}%), {} packages, {} bottles, {} unresolved states, {} zero-quantity rows",
            self.rows_read,
            self.rows_kept,
            self.keep_rate(),
            self.packages,
            self.total_units,
            self.unresolved_states,
            self.zero_quantity_rows
        )
    }
}

/// Everything a transform run produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipmentOutput {
    pub table: ShipmentTable,
    pub mapping: ResolvedMapping,
    pub stats: TransformStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> TargetSchema {
        TargetSchema::new(["OrderNo*", "QTY*", "Notes"]).unwrap()
    }

    #[test]
    fn test_empty_row_has_one_cell_per_column() {
        let row = OutputRow::empty(&schema());
        assert_eq!(row.cells().len(), 3);
        assert!(row.cells().iter().all(|c| c == &CellValue::empty()));
    }

    #[test]
    fn test_set_out_of_range_is_ignored() {
        let mut row = OutputRow::empty(&schema());
        row.set(7, "x");
        assert_eq!(row.cells().len(), 3);
    }

    #[test]
    fn test_to_dataframe_types_and_order() {
        let mut first = OutputRow::empty(&schema());
        first.set(0, "A1");
        first.set(1, 12u32);
        let mut second = OutputRow::empty(&schema());
        second.set(0, "A1");
        second.set(1, 1u32);

        let table = ShipmentTable::new(schema(), vec![first, second]);
        let df = table.to_dataframe().unwrap();

        assert_eq!(df.height(), 2);
        let names: Vec<String> = df.get_column_names().iter().map(|n| n.to_string()).collect();
        assert_eq!(names, ["OrderNo*", "QTY*", "Notes"]);
        assert_eq!(
            df.column("QTY*").unwrap().dtype(),
            &polars::prelude::DataType::Int64
        );
        assert_eq!(
            df.column("Notes").unwrap().dtype(),
            &polars::prelude::DataType::String
        );
        assert_eq!(table.value(1, "QTY*"), Some(&CellValue::Integer(1)));
        assert_eq!(table.value(0, "Missing"), None);
    }

    #[test]
    fn test_empty_table_converts() {
        let table = ShipmentTable::new(schema(), Vec::new());
        let df = table.to_dataframe().unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 3);
    }

    #[test]
    fn test_stats_rates() {
        let stats = TransformStats {
            rows_read: 4,
            rows_kept: 2,
            rows_filtered: 2,
            packages: 3,
            ..Default::default()
        };
        assert_eq!(stats.keep_rate(), 50.0);
        assert_eq!(stats.packages_per_row(), 1.5);
        assert!(!stats.has_degraded_rows());
        assert!(stats.summary().contains("3 packages"));
    }
}
