//! CSV writing for the carrier import table
//!
//! Columns are written exactly in template order with a header row.

use crate::error::Result;
use crate::models::ShipmentTable;
use polars::prelude::{CsvWriter, SerWriter};
use std::fs::{self, File};
use std::path::Path;
use tracing::debug;

/// Write the table as CSV, creating parent directories, and return the row count
pub fn write_csv(table: &ShipmentTable, output_path: &Path) -> Result<usize> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut df = table.to_dataframe()?;
    let mut file = File::create(output_path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .finish(&mut df)?;

    debug!(
        "Wrote {} rows x {} columns to {}",
        df.height(),
        df.width(),
        output_path.display()
    );
    Ok(df.height())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OutputRow;
    use crate::schema::TargetSchema;
    use tempfile::TempDir;

    #[test]
    fn test_write_csv_creates_directories_and_keeps_order() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("nested").join("out.csv");

        let schema = TargetSchema::new(["OrderNo*", "QTY*", "Notes"]).unwrap();
        let mut row = OutputRow::empty(&schema);
        row.set(0, "A-1");
        row.set(1, 12u32);
        let table = ShipmentTable::new(schema, vec![row]);

        let written = write_csv(&table, &output_path).unwrap();

        assert_eq!(written, 1);
        let content = fs::read_to_string(&output_path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("OrderNo*,QTY*,Notes"));
        // Empty text may be written bare or as "" depending on quoting
        let row = lines.next().unwrap();
        assert!(row.starts_with("A-1,12,"), "unexpected row {:?}", row);
        assert_eq!(lines.next(), None);
    }
}
