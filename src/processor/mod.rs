//! Row expansion pipeline.
//!
//! Turns a source shipment export into the carrier import table:
//! country filter, per-row field extraction, package explosion and
//! column-resolved output. The transform is pure: it reads the input frame,
//! never mutates shared state and produces byte-identical output for the
//! same input and template.
//!
//! ## Architecture
//!
//! - [`transform`] - the batch entry point
//! - [`reader`] - CSV decoding of exports and template headers
//! - [`writer`] - CSV encoding of the output table

pub mod reader;
pub mod writer;

#[cfg(test)]
mod tests;

use crate::config::{TransformConfig, fold_country};
use crate::error::{Result, ShipError};
use crate::models::{CellValue, OutputRow, ShipmentOutput, ShipmentTable, TransformStats};
use crate::normalize::{parse_quantity, recover_state};
use crate::package::{package_weight, split_packages};
use crate::schema::{FieldMappingTable, LogicalField, ResolvedMapping, TargetSchema, resolve};
use polars::prelude::{DataFrame, DataType};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Shipment attributes pulled from one source row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShipmentRecord {
    pub order_id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: String,
    pub email: String,
    pub insurance: String,
    pub quantity: u32,
}

/// Source columns as trimmed text, missing columns as `None`
struct SourceView {
    country: Vec<String>,
    description: Vec<String>,
    optional: HashMap<&'static str, Option<Vec<String>>>,
}

impl SourceView {
    fn load(input: &DataFrame, config: &TransformConfig) -> Result<Self> {
        let columns = &config.source_columns;

        let country = required_column(input, &columns.country, "destination country")?;
        let description = required_column(input, &columns.description, "merchandise description")?;

        let optional_roles = [
            ("order_id", &columns.order_id),
            ("name", &columns.name),
            ("address", &columns.address),
            ("city", &columns.city),
            ("region", &columns.region),
            ("postal_code", &columns.postal_code),
            ("phone", &columns.phone),
            ("email", &columns.email),
            ("insurance", &columns.insurance),
        ];

        let mut optional = HashMap::new();
        for (role, header) in optional_roles {
            let values = optional_column(input, header)?;
            if values.is_none() {
                debug!("Source column '{}' ({}) not present; using empty values", header, role);
            }
            optional.insert(role, values);
        }

        Ok(Self {
            country,
            description,
            optional,
        })
    }

    fn get(&self, role: &str, row: usize) -> &str {
        self.optional
            .get(role)
            .and_then(|values| values.as_ref())
            .and_then(|values| values.get(row))
            .map(String::as_str)
            .unwrap_or("")
    }

    fn record(&self, row: usize) -> ShipmentRecord {
        let region = self.get("region", row);
        let state = match recover_state(region) {
            Some((strategy, code)) => {
                debug!("Row {}: state {} from '{}' ({})", row + 1, code, region, strategy);
                code
            }
            None => String::new(),
        };

        ShipmentRecord {
            order_id: self.get("order_id", row).to_string(),
            name: self.get("name", row).to_string(),
            address: self.get("address", row).to_string(),
            city: self.get("city", row).to_string(),
            state,
            zip: self.get("postal_code", row).to_string(),
            phone: self.get("phone", row).to_string(),
            email: self.get("email", row).to_string(),
            insurance: self.get("insurance", row).to_string(),
            quantity: parse_quantity(&self.description[row]),
        }
    }
}

fn required_column(input: &DataFrame, header: &str, role: &'static str) -> Result<Vec<String>> {
    optional_column(input, header)?.ok_or_else(|| ShipError::missing_column(header, role))
}

fn optional_column(input: &DataFrame, header: &str) -> Result<Option<Vec<String>>> {
    let Some(column) = input
        .get_column_names()
        .into_iter()
        .find(|name| name.trim() == header.trim())
        .cloned()
    else {
        return Ok(None);
    };

    let series = input
        .column(column.as_str())?
        .as_materialized_series()
        .cast(&DataType::String)?;
    let values = series
        .str()?
        .into_iter()
        .map(|value| value.unwrap_or("").trim().to_string())
        .collect();
    Ok(Some(values))
}

/// Schema positions of every logical field for the run
struct ColumnSlots {
    slots: HashMap<LogicalField, usize>,
}

impl ColumnSlots {
    fn new(schema: &TargetSchema, mapping: &ResolvedMapping) -> Self {
        let slots = LogicalField::ALL
            .iter()
            .filter_map(|field| {
                let column = mapping.column(*field)?;
                Some((*field, schema.index_of(column)?))
            })
            .collect();
        Self { slots }
    }

    fn write(&self, row: &mut OutputRow, field: LogicalField, value: impl Into<CellValue>) {
        if let Some(&index) = self.slots.get(&field) {
            row.set(index, value);
        }
    }
}

/// Explode one record into its package rows
fn expand_record(
    record: &ShipmentRecord,
    schema: &TargetSchema,
    slots: &ColumnSlots,
    config: &TransformConfig,
) -> Vec<OutputRow> {
    split_packages(record.quantity, config.chunk_size)
        .into_iter()
        .map(|qty| {
            let mut row = OutputRow::empty(schema);
            slots.write(&mut row, LogicalField::OrderNo, record.order_id.as_str());
            slots.write(&mut row, LogicalField::Name, record.name.as_str());
            slots.write(&mut row, LogicalField::Address, record.address.as_str());
            slots.write(&mut row, LogicalField::City, record.city.as_str());
            slots.write(&mut row, LogicalField::State, record.state.as_str());
            slots.write(&mut row, LogicalField::Zip, record.zip.as_str());
            slots.write(&mut row, LogicalField::Phone, record.phone.as_str());
            slots.write(&mut row, LogicalField::IcePacks, config.ice_packs.as_str());
            slots.write(&mut row, LogicalField::Quantity, qty);
            slots.write(
                &mut row,
                LogicalField::Weight,
                package_weight(qty, config.unit_weight),
            );
            slots.write(&mut row, LogicalField::Email, record.email.as_str());
            slots.write(&mut row, LogicalField::Sku, config.sku.as_str());
            slots.write(&mut row, LogicalField::Insurance, record.insurance.as_str());
            slots.write(&mut row, LogicalField::PackageType, config.package_type.as_str());
            row
        })
        .collect()
}

/// Transform a source export into the carrier import table
///
/// Structural problems (invalid configuration, a missing country or
/// description column) are reported before any row is produced. Field-level
/// problems degrade to empty or zero values.
///
/// ```
/// use polars::prelude::*;
/// use wine2weship::{FieldMappingTable, TargetSchema, TransformConfig, transform};
///
/// let input = df!(
///     "Paese" => ["United States of America", "Italy"],
///     "Descrizione merce" => ["12x Wine", "6x Wine"],
///     "Provincia" => ["Texas", "Roma"],
/// ).unwrap();
/// let schema = TargetSchema::new(["OrderNo*", "State*", "QTY*"]).unwrap();
///
/// let output = transform(&input, &schema, FieldMappingTable::weship(), &TransformConfig::default()).unwrap();
/// assert_eq!(output.table.len(), 1);
/// ```
pub fn transform(
    input: &DataFrame,
    schema: &TargetSchema,
    fields: &FieldMappingTable,
    config: &TransformConfig,
) -> Result<ShipmentOutput> {
    config.validate()?;
    let source = SourceView::load(input, config)?;

    let (mapping, schema) = resolve(schema, fields);
    let slots = ColumnSlots::new(&schema, &mapping);

    let marker = config.country_key();
    let mut stats = TransformStats {
        rows_read: input.height(),
        synthesized_columns: mapping.synthesized().to_vec(),
        ..Default::default()
    };

    info!(
        "Transforming {} source rows into {} template columns",
        stats.rows_read,
        schema.len()
    );

    let mut rows = Vec::new();
    for (index, country) in source.country.iter().enumerate() {
        if fold_country(country) != marker {
            stats.rows_filtered += 1;
            continue;
        }
        stats.rows_kept += 1;

        let record = source.record(index);
        if record.state.is_empty() {
            stats.unresolved_states += 1;
            warn!(
                "Row {} (order '{}'): no state code recovered from '{}'",
                index + 1,
                record.order_id,
                source.get("region", index)
            );
        }
        if record.quantity == 0 {
            stats.zero_quantity_rows += 1;
            debug!(
                "Row {} (order '{}'): no bottle count in '{}'",
                index + 1,
                record.order_id,
                source.description[index]
            );
        }
        stats.total_units += u64::from(record.quantity);

        let packages = expand_record(&record, &schema, &slots, config);
        debug!(
            "Row {} (order '{}'): {} bottles in {} packages",
            index + 1,
            record.order_id,
            record.quantity,
            packages.len()
        );
        rows.extend(packages);
    }

    stats.packages = rows.len();
    info!("{}", stats.summary());

    Ok(ShipmentOutput {
        table: ShipmentTable::new(schema, rows),
        mapping,
        stats,
    })
}
