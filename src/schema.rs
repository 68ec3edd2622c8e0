//! Target template schema and field resolution.
//!
//! The carrier template evolves independently of this tool: headers get
//! renamed, reordered or dropped. Each logical field carries a list of
//! accepted header spellings; resolution binds every field to a concrete
//! template column once per run, appending the canonical header when the
//! template has no match.

use crate::constants::{header_candidates, target_columns};
use crate::error::{Result, ShipError};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::LazyLock;
use tracing::{debug, info};

/// Semantic role of an output column, independent of its header spelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogicalField {
    OrderNo,
    Name,
    Address,
    City,
    State,
    Zip,
    Phone,
    IcePacks,
    Quantity,
    Weight,
    Email,
    Sku,
    Insurance,
    PackageType,
}

impl LogicalField {
    /// Every logical field, in template order
    pub const ALL: [LogicalField; 14] = [
        LogicalField::OrderNo,
        LogicalField::Name,
        LogicalField::Address,
        LogicalField::City,
        LogicalField::State,
        LogicalField::Zip,
        LogicalField::Phone,
        LogicalField::IcePacks,
        LogicalField::Quantity,
        LogicalField::Weight,
        LogicalField::Email,
        LogicalField::Sku,
        LogicalField::Insurance,
        LogicalField::PackageType,
    ];

    /// Header used when the template has no matching column
    pub fn canonical_name(&self) -> &'static str {
        match self {
            LogicalField::OrderNo => target_columns::ORDER_NO,
            LogicalField::Name => target_columns::NAME,
            LogicalField::Address => target_columns::ADDRESS,
            LogicalField::City => target_columns::CITY,
            LogicalField::State => target_columns::STATE,
            LogicalField::Zip => target_columns::ZIP,
            LogicalField::Phone => target_columns::PHONE,
            LogicalField::IcePacks => target_columns::ICE_PACKS,
            LogicalField::Quantity => target_columns::QUANTITY,
            LogicalField::Weight => target_columns::WEIGHT,
            LogicalField::Email => target_columns::EMAIL,
            LogicalField::Sku => target_columns::SKU,
            LogicalField::Insurance => target_columns::INSURANCE,
            LogicalField::PackageType => target_columns::PACKAGE_TYPE,
        }
    }

    /// Accepted header spellings, tried in order
    pub fn default_candidates(&self) -> &'static [&'static str] {
        match self {
            LogicalField::OrderNo => header_candidates::ORDER_NO,
            LogicalField::Name => header_candidates::NAME,
            LogicalField::Address => header_candidates::ADDRESS,
            LogicalField::City => header_candidates::CITY,
            LogicalField::State => header_candidates::STATE,
            LogicalField::Zip => header_candidates::ZIP,
            LogicalField::Phone => header_candidates::PHONE,
            LogicalField::IcePacks => header_candidates::ICE_PACKS,
            LogicalField::Quantity => header_candidates::QUANTITY,
            LogicalField::Weight => header_candidates::WEIGHT,
            LogicalField::Email => header_candidates::EMAIL,
            LogicalField::Sku => header_candidates::SKU,
            LogicalField::Insurance => header_candidates::INSURANCE,
            LogicalField::PackageType => header_candidates::PACKAGE_TYPE,
        }
    }
}

impl fmt::Display for LogicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// Candidate header names for one logical field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    pub field: LogicalField,
    pub canonical: String,
    pub candidates: Vec<String>,
}

/// Ordered logical field to header candidates table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMappingTable {
    entries: Vec<FieldMapping>,
}

static DEFAULT_FIELD_MAPPINGS: LazyLock<FieldMappingTable> = LazyLock::new(|| {
    FieldMappingTable::new(
        LogicalField::ALL
            .iter()
            .map(|field| FieldMapping {
                field: *field,
                canonical: field.canonical_name().to_string(),
                candidates: field
                    .default_candidates()
                    .iter()
                    .map(|c| c.to_string())
                    .collect(),
            })
            .collect(),
    )
});

impl FieldMappingTable {
    pub fn new(entries: Vec<FieldMapping>) -> Self {
        Self { entries }
    }

    /// The WeShip template mapping, built once per process
    pub fn weship() -> &'static FieldMappingTable {
        &DEFAULT_FIELD_MAPPINGS
    }

    pub fn entries(&self) -> &[FieldMapping] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ordered, duplicate-free list of template column names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSchema {
    columns: Vec<String>,
}

impl TargetSchema {
    /// Build a schema from template headers, trimming each name
    ///
    /// An empty list, a blank header or a repeated header makes the template
    /// unusable and is reported as an error.
    pub fn new<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let columns: Vec<String> = columns
            .into_iter()
            .map(|c| c.as_ref().trim().to_string())
            .collect();

        if columns.is_empty() {
            return Err(ShipError::invalid_template("template has no columns"));
        }

        let mut seen = HashSet::new();
        for (index, column) in columns.iter().enumerate() {
            if column.is_empty() {
                return Err(ShipError::invalid_template(format!(
                    "column {} has a blank header",
                    index + 1
                )));
            }
            if !seen.insert(column.as_str()) {
                return Err(ShipError::invalid_template(format!(
                    "duplicate column '{}'",
                    column
                )));
            }
        }

        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Position of a column by exact name
    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }
}

/// Per-run binding from logical field to template column
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedMapping {
    columns: HashMap<LogicalField, String>,
    synthesized: Vec<String>,
}

impl ResolvedMapping {
    /// Template column bound to a logical field
    pub fn column(&self, field: LogicalField) -> Option<&str> {
        self.columns.get(&field).map(String::as_str)
    }

    /// Columns appended because the template had no match, in append order
    pub fn synthesized(&self) -> &[String] {
        &self.synthesized
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Bind every logical field to a template column
///
/// Candidates are compared case-insensitively against the template headers
/// and the first hit wins, keeping the template's spelling. A field with no
/// hit resolves to its canonical name, appended to the returned schema unless
/// already present. The input schema is left untouched.
pub fn resolve(
    schema: &TargetSchema,
    table: &FieldMappingTable,
) -> (ResolvedMapping, TargetSchema) {
    let mut columns = schema.columns.clone();
    // Only the template's own headers are candidate targets
    let mut by_lowercase: HashMap<String, usize> = HashMap::new();
    for (index, column) in columns.iter().enumerate() {
        by_lowercase.entry(column.to_lowercase()).or_insert(index);
    }

    let mut resolved = ResolvedMapping::default();

    for entry in table.entries() {
        let matched = entry
            .candidates
            .iter()
            .find_map(|candidate| by_lowercase.get(&candidate.to_lowercase()))
            .map(|&index| columns[index].clone());

        let column = match matched {
            Some(column) => {
                debug!("Resolved {:?} to template column '{}'", entry.field, column);
                column
            }
            None => {
                if !columns.iter().any(|c| c == &entry.canonical) {
                    info!(
                        "Template has no column for {:?}; appending '{}'",
                        entry.field, entry.canonical
                    );
                    columns.push(entry.canonical.clone());
                    resolved.synthesized.push(entry.canonical.clone());
                }
                entry.canonical.clone()
            }
        };

        resolved.columns.insert(entry.field, column);
    }

    (resolved, TargetSchema { columns })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(columns: &[&str]) -> TargetSchema {
        TargetSchema::new(columns.iter().copied()).unwrap()
    }

    #[test]
    fn test_exact_template_resolves_without_synthesis() {
        let all: Vec<&str> = LogicalField::ALL.iter().map(|f| f.canonical_name()).collect();
        let template = schema(&all);

        let (mapping, extended) = resolve(&template, FieldMappingTable::weship());

        assert_eq!(extended, template);
        assert!(mapping.synthesized().is_empty());
        assert_eq!(mapping.len(), 14);
        assert_eq!(mapping.column(LogicalField::IcePacks), Some("Ice Packs (Yes/No)*"));
    }

    #[test]
    fn test_missing_field_appended_at_end() {
        let template = schema(&["OrderNo*", "Name*"]);

        let (mapping, extended) = resolve(&template, FieldMappingTable::weship());

        assert_eq!(&extended.columns()[..2], ["OrderNo*", "Name*"]);
        assert_eq!(extended.len(), 14);
        assert!(extended.contains("Zip*"));
        assert_eq!(mapping.column(LogicalField::Zip), Some("Zip*"));
        assert_eq!(mapping.synthesized().len(), 12);
        assert_eq!(extended.columns().last().map(String::as_str), Some("PC Type*"));
    }

    #[test]
    fn test_candidates_match_case_insensitively_keeping_template_spelling() {
        let template = schema(&["order no", "POSTAL CODE", "qty", "e-mail"]);

        let (mapping, extended) = resolve(&template, FieldMappingTable::weship());

        assert_eq!(mapping.column(LogicalField::OrderNo), Some("order no"));
        assert_eq!(mapping.column(LogicalField::Zip), Some("POSTAL CODE"));
        assert_eq!(mapping.column(LogicalField::Quantity), Some("qty"));
        assert_eq!(mapping.column(LogicalField::Email), Some("e-mail"));
        assert_eq!(&extended.columns()[..4], template.columns());
    }

    #[test]
    fn test_candidate_order_decides_between_matches() {
        // Both "Qty" and "Quantity" exist; "Qty" is listed first
        let template = schema(&["Quantity", "Qty"]);

        let (mapping, _) = resolve(&template, FieldMappingTable::weship());

        assert_eq!(mapping.column(LogicalField::Quantity), Some("Qty"));
    }

    #[test]
    fn test_resolution_is_pure_and_deterministic() {
        let template = schema(&["Name", "Weight"]);

        let first = resolve(&template, FieldMappingTable::weship());
        let second = resolve(&template, FieldMappingTable::weship());

        assert_eq!(first, second);
        assert_eq!(template.columns(), ["Name", "Weight"]);
    }

    #[test]
    fn test_custom_table_canonical_already_present() {
        let table = FieldMappingTable::new(vec![FieldMapping {
            field: LogicalField::Sku,
            canonical: "Product".to_string(),
            candidates: vec!["Item Code".to_string()],
        }]);
        let template = schema(&["Product"]);

        let (mapping, extended) = resolve(&template, &table);

        assert_eq!(mapping.column(LogicalField::Sku), Some("Product"));
        assert_eq!(extended, template);
        assert!(mapping.synthesized().is_empty());
    }

    #[test]
    fn test_candidates_never_bind_to_synthesized_columns() {
        let table = FieldMappingTable::new(vec![
            FieldMapping {
                field: LogicalField::Sku,
                canonical: "Product".to_string(),
                candidates: vec!["Item Code".to_string()],
            },
            FieldMapping {
                field: LogicalField::PackageType,
                canonical: "Kind".to_string(),
                candidates: vec!["product".to_string()],
            },
        ]);
        let template = schema(&["OrderNo*"]);

        let (mapping, extended) = resolve(&template, &table);

        assert_eq!(mapping.column(LogicalField::Sku), Some("Product"));
        assert_eq!(mapping.column(LogicalField::PackageType), Some("Kind"));
        assert_eq!(extended.columns(), ["OrderNo*", "Product", "Kind"]);
        assert_eq!(mapping.synthesized(), ["Product", "Kind"]);
    }

    #[test]
    fn test_schema_rejects_empty_blank_and_duplicates() {
        assert!(matches!(
            TargetSchema::new(Vec::<String>::new()),
            Err(ShipError::InvalidTemplate { .. })
        ));
        assert!(TargetSchema::new(["OrderNo*", "  "]).is_err());
        assert!(TargetSchema::new(["Name*", " Name* "]).is_err());
    }

    #[test]
    fn test_schema_trims_headers() {
        let template = TargetSchema::new([" OrderNo* ", "Name*\t"]).unwrap();
        assert_eq!(template.columns(), ["OrderNo*", "Name*"]);
        assert_eq!(template.index_of("Name*"), Some(1));
    }
}
