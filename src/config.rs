//! Configuration management and validation.
//!
//! Provides the transform configuration: which source headers carry each
//! shipment attribute, which destination country is kept, how bottles are
//! packed and weighed, and the constant values written on every package.

use crate::constants::{self, source_columns};
use crate::error::{Result, ShipError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Header names of the source export, one per shipment attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceColumns {
    /// Destination country (required)
    pub country: String,
    pub order_id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    /// Free-text region, normalized to a 2-letter state code
    pub region: String,
    pub postal_code: String,
    pub phone: String,
    pub email: String,
    /// Merchandise description the bottle count is parsed from (required)
    pub description: String,
    pub insurance: String,
}

impl Default for SourceColumns {
    fn default() -> Self {
        Self {
            country: source_columns::COUNTRY.to_string(),
            order_id: source_columns::ORDER_ID.to_string(),
            name: source_columns::NAME.to_string(),
            address: source_columns::ADDRESS.to_string(),
            city: source_columns::CITY.to_string(),
            region: source_columns::REGION.to_string(),
            postal_code: source_columns::POSTAL_CODE.to_string(),
            phone: source_columns::PHONE.to_string(),
            email: source_columns::EMAIL.to_string(),
            description: source_columns::DESCRIPTION.to_string(),
            insurance: source_columns::INSURANCE.to_string(),
        }
    }
}

/// Global configuration for a transform run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformConfig {
    /// Country value kept by the filter, compared trimmed and case-folded
    pub country: String,

    /// Maximum bottles per package
    pub chunk_size: u32,

    /// Weight per bottle
    pub unit_weight: f64,

    /// Ice pack flag written on every package
    pub ice_packs: String,

    /// SKU written on every package
    pub sku: String,

    /// Package content type written on every package
    pub package_type: String,

    /// Source export header names
    pub source_columns: SourceColumns,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            country: constants::DEFAULT_COUNTRY.to_string(),
            chunk_size: constants::DEFAULT_CHUNK_SIZE,
            unit_weight: constants::DEFAULT_UNIT_WEIGHT,
            ice_packs: constants::DEFAULT_ICE_PACKS.to_string(),
            sku: constants::DEFAULT_SKU.to_string(),
            package_type: constants::DEFAULT_PACKAGE_TYPE.to_string(),
            source_columns: SourceColumns::default(),
        }
    }
}

impl TransformConfig {
    /// Set the destination country kept by the filter
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// Set the maximum bottles per package
    pub fn with_chunk_size(mut self, chunk_size: u32) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the weight per bottle
    pub fn with_unit_weight(mut self, unit_weight: f64) -> Self {
        self.unit_weight = unit_weight;
        self
    }

    /// Use a different set of source headers
    pub fn with_source_columns(mut self, source_columns: SourceColumns) -> Self {
        self.source_columns = source_columns;
        self
    }

    /// Country marker in the form rows are compared against
    pub fn country_key(&self) -> String {
        fold_country(&self.country)
    }

    /// Reject settings the transform cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(ShipError::configuration("chunk size must be at least 1"));
        }
        if !self.unit_weight.is_finite() || self.unit_weight < 0.0 {
            return Err(ShipError::configuration(format!(
                "unit weight must be a non-negative number, got {}",
                self.unit_weight
            )));
        }
        if self.country.trim().is_empty() {
            return Err(ShipError::configuration("country marker is empty"));
        }
        if self.source_columns.country.trim().is_empty()
            || self.source_columns.description.trim().is_empty()
        {
            return Err(ShipError::configuration(
                "country and description source columns must be named",
            ));
        }

        debug!(
            "Validated transform config: country={:?}, chunk_size={}, unit_weight={}",
            self.country, self.chunk_size, self.unit_weight
        );
        Ok(())
    }
}

/// Trim and case-fold a country value for comparison
pub fn fold_country(value: &str) -> String {
    value.trim().to_lowercase()
}
