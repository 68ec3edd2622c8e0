//! Application constants for wine2weship
//!
//! Static lookup data (US state names and codes, free-text aliases, target
//! template header candidates) and the default values used by the transform.

use std::collections::HashSet;
use std::sync::LazyLock;

// =============================================================================
// Transform Defaults
// =============================================================================

/// Destination country marker kept by the country filter
pub const DEFAULT_COUNTRY: &str = "United States of America";

/// Maximum bottles per carrier package
pub const DEFAULT_CHUNK_SIZE: u32 = 12;

/// Shipping weight per bottle, used as `ceil(unit_weight * qty)`
pub const DEFAULT_UNIT_WEIGHT: f64 = 3.66;

/// Ice pack flag written on every package
pub const DEFAULT_ICE_PACKS: &str = "NO";

/// SKU written on every package
pub const DEFAULT_SKU: &str = "STILL WINE";

/// Package content type written on every package
pub const DEFAULT_PACKAGE_TYPE: &str = "WINE";

/// Output file name used when no output path is given
pub const DEFAULT_OUTPUT_FILENAME: &str = "wine2weship_output.csv";

/// Delimiters tried when sniffing a CSV header line
pub const CANDIDATE_DELIMITERS: &[u8] = b",;\t|";

// =============================================================================
// Source Export Headers
// =============================================================================

/// Header names of the shipment export the tool was built around
pub mod source_columns {
    pub const COUNTRY: &str = "Paese";
    pub const ORDER_ID: &str = "ID Spedizione";
    pub const NAME: &str = "Destinatario";
    pub const ADDRESS: &str = "Indirizzo";
    pub const CITY: &str = "Città";
    pub const REGION: &str = "Provincia";
    pub const POSTAL_CODE: &str = "CAP";
    pub const PHONE: &str = "Telefono";
    pub const EMAIL: &str = "e-mail";
    pub const DESCRIPTION: &str = "Descrizione merce";
    pub const INSURANCE: &str = "Importo Netto Assicurazione";
}

// =============================================================================
// US States and Territories
// =============================================================================

/// Full state, district and territory names with their postal codes
pub const STATE_NAMES: &[(&str, &str)] = &[
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("District of Columbia", "DC"),
    ("Washington DC", "DC"),
    ("Washington, DC", "DC"),
    ("DC", "DC"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
    ("Puerto Rico", "PR"),
    ("Guam", "GU"),
    ("American Samoa", "AS"),
    ("U.S. Virgin Islands", "VI"),
    ("Northern Mariana Islands", "MP"),
];

/// Common free-text corruptions seen in the region field, keyed upper-case
pub const STATE_ALIASES: &[(&str, &str)] = &[
    ("NYC", "NY"),
    ("DISTRITO OF COLUMBIA", "DC"),
    ("WASHINGTON DC", "DC"),
    ("WASHINGTON", "WA"),
];

/// Every known 2-letter code
pub static STATE_CODES: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STATE_NAMES.iter().map(|(_, code)| *code).collect());

// =============================================================================
// Target Template Headers
// =============================================================================

/// Canonical header names of the WeShip import template
pub mod target_columns {
    pub const ORDER_NO: &str = "OrderNo*";
    pub const NAME: &str = "Name*";
    pub const ADDRESS: &str = "Add1*";
    pub const CITY: &str = "City*";
    pub const STATE: &str = "State*";
    pub const ZIP: &str = "Zip*";
    pub const PHONE: &str = "Phone*";
    pub const ICE_PACKS: &str = "Ice Packs (Yes/No)*";
    pub const QUANTITY: &str = "QTY*";
    pub const WEIGHT: &str = "Weight*";
    pub const EMAIL: &str = "Email";
    pub const SKU: &str = "SKU*";
    pub const INSURANCE: &str = "Insurance";
    pub const PACKAGE_TYPE: &str = "PC Type*";
}

/// Accepted header spellings per template field, tried in order
pub mod header_candidates {
    pub const ORDER_NO: &[&str] = &["OrderNo*", "Order No", "OrderNo"];
    pub const NAME: &[&str] = &["Name*", "Name"];
    pub const ADDRESS: &[&str] = &["Add1*", "Address1", "Address 1", "Add 1"];
    pub const CITY: &[&str] = &["City*", "City"];
    pub const STATE: &[&str] = &["State*", "State"];
    pub const ZIP: &[&str] = &["Zip*", "ZIP", "Postal Code", "Postcode"];
    pub const PHONE: &[&str] = &["Phone*", "Phone", "Telephone"];
    pub const ICE_PACKS: &[&str] = &["Ice Packs (Yes/No)*", "Ice Packs"];
    pub const QUANTITY: &[&str] = &["QTY*", "Qty", "Quantity"];
    pub const WEIGHT: &[&str] = &["Weight*", "Weight"];
    pub const EMAIL: &[&str] = &["Email", "E-mail", "Mail"];
    pub const SKU: &[&str] = &["SKU*", "SKU"];
    pub const INSURANCE: &[&str] = &["Insurance", "Insurance Amount", "Insured Value"];
    pub const PACKAGE_TYPE: &[&str] = &["PC Type*", "PC Type"];
}

/// Check whether a value is a known state or territory code (case-insensitive)
pub fn is_state_code(value: &str) -> bool {
    value.len() == 2 && STATE_CODES.contains(value.to_ascii_uppercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_table_covers_states_dc_and_territories() {
        // 50 states + DC + 5 territories
        assert_eq!(STATE_CODES.len(), 56);
        assert!(STATE_NAMES.contains(&("District of Columbia", "DC")));
        assert!(STATE_NAMES.contains(&("Northern Mariana Islands", "MP")));
    }

    #[test]
    fn test_is_state_code() {
        assert!(is_state_code("TX"));
        assert!(is_state_code("tx"));
        assert!(is_state_code("Dc"));
        assert!(!is_state_code("XX"));
        assert!(!is_state_code("TXA"));
        assert!(!is_state_code(""));
    }

    #[test]
    fn test_canonical_name_is_first_candidate() {
        assert_eq!(header_candidates::ORDER_NO[0], target_columns::ORDER_NO);
        assert_eq!(header_candidates::ICE_PACKS[0], target_columns::ICE_PACKS);
        assert_eq!(header_candidates::PACKAGE_TYPE[0], target_columns::PACKAGE_TYPE);
    }
}
