//! Free-text field normalization
//!
//! Both parsers are ordered chains of pure strategies, tried until one
//! produces a value:
//! - [`state`] - region text to 2-letter US state codes
//! - [`quantity`] - merchandise descriptions to bottle counts

pub mod quantity;
pub mod state;

pub use quantity::parse_quantity;
pub use state::{normalize_state, recover_state};
