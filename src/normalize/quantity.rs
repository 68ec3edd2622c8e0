//! Bottle count extraction from merchandise descriptions
//!
//! Descriptions list line items as free text, e.g. `"6x Chianti, 6x Barolo"`.
//! Multiplier tokens are summed first; descriptions without them fall back to
//! summing every standalone integer.

use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

/// A single extraction attempt over a description
pub type QuantityStrategy = fn(&str) -> Option<u32>;

/// Strategies in priority order, named for diagnostics
pub const QUANTITY_STRATEGIES: &[(&str, QuantityStrategy)] = &[
    ("multipliers", multiplier_total),
    ("bare_integers", bare_integer_total),
];

static MULTIPLIER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9]+)\s*x").unwrap());

static BARE_INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b([0-9]+)\b").unwrap());

/// Total bottle count described, 0 when nothing can be parsed
///
/// ```
/// use wine2weship::parse_quantity;
///
/// assert_eq!(parse_quantity("6x Red, 6x White"), 12);
/// assert_eq!(parse_quantity("3 bottles, 2 bottles"), 5);
/// assert_eq!(parse_quantity("no numbers here"), 0);
/// ```
pub fn parse_quantity(description: &str) -> u32 {
    if description.trim().is_empty() {
        return 0;
    }
    QUANTITY_STRATEGIES
        .iter()
        .find_map(|(_, strategy)| strategy(description))
        .unwrap_or(0)
}

/// Sum of every `<digits> x` multiplier, matched case-insensitively
pub fn multiplier_total(description: &str) -> Option<u32> {
    sum_captures(&MULTIPLIER, &description.to_lowercase())
}

/// Sum of every standalone integer token
///
/// Product codes and vintages are counted too (`"Barolo 2019"` reads as
/// 2019 bottles); kept for compatibility with previously generated files.
pub fn bare_integer_total(description: &str) -> Option<u32> {
    sum_captures(&BARE_INTEGER, description)
}

/// Sum the first capture group of every match
///
/// `None` when nothing matches. A digit group or total that does not fit a
/// `u32` makes the whole description unreadable and yields `Some(0)`.
fn sum_captures(pattern: &Regex, haystack: &str) -> Option<u32> {
    let mut groups = pattern
        .captures_iter(haystack)
        .filter_map(|caps| caps.get(1))
        .peekable();
    groups.peek()?;

    let total = groups.try_fold(0u32, |total, digits| {
        digits
            .as_str()
            .parse::<u32>()
            .ok()
            .and_then(|count| total.checked_add(count))
    });
    if total.is_none() {
        warn!("Bottle count in '{}' is out of range; using 0", haystack);
    }
    Some(total.unwrap_or(0))
}
