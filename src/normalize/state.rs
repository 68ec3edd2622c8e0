//! US state normalization for free-text region fields
//!
//! Region values in shipment exports are typed by hand: full names, codes,
//! "City, ST" pairs, country names appended after the state. The normalizer
//! tries an ordered list of strategies and returns the first 2-letter code
//! any of them recovers, or an empty string.

use crate::constants::{STATE_ALIASES, STATE_NAMES, is_state_code};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// A single normalization attempt over a trimmed, non-empty value
pub type StateStrategy = fn(&str) -> Option<String>;

/// Strategies in priority order, named for diagnostics
pub const STATE_STRATEGIES: &[(&str, StateStrategy)] = &[
    ("exact_code", exact_code),
    ("alias", alias),
    ("full_name", full_name),
    ("reverse_tokens", reverse_tokens),
    ("leading_letters", leading_letters),
];

static NON_LETTERS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z ]+").unwrap());

static TOKEN_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,/|-]+").unwrap());

/// Full names keyed by their lookup form
static NAME_INDEX: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| {
    STATE_NAMES
        .iter()
        .map(|(name, code)| (lookup_key(name), *code))
        .collect()
});

static ALIAS_INDEX: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| STATE_ALIASES.iter().copied().collect());

/// Normalize a free-text region to a 2-letter state code
///
/// Never fails: a value no strategy can recover yields an empty string.
///
/// ```
/// use wine2weship::normalize_state;
///
/// assert_eq!(normalize_state("california"), "CA");
/// assert_eq!(normalize_state("Springfield, IL"), "IL");
/// assert_eq!(normalize_state(""), "");
/// ```
pub fn normalize_state(raw: &str) -> String {
    recover_state(raw).map(|(_, code)| code).unwrap_or_default()
}

/// First recovered code together with the name of the strategy that found it
pub fn recover_state(raw: &str) -> Option<(&'static str, String)> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    STATE_STRATEGIES
        .iter()
        .find_map(|(name, strategy)| strategy(value).map(|code| (*name, code)))
}

/// Keep only ASCII letters and spaces, trimmed
fn clean(value: &str) -> String {
    NON_LETTERS.replace_all(value, "").trim().to_string()
}

/// Case- and spacing-insensitive form used for name lookups
fn lookup_key(value: &str) -> String {
    clean(value)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Value is already a known 2-letter code
pub fn exact_code(value: &str) -> Option<String> {
    is_state_code(value).then(|| value.to_ascii_uppercase())
}

/// Value matches a known free-text corruption
pub fn alias(value: &str) -> Option<String> {
    ALIAS_INDEX
        .get(lookup_key(value).as_str())
        .map(|code| code.to_string())
}

/// Value is a full state, district or territory name
pub fn full_name(value: &str) -> Option<String> {
    let key = lookup_key(value);
    if key.is_empty() {
        return None;
    }
    NAME_INDEX.get(&key).map(|code| code.to_string())
}

/// Scan `,` `/` `|` `-` separated tokens from the end for a code or name
pub fn reverse_tokens(value: &str) -> Option<String> {
    let tokens: Vec<&str> = TOKEN_SEPARATORS
        .split(value)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect();
    tokens
        .into_iter()
        .rev()
        .find_map(|token| exact_code(token).or_else(|| full_name(token)))
}

/// Last resort: the first two ASCII letters, upper-cased
pub fn leading_letters(value: &str) -> Option<String> {
    let letters: String = value
        .chars()
        .filter(char::is_ascii_alphabetic)
        .take(2)
        .collect();
    (!letters.is_empty()).then(|| letters.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_pass_through_upper_cased() {
        assert_eq!(normalize_state("CA"), "CA");
        assert_eq!(normalize_state("tx"), "TX");
        assert_eq!(normalize_state("  ny  "), "NY");
        assert_eq!(normalize_state("pr"), "PR");
    }

    #[test]
    fn test_full_names_any_case() {
        assert_eq!(normalize_state("california"), "CA");
        assert_eq!(normalize_state("Texas"), "TX");
        assert_eq!(normalize_state("NEW YORK"), "NY");
        assert_eq!(normalize_state("new  hampshire"), "NH");
        assert_eq!(normalize_state("District of Columbia"), "DC");
        assert_eq!(normalize_state("U.S. Virgin Islands"), "VI");
    }

    #[test]
    fn test_washington_variants() {
        assert_eq!(normalize_state("Washington, DC"), "DC");
        assert_eq!(normalize_state("Washington DC"), "DC");
        assert_eq!(normalize_state("Washington D.C."), "DC");
        assert_eq!(normalize_state("Washington"), "WA");
    }

    #[test]
    fn test_aliases() {
        assert_eq!(normalize_state("NYC"), "NY");
        assert_eq!(normalize_state("nyc"), "NY");
        assert_eq!(normalize_state("Distrito of Columbia"), "DC");
    }

    #[test]
    fn test_reverse_token_scan() {
        assert_eq!(normalize_state("Springfield, IL"), "IL");
        assert_eq!(normalize_state("Austin / Texas"), "TX");
        assert_eq!(normalize_state("Oregon | Portland"), "OR");
        assert_eq!(normalize_state("Napa - CA - USA"), "CA");
        // Tokens are scanned from the end, so the last recognisable one wins
        assert_eq!(normalize_state("Texas, Springfield, IL"), "IL");
        assert_eq!(normalize_state("CA/Reno/Nevada"), "NV");
    }

    #[test]
    fn test_leading_letters_fallback() {
        assert_eq!(normalize_state("Ontario"), "ON");
        assert_eq!(normalize_state("12 b"), "B");
    }

    #[test]
    fn test_unrecoverable_values_are_empty() {
        assert_eq!(normalize_state(""), "");
        assert_eq!(normalize_state("   "), "");
        assert_eq!(normalize_state("12345"), "");
        assert_eq!(normalize_state("-- / --"), "");
    }

    #[test]
    fn test_strategies_individually() {
        assert_eq!(exact_code("Ca"), Some("CA".to_string()));
        assert_eq!(exact_code("ZZ"), None);
        assert_eq!(alias("NYC"), Some("NY".to_string()));
        assert_eq!(alias("Texas"), None);
        assert_eq!(full_name("texas"), Some("TX".to_string()));
        assert_eq!(full_name("Springfield, IL"), None);
        assert_eq!(reverse_tokens("Springfield, IL"), Some("IL".to_string()));
        assert_eq!(reverse_tokens("Springfield"), None);
        assert_eq!(leading_letters("9 Zz"), Some("ZZ".to_string()));
        assert_eq!(leading_letters("42"), None);
    }

    #[test]
    fn test_recover_state_names_strategy() {
        let strategy = |raw: &str| recover_state(raw).map(|(name, _)| name);
        assert_eq!(strategy("CA"), Some("exact_code"));
        assert_eq!(strategy("nyc"), Some("alias"));
        assert_eq!(strategy("Oregon"), Some("full_name"));
        assert_eq!(strategy("Springfield, IL"), Some("reverse_tokens"));
        assert_eq!(strategy("Ontario"), Some("leading_letters"));
        assert_eq!(strategy("1234"), None);
        assert_eq!(strategy(""), None);
        assert_eq!(
            recover_state("Napa - CA - USA"),
            Some(("reverse_tokens", "CA".to_string()))
        );
    }
}
