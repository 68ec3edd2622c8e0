//! Package splitting and weight derivation.
//!
//! Carriers cap a wine package at a fixed bottle count, so an order's total is
//! split into full packages followed by one remainder package.

/// Split a bottle count into package sizes of at most `chunk_size`
///
/// A zero total still yields one empty package so the order keeps a row in
/// the output. Full packages come first, the remainder last.
///
/// ```
/// use wine2weship::package::split_packages;
///
/// assert_eq!(split_packages(25, 12), vec![12, 12, 1]);
/// assert_eq!(split_packages(0, 12), vec![0]);
/// ```
pub fn split_packages(total: u32, chunk_size: u32) -> Vec<u32> {
    if total == 0 || chunk_size == 0 {
        return vec![0];
    }

    let full = total / chunk_size;
    let remainder = total % chunk_size;

    let mut packages = vec![chunk_size; full as usize];
    if remainder > 0 {
        packages.push(remainder);
    }
    packages
}

/// Shipping weight of a package: `ceil(unit_weight * qty)`, 0 when empty
pub fn package_weight(qty: u32, unit_weight: f64) -> u32 {
    if qty == 0 {
        return 0;
    }
    (unit_weight * f64::from(qty)).ceil() as u32
}
