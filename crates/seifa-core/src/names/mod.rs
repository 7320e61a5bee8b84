//! Suburb and LGA name handling.
//!
//! Raw names in the harmonized panel come from several vintages that spell
//! councils differently ("Ballarat City", "BALLARAT (C)", "City of Ballarat").
//! Everything that compares names goes through the canonical forms here.

mod disambiguator;

pub use disambiguator::{DefaultLgaPolicy, NameIndex, Resolution};

use regex::Regex;
use std::sync::LazyLock;

/// Separator between suburb and LGA in a qualified label
pub const QUALIFIER_SEPARATOR: &str = " - ";

/// Council-type abbreviations in parentheses, e.g. "(C)", "(RC)", "(S)"
static LGA_ABBREVIATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*\((?:C|S|RC|B|UC|DC|M|T)\)\s*$").expect("valid LGA abbreviation regex")
});

/// Trailing council types, e.g. "BALLARAT CITY", "MILDURA RURAL CITY"
static LGA_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+(?:RURAL CITY|CITY|SHIRE|BOROUGH)$").expect("valid LGA suffix regex")
});

/// Leading council types, e.g. "CITY OF BALLARAT"
static LGA_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:RURAL CITY|CITY|SHIRE|BOROUGH) OF\s+").expect("valid LGA prefix regex")
});

/// Canonical suburb name: trimmed, upper-cased, inner whitespace collapsed.
pub fn normalize_suburb(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Canonical LGA name with council-type decorations removed.
///
/// "Ballarat City", "BALLARAT (C)" and "City of Ballarat" all become
/// "BALLARAT". A name that would be stripped to nothing is kept as-is.
///
/// The council type is discarded, so councils that existed side by side
/// before the 1994 amalgamations collapse into one name: "Wangaratta (C)"
/// and "Wangaratta (S)" are both "WANGARATTA". A suburb whose rows span
/// such a pair in the same year shows up as a duplicate year and fails
/// with `InvariantViolation` at query time.
pub fn normalize_lga(name: &str) -> String {
    let upper = normalize_suburb(name);
    let stripped = LGA_ABBREVIATION.replace(&upper, "");
    let stripped = LGA_SUFFIX.replace(&stripped, "");
    let stripped = LGA_PREFIX.replace(&stripped, "");
    let stripped = stripped.trim();
    if stripped.is_empty() {
        upper
    } else {
        stripped.to_string()
    }
}

/// Canonical suburb of a panel row.
///
/// Exports that pre-qualify repeated suburbs ("ASCOT - BALLARAT" under LGA
/// "Ballarat City") are folded back to the bare suburb when the suffix is
/// the row's own LGA. Names that merely contain the separator are kept.
pub fn canonical_suburb(suburb: &str, lga: &str) -> String {
    let suburb = normalize_suburb(suburb);
    match split_qualified(&suburb) {
        Some((base, qualifier)) if normalize_lga(qualifier) == normalize_lga(lga) => {
            base.to_string()
        }
        _ => suburb,
    }
}

/// Qualified label for one series of a repeated suburb, e.g. "ASCOT - BALLARAT"
pub fn qualified_label(suburb: &str, lga: &str) -> String {
    format!("{}{}{}", suburb, QUALIFIER_SEPARATOR, lga)
}

/// Split a qualified label into (suburb, lga) at the last separator.
pub fn split_qualified(label: &str) -> Option<(&str, &str)> {
    let (suburb, lga) = label.rsplit_once(QUALIFIER_SEPARATOR)?;
    let (suburb, lga) = (suburb.trim(), lga.trim());
    if suburb.is_empty() || lga.is_empty() {
        return None;
    }
    Some((suburb, lga))
}
