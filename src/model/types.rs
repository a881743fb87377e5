//! Shared primitive types and element-symbol helpers.
//!
//! Element identities are carried as short symbol strings rather than a closed enum so
//! that unusual or malformed labels from the source file survive unchanged into the
//! `elements` output consumed by renderers. The helpers here normalize and compare those
//! symbols.

use nalgebra::Point3;

/// Cartesian position measured in ångströms.
pub type Point = Point3<f64>;

/// Symbol used for hydrogen when applying the hydrogen–hydrogen exclusion rule.
const HYDROGEN: &str = "H";

/// Periodic-table symbols, upper-cased, used to validate symbols inferred from atom names.
const ELEMENT_SYMBOLS: &[&str] = &[
    "H", "HE", "LI", "BE", "B", "C", "N", "O", "F", "NE", "NA", "MG", "AL", "SI", "P", "S",
    "CL", "AR", "K", "CA", "SC", "TI", "V", "CR", "MN", "FE", "CO", "NI", "CU", "ZN", "GA",
    "GE", "AS", "SE", "BR", "KR", "RB", "SR", "Y", "ZR", "NB", "MO", "TC", "RU", "RH", "PD",
    "AG", "CD", "IN", "SN", "SB", "TE", "I", "XE", "CS", "BA", "LA", "CE", "PR", "ND", "PM",
    "SM", "EU", "GD", "TB", "DY", "HO", "ER", "TM", "YB", "LU", "HF", "TA", "W", "RE", "OS",
    "IR", "PT", "AU", "HG", "TL", "PB", "BI", "PO", "AT", "RN", "FR", "RA", "AC", "TH", "PA",
    "U", "NP", "PU", "AM", "CM", "BK", "CF", "ES", "FM", "MD", "NO", "LR", "RF", "DB", "SG",
    "BH", "HS", "MT", "DS", "RG", "CN", "NH", "FL", "MC", "LV", "TS", "OG", "D",
];

/// Returns `true` when `symbol` names hydrogen, ignoring case and surrounding whitespace.
pub fn is_hydrogen(symbol: &str) -> bool {
    symbol.trim().eq_ignore_ascii_case(HYDROGEN)
}

/// Returns `true` when `symbol` (any case) is a known element symbol.
pub fn is_known_element(symbol: &str) -> bool {
    let upper = symbol.trim().to_ascii_uppercase();
    ELEMENT_SYMBOLS.contains(&upper.as_str())
}

/// Normalizes an element label to the upper-case, trimmed form stored on atoms.
pub fn normalize_element(symbol: &str) -> String {
    symbol.trim().to_ascii_uppercase()
}
