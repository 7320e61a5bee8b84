//! Error taxonomy for panel queries.

use thiserror::Error;

/// Error type for resolution, interpolation and query broadcasting.
///
/// NaN results (out-of-range interpolation) are never reported through this
/// type; they are successful values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeifaError {
    /// No panel rows match the requested suburb (and LGA, if given)
    #[error("no panel rows for suburb {suburb:?}{}", lga_suffix(.lga))]
    NotFound { suburb: String, lga: Option<String> },

    /// Strict mode query for a suburb that exists under several LGAs
    #[error("suburb {suburb:?} is ambiguous without an LGA (candidates: {})", .lgas.join(", "))]
    AmbiguousName { suburb: String, lgas: Vec<String> },

    /// More than one sample for the same year within one series
    #[error("duplicate {column} samples for year {year} in {suburb:?} ({lga}); panel is corrupt")]
    InvariantViolation {
        suburb: String,
        lga: String,
        column: String,
        year: i32,
    },

    /// Date string that matches none of the accepted formats
    #[error("cannot parse date {input:?} (expected day-first, e.g. 31-10-1986)")]
    DateParse { input: String },

    /// Two non-scalar query arguments with different lengths
    #[error("shape mismatch: {argument} has length {found}, expected {expected}")]
    Shape {
        argument: &'static str,
        expected: usize,
        found: usize,
    },

    /// Index column that no panel row carries
    #[error("unknown index column: {column}")]
    UnknownIndex { column: String },

    /// Fill value string outside nan / extrapolate / boundary_value
    #[error("invalid fill value {value:?} (expected nan, extrapolate or boundary_value)")]
    InvalidFillValue { value: String },
}

fn lga_suffix(lga: &Option<String>) -> String {
    match lga {
        Some(l) => format!(" in LGA {:?}", l),
        None => String::new(),
    }
}
