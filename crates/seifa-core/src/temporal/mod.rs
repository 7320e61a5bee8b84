//! Temporal normalization and per-series interpolation.
//!
//! Every accepted date representation goes through [`normalize`] to become a
//! [`TemporalCoordinate`], a fractional year comparable with the whole-year
//! samples of the panel.

mod interpolate;

pub use interpolate::{interpolate_series, FillValue, Series};

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};
use std::fmt;

use crate::error::SeifaError;

/// Fractional-year x coordinate (1991 → 1991.0, 1 July 1991 → ~1991.496)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TemporalCoordinate(f64);

impl TemporalCoordinate {
    pub fn from_year(year: i32) -> Self {
        Self(year as f64)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for TemporalCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

/// A date as supplied by a caller, before normalization
#[derive(Debug, Clone, PartialEq)]
pub enum DateInput {
    /// Whole vintage year
    Year(i32),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    /// Day-first date string, ISO date, or bare four-digit year
    Text(String),
}

impl From<i32> for DateInput {
    fn from(year: i32) -> Self {
        DateInput::Year(year)
    }
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        DateInput::Date(date)
    }
}

impl From<NaiveDateTime> for DateInput {
    fn from(dt: NaiveDateTime) -> Self {
        DateInput::DateTime(dt)
    }
}

impl From<DateTime<Utc>> for DateInput {
    fn from(dt: DateTime<Utc>) -> Self {
        DateInput::DateTime(dt.naive_utc())
    }
}

impl From<&str> for DateInput {
    fn from(s: &str) -> Self {
        DateInput::Text(s.to_string())
    }
}

impl From<String> for DateInput {
    fn from(s: String) -> Self {
        DateInput::Text(s)
    }
}

impl From<&String> for DateInput {
    fn from(s: &String) -> Self {
        DateInput::Text(s.clone())
    }
}

/// Single normalization entry point for every date representation.
pub fn normalize(input: &DateInput) -> Result<TemporalCoordinate, SeifaError> {
    match input {
        DateInput::Year(y) => Ok(TemporalCoordinate::from_year(*y)),
        DateInput::Date(d) => Ok(date_coordinate(*d, 0.0)),
        DateInput::DateTime(dt) => Ok(datetime_coordinate(*dt)),
        DateInput::Text(s) => parse_text(s),
    }
}

fn days_in_year(year: i32) -> f64 {
    if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
        366.0
    } else {
        365.0
    }
}

fn date_coordinate(date: NaiveDate, day_fraction: f64) -> TemporalCoordinate {
    let year = date.year();
    let elapsed = date.ordinal0() as f64 + day_fraction;
    TemporalCoordinate(year as f64 + elapsed / days_in_year(year))
}

fn datetime_coordinate(dt: NaiveDateTime) -> TemporalCoordinate {
    let day_fraction = dt.time().num_seconds_from_midnight() as f64 / 86_400.0;
    date_coordinate(dt.date(), day_fraction)
}

/// Day-first formats, tried before year-first ones
const DAY_FIRST_DATE_FORMATS: &[&str] = &[
    "%d-%m-%Y", "%d/%m/%Y", "%d.%m.%Y", "%d %m %Y", "%d %b %Y", "%d %B %Y", "%d-%b-%Y",
];

const DAY_FIRST_DATETIME_FORMATS: &[&str] = &[
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const ISO_DATE_FORMATS: &[&str] = &["%Y-%m-%d"];

const ISO_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// chrono's `%Y` accepts short years ("86" is 86 AD); only four-digit ones count
fn is_four_digit_year(year: i32) -> bool {
    (1000..=9999).contains(&year)
}

fn parse_text(raw: &str) -> Result<TemporalCoordinate, SeifaError> {
    let s = raw.trim();

    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(year) = s.parse::<i32>() {
            return Ok(TemporalCoordinate::from_year(year));
        }
    }

    for fmt in DAY_FIRST_DATETIME_FORMATS.iter().chain(ISO_DATETIME_FORMATS) {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            if is_four_digit_year(dt.year()) {
                return Ok(datetime_coordinate(dt));
            }
        }
    }

    for fmt in DAY_FIRST_DATE_FORMATS.iter().chain(ISO_DATE_FORMATS) {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            if is_four_digit_year(d.year()) {
                return Ok(date_coordinate(d, 0.0));
            }
        }
    }

    Err(SeifaError::DateParse {
        input: raw.to_string(),
    })
}
