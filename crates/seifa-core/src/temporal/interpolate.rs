use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::TemporalCoordinate;
use crate::error::SeifaError;
use crate::panel::PanelRow;

/// Policy for query dates outside the observed sample years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillValue {
    /// NaN before the first or after the last sample
    #[default]
    Nan,
    /// Continue the line through the two nearest samples
    Extrapolate,
    /// Clamp to the nearest boundary sample
    BoundaryValue,
}

impl FromStr for FillValue {
    type Err = SeifaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nan" => Ok(FillValue::Nan),
            "extrapolate" => Ok(FillValue::Extrapolate),
            "boundary_value" => Ok(FillValue::BoundaryValue),
            _ => Err(SeifaError::InvalidFillValue {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for FillValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FillValue::Nan => "nan",
            FillValue::Extrapolate => "extrapolate",
            FillValue::BoundaryValue => "boundary_value",
        };
        f.write_str(name)
    }
}

/// (year, score) samples of one index for one (suburb, LGA), sorted by year
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    years: Vec<i32>,
    scores: Vec<f64>,
}

impl Series {
    /// Extract the samples of `column` from the rows of a single series.
    ///
    /// Rows without a score for `column` are skipped. Two scored rows for the
    /// same year mean the panel is corrupt.
    pub fn from_rows(rows: &[&PanelRow], column: &str) -> Result<Self, SeifaError> {
        let mut samples: Vec<(i32, f64, &PanelRow)> = rows
            .iter()
            .filter_map(|r| r.score(column).map(|s| (r.year, s, *r)))
            .collect();
        samples.sort_by_key(|(year, _, _)| *year);

        if let Some(pair) = samples.windows(2).find(|w| w[0].0 == w[1].0) {
            let row = pair[1].2;
            return Err(SeifaError::InvariantViolation {
                suburb: row.suburb.clone(),
                lga: row.lga.clone(),
                column: column.to_string(),
                year: row.year,
            });
        }

        Ok(Self {
            years: samples.iter().map(|(y, _, _)| *y).collect(),
            scores: samples.iter().map(|(_, s, _)| *s).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Value at `target` under the given out-of-range policy.
    pub fn value_at(&self, target: TemporalCoordinate, fill: FillValue) -> f64 {
        let x = target.value();
        let xs: Vec<f64> = self.years.iter().map(|&y| y as f64).collect();

        // Exact sample hit returns the stored score untouched
        if let Some(i) = xs.iter().position(|&xi| xi == x) {
            return self.scores[i];
        }

        let n = xs.len();
        if n < 2 {
            return f64::NAN;
        }

        let (first, last) = (xs[0], xs[n - 1]);
        if x < first {
            return match fill {
                FillValue::Nan => f64::NAN,
                FillValue::BoundaryValue => self.scores[0],
                FillValue::Extrapolate => self.line(0, x, &xs),
            };
        }
        if x > last {
            return match fill {
                FillValue::Nan => f64::NAN,
                FillValue::BoundaryValue => self.scores[n - 1],
                FillValue::Extrapolate => self.line(n - 2, x, &xs),
            };
        }

        // first < x < last and x is not a sample, so the partition point
        // lands strictly inside
        let upper = xs.partition_point(|&xi| xi < x);
        self.line(upper - 1, x, &xs)
    }

    /// Evaluate the line through samples `i` and `i + 1` at `x`
    fn line(&self, i: usize, x: f64, xs: &[f64]) -> f64 {
        let (x0, x1) = (xs[i], xs[i + 1]);
        let (y0, y1) = (self.scores[i], self.scores[i + 1]);
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }
}

/// Interpolate one index of one resolved series at `target`.
pub fn interpolate_series(
    rows: &[&PanelRow],
    index_column: &str,
    target: TemporalCoordinate,
    fill_value: FillValue,
) -> Result<f64, SeifaError> {
    let series = Series::from_rows(rows, index_column)?;
    Ok(series.value_at(target, fill_value))
}
