//! Scalar-or-sequence query arguments and shape-aligned results.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::ops::Index;

use crate::error::SeifaError;
use crate::temporal::DateInput;

/// A query argument: one value broadcast to every position, or one value
/// per position.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg<T> {
    Scalar(T),
    Many(Vec<T>),
}

impl<T> Arg<T> {
    pub fn is_scalar(&self) -> bool {
        matches!(self, Arg::Scalar(_))
    }

    /// Sequence length, or None for a scalar
    pub fn len(&self) -> Option<usize> {
        match self {
            Arg::Scalar(_) => None,
            Arg::Many(v) => Some(v.len()),
        }
    }

    /// Value at position `i` after broadcasting.
    ///
    /// Callers check lengths with [`broadcast_len`] first.
    pub fn at(&self, i: usize) -> &T {
        match self {
            Arg::Scalar(v) => v,
            Arg::Many(v) => &v[i],
        }
    }
}

/// Common length of the non-scalar arguments, or None if all are scalar.
///
/// Fails with [`SeifaError::Shape`] when two sequences disagree.
pub fn broadcast_len(args: &[(&'static str, Option<usize>)]) -> Result<Option<usize>, SeifaError> {
    let mut expected: Option<usize> = None;
    for &(argument, len) in args {
        let Some(len) = len else { continue };
        match expected {
            None => expected = Some(len),
            Some(e) if e != len => {
                return Err(SeifaError::Shape {
                    argument,
                    expected: e,
                    found: len,
                })
            }
            Some(_) => {}
        }
    }
    Ok(expected)
}

// Dates: i32 years, chrono dates/datetimes, strings, and sequences of them

macro_rules! scalar_date_arg {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Arg<DateInput> {
                fn from(value: $ty) -> Self {
                    Arg::Scalar(value.into())
                }
            }
        )*
    };
}

scalar_date_arg!(
    DateInput,
    i32,
    NaiveDate,
    NaiveDateTime,
    DateTime<Utc>,
    &str,
    String
);

impl<T: Into<DateInput>> From<Vec<T>> for Arg<DateInput> {
    fn from(values: Vec<T>) -> Self {
        Arg::Many(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Clone + Into<DateInput>> From<&[T]> for Arg<DateInput> {
    fn from(values: &[T]) -> Self {
        Arg::Many(values.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<DateInput>, const N: usize> From<[T; N]> for Arg<DateInput> {
    fn from(values: [T; N]) -> Self {
        Arg::Many(values.into_iter().map(Into::into).collect())
    }
}

// Names: suburbs and LGAs

impl From<&str> for Arg<String> {
    fn from(value: &str) -> Self {
        Arg::Scalar(value.to_string())
    }
}

impl From<String> for Arg<String> {
    fn from(value: String) -> Self {
        Arg::Scalar(value)
    }
}

impl<T: Into<String>> From<Vec<T>> for Arg<String> {
    fn from(values: Vec<T>) -> Self {
        Arg::Many(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Clone + Into<String>> From<&[T]> for Arg<String> {
    fn from(values: &[T]) -> Self {
        Arg::Many(values.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<String>, const N: usize> From<[T; N]> for Arg<String> {
    fn from(values: [T; N]) -> Self {
        Arg::Many(values.into_iter().map(Into::into).collect())
    }
}

/// Interpolation output, shaped like the broadcast inputs
#[derive(Debug, Clone, PartialEq)]
pub enum Interpolated {
    /// Every input was a scalar
    Scalar(f64),
    /// One value per broadcast position
    Series(Vec<f64>),
}

impl Interpolated {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Interpolated::Scalar(v) => Some(*v),
            Interpolated::Series(_) => None,
        }
    }

    /// All values; a scalar is a one-element slice
    pub fn values(&self) -> &[f64] {
        match self {
            Interpolated::Scalar(v) => std::slice::from_ref(v),
            Interpolated::Series(v) => v,
        }
    }

    pub fn len(&self) -> usize {
        self.values().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    pub fn into_vec(self) -> Vec<f64> {
        match self {
            Interpolated::Scalar(v) => vec![v],
            Interpolated::Series(v) => v,
        }
    }
}

impl Index<usize> for Interpolated {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.values()[i]
    }
}
