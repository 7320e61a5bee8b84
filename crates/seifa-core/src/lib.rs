//! Core library for seifa.
//!
//! Holds the harmonized SEIFA panel model, the panel store boundary, suburb
//! and LGA name disambiguation, temporal normalization and the per-series
//! interpolator. [`api::SeifaCore`] ties them together for consumers.

pub mod api;
pub mod config;
pub mod error;
pub mod names;
pub mod panel;
pub mod temporal;

pub use api::{Arg, DataContext, Interpolated, SeifaCore, SeifaCoreBuilder};
pub use error::SeifaError;
pub use temporal::{DateInput, FillValue, TemporalCoordinate};

#[cfg(test)]
pub(crate) mod testutil;
