//! Command-line front end for seifa-core.

pub mod commands;
pub mod config;
