use clap::{Parser, Subcommand};
use std::path::PathBuf;

use seifa_core::config::Settings;
use seifa_core::FillValue;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Interpolate Victorian SEIFA index scores by suburb and date")]
pub struct Config {
    /// Enable debug mode
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the harmonized panel CSV (overrides panel.path)
    #[arg(long, global = true)]
    pub panel: Option<PathBuf>,

    /// Subcommand
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Interpolate one SEIFA index for a Victorian suburb at a date
    #[command(name = "seifa-vic")]
    SeifaVic {
        /// Date: day-first (31-10-1986), ISO (1986-10-31) or a year (1991)
        date: String,

        /// Suburb name (case-insensitive), or a qualified "SUBURB - LGA" label
        suburb: String,

        /// Index column, e.g. ieo_score, ier_score, irsad_score, irsd_score
        index: String,

        /// LGA to disambiguate suburbs that exist in several LGAs
        #[arg(long)]
        lga: Option<String>,

        /// Out-of-range policy: nan, extrapolate or boundary_value
        #[arg(long, value_parser = parse_fill_value)]
        fill_value: Option<FillValue>,

        /// Fail instead of defaulting when the suburb is in several LGAs
        #[arg(long)]
        strict: bool,
    },
    /// List suburbs that exist under more than one LGA
    RepeatedNames {
        /// Print a JSON array instead of one label per line
        #[arg(long)]
        json: bool,
    },
}

fn parse_fill_value(s: &str) -> Result<FillValue, String> {
    s.parse().map_err(|e: seifa_core::SeifaError| e.to_string())
}

impl Config {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Merge CLI options into settings (CLI takes precedence)
    pub fn merge_into(&self, settings: &mut Settings) {
        if let Some(panel) = &self.panel {
            settings.panel.path = Some(panel.clone());
        }
        if let Command::SeifaVic {
            fill_value, strict, ..
        } = &self.command
        {
            if let Some(fill_value) = fill_value {
                settings.query.fill_value = *fill_value;
            }
            if *strict {
                settings.query.strict = true;
            }
        }
    }
}
