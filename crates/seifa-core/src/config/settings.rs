use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::names::DefaultLgaPolicy;
use crate::temporal::FillValue;

/// Application settings (from config file)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Panel source settings
    #[serde(default)]
    pub panel: PanelSettings,

    /// Query behavior settings
    #[serde(default)]
    pub query: QuerySettings,
}

/// Where the harmonized panel lives and how its columns are named
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelSettings {
    /// Path to the harmonized panel CSV (default: cache dir)
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Suburb/locality column
    #[serde(default = "default_suburb_column")]
    pub suburb_column: String,

    /// LGA column
    #[serde(default = "default_lga_column")]
    pub lga_column: String,

    /// Vintage year column
    #[serde(default = "default_year_column")]
    pub year_column: String,

    /// Index columns to load (empty = every column ending in `_score`)
    #[serde(default)]
    pub index_columns: Vec<String>,
}

fn default_suburb_column() -> String {
    "Site_suburb".to_string()
}

fn default_lga_column() -> String {
    "lga".to_string()
}

fn default_year_column() -> String {
    "year".to_string()
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            path: None,
            suburb_column: default_suburb_column(),
            lga_column: default_lga_column(),
            year_column: default_year_column(),
            index_columns: Vec::new(),
        }
    }
}

impl PanelSettings {
    /// Configured panel path, or `<cache_dir>/seifa/seifa_vic_panel.csv`
    pub fn resolved_path(&self) -> Result<PathBuf> {
        if let Some(p) = &self.path {
            return Ok(p.clone());
        }
        dirs::cache_dir()
            .map(|p| p.join("seifa").join(PANEL_FILE))
            .context("No cache directory available; set panel.path in the config file")
    }
}

/// Default panel file name inside the cache directory
pub const PANEL_FILE: &str = "seifa_vic_panel.csv";

/// Query behavior settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuerySettings {
    /// Fail with an ambiguity error when a repeated suburb is queried
    /// without an LGA. Off by default: a default LGA is picked and a
    /// warning is logged instead.
    #[serde(default)]
    pub strict: bool,

    /// Out-of-range policy used when a caller does not pass one
    #[serde(default)]
    pub fill_value: FillValue,

    /// How the default LGA is chosen for a repeated suburb
    #[serde(default)]
    pub default_lga: DefaultLgaPolicy,

    /// Per-suburb default LGA, taking precedence over `default_lga`
    /// (e.g. `ASCOT = "Greater Bendigo"`)
    #[serde(default)]
    pub lga_overrides: HashMap<String, String>,
}

impl Settings {
    /// Load settings from config file or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        // Try custom path first
        if let Some(p) = path {
            if p.exists() {
                return Self::read_file(p);
            }
            tracing::warn!("Config file {:?} not found, falling back to defaults", p);
        }

        // Try default config locations
        let default_paths = [
            dirs::config_dir().map(|p| p.join("seifa/config.toml")),
            dirs::home_dir().map(|p| p.join(".config/seifa/config.toml")),
            dirs::home_dir().map(|p| p.join(".seifa.toml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                return Self::read_file(path);
            }
        }

        // Return defaults if no config file found
        Ok(Self::default())
    }

    fn read_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
