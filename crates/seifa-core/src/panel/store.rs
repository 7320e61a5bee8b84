//! Panel providers.
//!
//! The core only consumes panels; building them from the raw SEIFA vintages
//! happens upstream. A store hands out immutable snapshots, and a rebuild
//! publishes a new `Arc` instead of touching rows in place.

use anyhow::{bail, Context, Result};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{Panel, PanelRow};
use crate::config::PanelSettings;

/// Supplier of the harmonized long-format panel
pub trait PanelStore: Send + Sync {
    /// Current panel snapshot; `force_rebuild` discards any cached copy.
    fn get_panel(&self, force_rebuild: bool) -> Result<Arc<Panel>>;
}

/// Store over an already-built panel
pub struct InMemoryPanelStore {
    panel: Arc<Panel>,
}

impl InMemoryPanelStore {
    pub fn new(panel: Panel) -> Self {
        Self {
            panel: Arc::new(panel),
        }
    }
}

impl PanelStore for InMemoryPanelStore {
    fn get_panel(&self, _force_rebuild: bool) -> Result<Arc<Panel>> {
        Ok(self.panel.clone())
    }
}

/// Store that loads the harmonized panel from a CSV export and keeps the
/// last load as its snapshot.
pub struct CsvPanelStore {
    path: PathBuf,
    settings: PanelSettings,
    snapshot: RwLock<Option<Arc<Panel>>>,
}

impl CsvPanelStore {
    /// Create a store reading from `settings.resolved_path()`
    pub fn from_settings(settings: &PanelSettings) -> Result<Self> {
        let path = settings.resolved_path()?;
        Ok(Self::new(path, settings.clone()))
    }

    pub fn new(path: impl Into<PathBuf>, settings: PanelSettings) -> Self {
        Self {
            path: path.into(),
            settings,
            snapshot: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PanelStore for CsvPanelStore {
    fn get_panel(&self, force_rebuild: bool) -> Result<Arc<Panel>> {
        if !force_rebuild {
            if let Some(panel) = self.snapshot.read().as_ref() {
                return Ok(panel.clone());
            }
        }

        let panel = Arc::new(load_panel_csv(&self.path, &self.settings)?);
        tracing::info!(
            "Loaded SEIFA panel from {:?}: {} rows, years {:?}",
            self.path,
            panel.len(),
            panel.year_range()
        );
        *self.snapshot.write() = Some(panel.clone());
        Ok(panel)
    }
}

/// Column positions resolved from the CSV header
struct ColumnMap {
    suburb: usize,
    lga: usize,
    year: usize,
    indices: Vec<(usize, String)>,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord, settings: &PanelSettings) -> Result<Self> {
        let find = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .with_context(|| format!("Panel CSV has no {:?} column", name))
        };

        let suburb = find(&settings.suburb_column)?;
        let lga = find(&settings.lga_column)?;
        let year = find(&settings.year_column)?;

        let indices: Vec<(usize, String)> = if settings.index_columns.is_empty() {
            headers
                .iter()
                .enumerate()
                .filter(|(_, h)| h.trim().ends_with("_score"))
                .map(|(i, h)| (i, h.trim().to_string()))
                .collect()
        } else {
            settings
                .index_columns
                .iter()
                .map(|name| Ok((find(name)?, name.clone())))
                .collect::<Result<_>>()?
        };

        if indices.is_empty() {
            bail!("Panel CSV has no index score columns");
        }

        Ok(Self {
            suburb,
            lga,
            year,
            indices,
        })
    }
}

/// Read a harmonized panel CSV.
///
/// Rows come back in file order. Duplicate (suburb, LGA, year) keys are kept
/// but reported, since they surface later as invariant violations.
pub fn load_panel_csv(path: &Path, settings: &PanelSettings) -> Result<Panel> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open panel CSV: {}", path.display()))?;

    let headers = reader.headers()?.clone();
    let columns = ColumnMap::from_headers(&headers, settings)
        .with_context(|| format!("Invalid panel CSV header in {}", path.display()))?;

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", idx + 1))?;
        let row = parse_row(&record, &columns)
            .with_context(|| format!("Invalid panel row {} in {}", idx + 1, path.display()))?;
        rows.push(row);
    }

    let panel = Panel::new(rows);
    for dup in panel.duplicate_keys() {
        tracing::warn!(
            "Panel has several rows for {} ({}) in {}",
            dup.suburb,
            dup.lga,
            dup.year
        );
    }
    Ok(panel)
}

fn parse_row(record: &csv::StringRecord, columns: &ColumnMap) -> Result<PanelRow> {
    let field = |i: usize| record.get(i).map(str::trim).unwrap_or("");

    let suburb = field(columns.suburb);
    if suburb.is_empty() {
        bail!("empty suburb name");
    }
    let year = parse_year(field(columns.year))?;
    let mut row = PanelRow::new(suburb, field(columns.lga), year);

    for (i, name) in &columns.indices {
        if let Some(value) = parse_score(field(*i))
            .with_context(|| format!("bad value in column {:?}", name))?
        {
            row.scores.insert(name.clone(), value);
        }
    }
    Ok(row)
}

/// Years may be written as floats by dataframe exports ("1986.0").
fn parse_year(raw: &str) -> Result<i32> {
    let value: f64 = raw
        .parse()
        .with_context(|| format!("invalid year {:?}", raw))?;
    if value.fract() != 0.0 || !value.is_finite() {
        bail!("year {:?} is not a whole number", raw);
    }
    Ok(value as i32)
}

fn parse_score(raw: &str) -> Result<Option<f64>> {
    if raw.is_empty() || raw.eq_ignore_ascii_case("nan") || raw.eq_ignore_ascii_case("na") {
        return Ok(None);
    }
    let value: f64 = raw
        .parse()
        .with_context(|| format!("invalid score {:?}", raw))?;
    Ok(Some(value))
}
