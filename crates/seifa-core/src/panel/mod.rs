//! Harmonized long-format SEIFA panel and the store boundary that supplies it.

mod store;

pub use store::{load_panel_csv, CsvPanelStore, InMemoryPanelStore, PanelStore};

use std::collections::{BTreeMap, BTreeSet, HashMap};

/// One (suburb, LGA, year) observation with its index scores.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelRow {
    /// Suburb/locality name as it appears in the source
    pub suburb: String,
    /// Local government area name as it appears in the source
    pub lga: String,
    /// SEIFA vintage year
    pub year: i32,
    /// Index scores by column name (e.g. "ieo_score"); absent when the
    /// vintage did not publish that index for this locality
    pub scores: BTreeMap<String, f64>,
}

impl PanelRow {
    /// Create a row without scores
    pub fn new(suburb: impl Into<String>, lga: impl Into<String>, year: i32) -> Self {
        Self {
            suburb: suburb.into(),
            lga: lga.into(),
            year,
            scores: BTreeMap::new(),
        }
    }

    /// Builder-style score setter
    pub fn with_score(mut self, column: impl Into<String>, value: f64) -> Self {
        self.scores.insert(column.into(), value);
        self
    }

    /// Score for a column, skipping NaN placeholders
    pub fn score(&self, column: &str) -> Option<f64> {
        self.scores.get(column).copied().filter(|v| !v.is_nan())
    }
}

/// Immutable long-format panel in source (insertion) order.
#[derive(Debug, Clone, Default)]
pub struct Panel {
    rows: Vec<PanelRow>,
    columns: BTreeSet<String>,
}

/// A (suburb, LGA, year) key that occurs on more than one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey {
    pub suburb: String,
    pub lga: String,
    pub year: i32,
}

impl Panel {
    /// Build a panel from rows, collecting the index column set.
    pub fn new(rows: Vec<PanelRow>) -> Self {
        let columns = rows
            .iter()
            .flat_map(|r| r.scores.keys().cloned())
            .collect();
        Self { rows, columns }
    }

    pub fn rows(&self) -> &[PanelRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index columns present on any row, sorted
    pub fn index_columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    pub fn has_index(&self, column: &str) -> bool {
        self.columns.contains(column)
    }

    /// Observed (min, max) year, or None for an empty panel
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let min = self.rows.iter().map(|r| r.year).min()?;
        let max = self.rows.iter().map(|r| r.year).max()?;
        Some((min, max))
    }

    /// Keys that break the one-row-per-year invariant.
    ///
    /// Names are compared in canonical form, so "Kew"/"Boroondara City" and
    /// "KEW"/"BOROONDARA (C)" count as the same series.
    pub fn duplicate_keys(&self) -> Vec<DuplicateKey> {
        let mut seen: HashMap<(String, String, i32), usize> = HashMap::new();
        let mut duplicates = Vec::new();
        for row in &self.rows {
            let key = (
                crate::names::canonical_suburb(&row.suburb, &row.lga),
                crate::names::normalize_lga(&row.lga),
                row.year,
            );
            let count = seen.entry(key.clone()).or_insert(0);
            *count += 1;
            if *count == 2 {
                duplicates.push(DuplicateKey {
                    suburb: key.0,
                    lga: key.1,
                    year: key.2,
                });
            }
        }
        duplicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_panel_collects_columns() {
        let panel = Panel::new(vec![
            PanelRow::new("KEW", "Boroondara City", 1986).with_score("ieo_score", 1.0),
            PanelRow::new("KEW", "Boroondara City", 1991).with_score("irsd_score", 2.0),
        ]);
        let cols: Vec<&str> = panel.index_columns().collect();
        assert_eq!(cols, vec!["ieo_score", "irsd_score"]);
        assert!(panel.has_index("ieo_score"));
        assert!(!panel.has_index("ier_score"));
        assert_eq!(panel.year_range(), Some((1986, 1991)));
    }

    #[test]
    fn test_score_skips_nan() {
        let row = PanelRow::new("KEW", "Boroondara", 1986)
            .with_score("ieo_score", f64::NAN)
            .with_score("ier_score", 1000.0);
        assert_eq!(row.score("ieo_score"), None);
        assert_eq!(row.score("ier_score"), Some(1000.0));
        assert_eq!(row.score("irsd_score"), None);
    }

    #[test]
    fn test_duplicate_keys_use_canonical_names() {
        let panel = Panel::new(vec![
            PanelRow::new("Kew", "Boroondara City", 1986),
            PanelRow::new("KEW", "BOROONDARA (C)", 1986),
            PanelRow::new("KEW", "BOROONDARA", 1986),
            PanelRow::new("KEW", "BOROONDARA", 1991),
        ]);
        assert_eq!(
            panel.duplicate_keys(),
            vec![DuplicateKey {
                suburb: "KEW".to_string(),
                lga: "BOROONDARA".to_string(),
                year: 1986,
            }]
        );
    }

    #[test]
    fn test_duplicate_keys_fold_prequalified_names() {
        let panel = Panel::new(vec![
            PanelRow::new("ASCOT - BALLARAT", "Ballarat", 1996),
            PanelRow::new("ASCOT", "Ballarat City", 1996),
        ]);
        assert_eq!(panel.duplicate_keys().len(), 1);
        assert_eq!(panel.duplicate_keys()[0].suburb, "ASCOT");
    }

    #[test]
    fn test_empty_panel() {
        let panel = Panel::default();
        assert!(panel.is_empty());
        assert_eq!(panel.year_range(), None);
    }
}
