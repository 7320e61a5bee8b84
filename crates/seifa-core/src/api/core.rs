//! SeifaCore: the facade entry point for the CLI and library consumers.
//!
//! Owns the panel store and the current [`DataContext`] snapshot. Queries
//! clone the snapshot `Arc` and run without holding any lock; a rebuild
//! swaps in a fresh context.

use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::Result;

use super::args::{Arg, Interpolated};
use super::context::DataContext;
use crate::config::Settings;
use crate::error::SeifaError;
use crate::panel::PanelStore;
use crate::temporal::{DateInput, FillValue};

/// The Facade that wraps the panel store and the query context.
///
/// Constructed via [`SeifaCoreBuilder`](super::builder::SeifaCoreBuilder).
pub struct SeifaCore {
    /// Panel provider
    store: Arc<dyn PanelStore>,
    /// Application settings
    settings: Arc<Settings>,
    /// Current immutable snapshot
    context: RwLock<Arc<DataContext>>,
}

impl SeifaCore {
    /// Create a new SeifaCore instance (prefer `SeifaCoreBuilder`)
    pub(crate) fn new(
        store: Arc<dyn PanelStore>,
        settings: Arc<Settings>,
        context: DataContext,
    ) -> Self {
        Self {
            store,
            settings,
            context: RwLock::new(Arc::new(context)),
        }
    }

    /// Access application settings (read-only)
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Current data context snapshot
    pub fn context(&self) -> Arc<DataContext> {
        self.context.read().clone()
    }

    /// Reload the panel from the store and publish a new context.
    ///
    /// Queries already running keep the snapshot they started with.
    pub fn rebuild(&self) -> Result<()> {
        let panel = self.store.get_panel(true)?;
        let context = Arc::new(DataContext::new(panel, self.settings.query.clone()));
        *self.context.write() = context;
        tracing::info!("Published rebuilt SEIFA panel context");
        Ok(())
    }

    /// Qualified labels of suburbs under several LGAs
    pub fn get_repeated_names(&self) -> BTreeSet<String> {
        self.context().get_repeated_names().clone()
    }

    /// Interpolate with the configured default fill value
    pub fn interpolate(
        &self,
        dates: impl Into<Arg<DateInput>>,
        suburbs: impl Into<Arg<String>>,
        index_column: &str,
        lga: Option<Arg<String>>,
    ) -> Result<Interpolated, SeifaError> {
        let fill_value = self.settings.query.fill_value;
        self.interpolate_with(dates, suburbs, index_column, fill_value, lga)
    }

    /// Interpolate with an explicit fill value
    pub fn interpolate_with(
        &self,
        dates: impl Into<Arg<DateInput>>,
        suburbs: impl Into<Arg<String>>,
        index_column: &str,
        fill_value: FillValue,
        lga: Option<Arg<String>>,
    ) -> Result<Interpolated, SeifaError> {
        self.context()
            .interpolate(dates, suburbs, index_column, fill_value, lga)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SeifaCoreBuilder;
    use crate::config::PanelSettings;
    use crate::panel::CsvPanelStore;
    use crate::testutil::fixture_panel;

    #[test]
    fn test_interpolate_uses_configured_fill_value() {
        let mut settings = Settings::default();
        settings.query.fill_value = FillValue::BoundaryValue;
        let core = SeifaCoreBuilder::new(settings)
            .with_panel(fixture_panel())
            .build()
            .unwrap();

        let value = core.interpolate(1970, "KEW", "ieo_score", None).unwrap();
        assert_eq!(value, Interpolated::Scalar(1179.648871));

        let value = core
            .interpolate_with(1970, "KEW", "ieo_score", FillValue::Nan, None)
            .unwrap();
        assert!(value[0].is_nan());
    }

    #[test]
    fn test_get_repeated_names() {
        let core = SeifaCoreBuilder::new(Settings::default())
            .with_panel(fixture_panel())
            .build()
            .unwrap();
        let names = core.get_repeated_names();
        assert!(names.contains("ASCOT - BALLARAT"));
        assert!(!names.contains("ASCOT - BALLARAT CITY"));
    }

    #[test]
    fn test_rebuild_swaps_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panel.csv");
        std::fs::write(
            &path,
            "Site_suburb,lga,year,ieo_score\nKEW,Boroondara,1986,1000\nKEW,Boroondara,1991,1010\n",
        )
        .unwrap();

        let store = Arc::new(CsvPanelStore::new(&path, PanelSettings::default()));
        let core = SeifaCoreBuilder::new(Settings::default())
            .with_store(store)
            .build()
            .unwrap();
        let before = core.context();
        assert!(core.get_repeated_names().is_empty());

        std::fs::write(
            &path,
            "Site_suburb,lga,year,ieo_score\n\
             KEW,Boroondara,1986,1000\nKEW,Boroondara,1991,1020\n\
             KEW,Ballarat,1986,900\nKEW,Ballarat,1991,910\n",
        )
        .unwrap();
        core.rebuild().unwrap();

        assert_eq!(
            core.get_repeated_names().into_iter().collect::<Vec<_>>(),
            vec!["KEW - BALLARAT".to_string(), "KEW - BOROONDARA".to_string()]
        );
        let value = core
            .interpolate(1991, "KEW", "ieo_score", Some("Boroondara".into()))
            .unwrap();
        assert_eq!(value, Interpolated::Scalar(1020.0));

        // the old snapshot still answers from the old panel
        let old = before
            .interpolate(1991, "KEW", "ieo_score", FillValue::Nan, None)
            .unwrap();
        assert_eq!(old, Interpolated::Scalar(1010.0));
    }
}
