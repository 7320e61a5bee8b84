//! Builder for constructing a [`SeifaCore`] instance.
//!
//! ```ignore
//! let core = SeifaCoreBuilder::new(settings)
//!     .with_store(store)
//!     .force_rebuild(true)
//!     .build()?;
//! ```

use anyhow::Result;
use std::sync::Arc;

use crate::config::Settings;
use crate::panel::{CsvPanelStore, InMemoryPanelStore, Panel, PanelStore};

use super::context::DataContext;
use super::core::SeifaCore;

/// Builder for constructing a [`SeifaCore`] Facade instance
pub struct SeifaCoreBuilder {
    settings: Arc<Settings>,
    store: Option<Arc<dyn PanelStore>>,
    force_rebuild: bool,
}

impl SeifaCoreBuilder {
    /// Create a new builder with the given settings
    pub fn new(settings: Settings) -> Self {
        Self::from_shared_settings(Arc::new(settings))
    }

    /// Create a new builder from already-shared settings
    pub fn from_shared_settings(settings: Arc<Settings>) -> Self {
        Self {
            settings,
            store: None,
            force_rebuild: false,
        }
    }

    /// Use a specific panel store instead of the CSV store from settings
    pub fn with_store(mut self, store: Arc<dyn PanelStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Serve an already-built panel
    pub fn with_panel(self, panel: Panel) -> Self {
        self.with_store(Arc::new(InMemoryPanelStore::new(panel)))
    }

    /// Ask the store for a fresh panel on the initial load
    pub fn force_rebuild(mut self, force: bool) -> Self {
        self.force_rebuild = force;
        self
    }

    /// Load the panel and build the `SeifaCore` instance
    ///
    /// If no store was provided, a [`CsvPanelStore`] is created from
    /// `settings.panel`.
    pub fn build(self) -> Result<SeifaCore> {
        let store: Arc<dyn PanelStore> = match self.store {
            Some(store) => store,
            None => Arc::new(CsvPanelStore::from_settings(&self.settings.panel)?),
        };

        let panel = store.get_panel(self.force_rebuild)?;
        let context = DataContext::new(panel, self.settings.query.clone());
        Ok(SeifaCore::new(store, self.settings, context))
    }
}
