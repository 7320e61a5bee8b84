mod settings;

pub use settings::{PanelSettings, QuerySettings, Settings, PANEL_FILE};
