mod settings;

pub use seifa_core::config::{PanelSettings, QuerySettings, Settings};
pub use settings::{Command, Config};
