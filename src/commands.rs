//! Subcommand execution. Each command returns the text to print on stdout.

use anyhow::{Context, Result};

use seifa_core::{Arg, DateInput, SeifaCore, SeifaCoreBuilder};

use crate::config::{Command, Config, Settings};

/// Build the core from settings and run the selected subcommand
pub fn run(cli: &Config, settings: Settings) -> Result<String> {
    let core = SeifaCoreBuilder::new(settings)
        .build()
        .context("Failed to load the SEIFA panel")?;
    execute(&core, &cli.command)
}

/// Run a subcommand against an already-built core
pub fn execute(core: &SeifaCore, command: &Command) -> Result<String> {
    match command {
        Command::SeifaVic {
            date,
            suburb,
            index,
            lga,
            ..
        } => {
            let value = core
                .interpolate(
                    DateInput::from(date.as_str()),
                    suburb.as_str(),
                    index,
                    lga.clone().map(Arg::from),
                )
                .with_context(|| format!("Failed to interpolate {} for {}", index, suburb))?;
            let value = value.as_scalar().unwrap_or(f64::NAN);
            tracing::debug!("{} {} at {} = {}", suburb, index, date, value);
            Ok(format!("{:.2}", value))
        }
        Command::RepeatedNames { json } => {
            let names = core.get_repeated_names();
            if *json {
                serde_json::to_string_pretty(&names).context("Failed to serialize repeated names")
            } else {
                Ok(names.into_iter().collect::<Vec<_>>().join("\n"))
            }
        }
    }
}
