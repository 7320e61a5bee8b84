use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use seifa::commands;
use seifa::config::{Config, Settings};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Config::parse_args();

    // Setup logging
    setup_logging(cli.debug);

    // Load settings
    let mut settings = Settings::load(cli.config.as_ref())?;
    cli.merge_into(&mut settings);

    let output = commands::run(&cli, settings)?;
    println!("{}", output);
    Ok(())
}

fn setup_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("seifa=debug,seifa_core=debug")
    } else {
        EnvFilter::new("seifa=info,seifa_core=info")
    };

    // stdout carries query results only
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
