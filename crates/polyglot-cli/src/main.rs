//! Polyglot CLI - Command-line interface for multi-site translation relations.

use clap::Parser;
use polyglot_cli::commands;
use polyglot_cli::{Cli, Formatter, NetworkConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("POLYGLOT_LOG")
                .or_else(|_| tracing_subscriber::EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| "warn,polyglot=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> polyglot_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    let config = NetworkConfig::load(config_path)?;

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    let output = commands::execute(
        cli.command,
        config,
        config_path,
        cli.database.as_deref(),
        &formatter,
    )?;

    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}
