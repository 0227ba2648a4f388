//! Configuration file commands.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::{NetworkConfig, OutputFormat};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;

/// Execute a config subcommand.
///
/// `path` is the file given on the command line, if any.
pub fn execute_config(
    args: ConfigArgs,
    path: Option<&Path>,
    formatter: &Formatter,
) -> Result<String> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => NetworkConfig::default_path()?,
    };

    match args.action {
        ConfigAction::Show => {
            let config = NetworkConfig::load(Some(&path))?;
            match formatter.format() {
                OutputFormat::Json => Ok(serde_json::to_string_pretty(&config)?),
                _ => toml::to_string_pretty(&config)
                    .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e))),
            }
        }
        ConfigAction::Init { force } => init(&path, force, formatter),
        ConfigAction::Path => Ok(path.display().to_string()),
    }
}

fn init(path: &Path, force: bool, formatter: &Formatter) -> Result<String> {
    if path.exists() && !force {
        return Ok(formatter.warning(&format!(
            "{} already exists; pass --force to overwrite",
            path.display()
        )));
    }

    NetworkConfig::example().save(path)?;
    Ok(formatter.success(&format!("Wrote {}", path.display())))
}
