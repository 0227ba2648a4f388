//! Polyglot CLI library.
//!
//! This library provides the core functionality for the Polyglot command-line interface:
//! the network configuration file, a site directory built from it, command
//! execution against the SQLite relation store, and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod network;
pub mod output;

pub use cli::{Cli, Command};
pub use commands::App;
pub use config::NetworkConfig;
pub use error::{CliError, Result};
pub use network::StaticNetwork;
pub use output::Formatter;
