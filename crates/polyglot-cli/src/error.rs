//! Error types for the CLI application.

use polyglot_negotiator::NegotiatorError;
use polyglot_relations::RelationsError;
use polyglot_store::StoreError;
use polyglot_translations::TranslationError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database could not be opened
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Relation operation failed
    #[error(transparent)]
    Relations(#[from] RelationsError),

    /// Translation assembly failed
    #[error(transparent)]
    Translations(#[from] TranslationError),

    /// Negotiation setup failed
    #[error(transparent)]
    Negotiator(#[from] NegotiatorError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
