//! Error types for translation assembly

use polyglot_relations::{RelationsError, StoreFailure};
use thiserror::Error;

/// Errors that can occur while assembling translations
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Storage layer error
    #[error("Storage error: {0}")]
    Store(#[source] StoreFailure),

    /// Translation group lookup failed
    #[error("Relation lookup failed: {0}")]
    Relations(#[from] RelationsError),

    /// Configuration values out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
