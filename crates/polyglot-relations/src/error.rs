//! Error types for content relation operations

use thiserror::Error;

/// Boxed storage backend error, downcastable to the store's own error type
pub type StoreFailure = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur during content relation operations
#[derive(Error, Debug)]
pub enum RelationsError {
    /// Storage layer error
    #[error("Storage error: {0}")]
    Store(#[source] StoreFailure),

    /// Arguments that can never form a valid relation
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
