//! Domain error types

use thiserror::Error;

/// Errors raised when constructing domain values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Site ids are positive integers
    #[error("Invalid site id: {0}")]
    InvalidSiteId(u64),

    /// A site cannot be related to itself
    #[error("Site {0} cannot be related to itself")]
    SelfRelation(u64),

    /// Relation types are non-empty identifiers
    #[error("Invalid relation type: {0:?}")]
    InvalidRelationType(String),
}
