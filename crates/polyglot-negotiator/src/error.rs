//! Negotiator error types

use thiserror::Error;

/// Errors that can occur while setting up negotiation
#[derive(Error, Debug)]
pub enum NegotiatorError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
