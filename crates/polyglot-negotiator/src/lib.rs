//! Polyglot Negotiator
//!
//! Picks the site a visitor should be sent to from their `Accept-Language`
//! header.
//!
//! The negotiator provides:
//! - Header parsing tolerant of comments and malformed segments
//! - Bare-language expansion of regional tags
//! - Two-factor scoring (site priority times visitor priority)
//! - A redirect decision honouring the visitor's opt-out
//!
//! # Examples
//!
//! ```no_run
//! use polyglot_negotiator::{NegotiationConfig, Negotiator};
//! # let translations = polyglot_domain::TranslationMap::new();
//!
//! let negotiator = Negotiator::new(NegotiationConfig::default());
//! if let Some(target) = negotiator.negotiate("de-CH, de;q=0.9, en;q=0.5", &translations) {
//!     println!("Redirect to {}", target.url);
//! }
//! ```

#![warn(missing_docs)]

mod accept_language;
mod config;
mod error;
mod negotiator;
mod redirector;

pub use accept_language::{parse_accept_language, same_tag, AcceptLanguages};
pub use config::NegotiationConfig;
pub use error::NegotiatorError;
pub use negotiator::Negotiator;
pub use redirector::Redirector;
