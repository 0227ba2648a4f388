//! Polyglot Domain Layer
//!
//! Value types and collaborator traits for a network of sites that each hold
//! one language variant of shared content.
//!
//! ## Key Concepts
//!
//! - **Site**: one node of the network, identified by a positive [`SiteId`]
//! - **Site relation**: an undirected edge between two sites
//! - **Translation group**: every per-site counterpart of one logical content item,
//!   keyed by a [`GroupKey`]
//! - **Translation**: the request-scoped record describing one target site's
//!   version of a content item
//! - **Redirect target**: the single winner of Accept-Language negotiation
//!
//! ## Architecture
//!
//! This crate holds no I/O. Storage, caching, language settings and URL building
//! are reached through the traits in [`traits`]; implementations live in other
//! crates or in the host application.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache_key;
pub mod error;
pub mod language;
pub mod relation;
pub mod site;
pub mod traits;
pub mod translation;

// Re-exports for convenience
pub use cache_key::CacheKey;
pub use error::DomainError;
pub use language::Language;
pub use relation::{ContentId, ContentRelation, GroupKey, RelationType};
pub use site::{SiteId, SiteRelation};
pub use translation::{RedirectTarget, RemoteContent, Translation, TranslationMap};
