//! Polyglot Relations
//!
//! Translation groups of content items across the site network.
//!
//! # Overview
//!
//! A translation group is the set of per-site counterparts of one logical
//! content item. Groups are stored as rows keyed by a canonical source
//! `(site, content)` pair. Because callers do not know which side of a
//! relation was created first, two groups can be bootstrapped independently
//! for one item. [`ContentRelations`] heals this on the next write by keeping
//! the oldest group and merging every other one into it.
//!
//! # Usage
//!
//! ```no_run
//! use polyglot_domain::{RelationType, SiteId};
//! use polyglot_relations::{ContentRelations, RelationsConfig};
//! use polyglot_store::SqliteStore;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(SqliteStore::new("polyglot.db")?);
//! let relations = ContentRelations::new(store, RelationsConfig::default());
//!
//! let (en, de, fr) = (SiteId::new(1)?, SiteId::new(2)?, SiteId::new(3)?);
//! relations.set_relation(en, de, 42, 7, &RelationType::POST)?;
//! relations.set_relation(de, fr, 7, 19, &RelationType::POST)?;
//!
//! // One group, reachable from any member
//! let group = relations.get_relations(fr, 19, &RelationType::POST)?;
//! assert_eq!(group.len(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [relations]
//! cache_ttl_secs = 0
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod relations;

pub use config::RelationsConfig;
pub use error::{RelationsError, StoreFailure};
pub use relations::{
    relations_cache_key, translations_generation_key, ContentRelations,
    RELATIONS_CACHE_NAMESPACE, TRANSLATIONS_GENERATION_NAMESPACE,
};
