//! Configuration for the translation assembler
//!
//! Embedded in the host's configuration file under `[cache]`.

use crate::TranslationError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default lifetime of cached translation sets: 5 minutes
const DEFAULT_TRANSLATIONS_TTL_SECS: u64 = 300;

/// Configuration for [`TranslationAssembler`](crate::TranslationAssembler)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblerConfig {
    /// Store assembled translation sets in the cache
    pub cache_translations: bool,

    /// Lifetime of a cached translation set
    ///
    /// Relation writes retire affected sets immediately; the lifetime bounds
    /// how long a set survives changes to site settings or the site graph.
    pub translations_ttl_secs: u64,

    /// Lifetime of cached translation groups; 0 keeps them until invalidated
    pub relations_ttl_secs: u64,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            cache_translations: true,
            translations_ttl_secs: DEFAULT_TRANSLATIONS_TTL_SECS,
            relations_ttl_secs: 0,
        }
    }
}

impl AssemblerConfig {
    /// Configuration that never caches translation sets
    pub fn uncached() -> Self {
        Self {
            cache_translations: false,
            ..Self::default()
        }
    }

    /// Lifetime of cached translation sets
    pub fn translations_ttl(&self) -> Duration {
        Duration::from_secs(self.translations_ttl_secs)
    }

    /// Check that values are usable
    pub fn validate(&self) -> Result<(), TranslationError> {
        if self.cache_translations && self.translations_ttl_secs == 0 {
            return Err(TranslationError::InvalidConfig(
                "translations_ttl_secs must be positive while cache_translations is on".into(),
            ));
        }
        Ok(())
    }
}
