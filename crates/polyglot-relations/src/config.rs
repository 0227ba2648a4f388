//! Configuration for content relation lookups

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for [`ContentRelations`](crate::ContentRelations)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationsConfig {
    /// Lifetime of cached translation groups; 0 keeps them until invalidated
    pub cache_ttl_secs: u64,
}

impl RelationsConfig {
    /// Cache lifetime, `None` meaning "until invalidated"
    pub fn cache_ttl(&self) -> Option<Duration> {
        (self.cache_ttl_secs > 0).then(|| Duration::from_secs(self.cache_ttl_secs))
    }
}

impl Default for RelationsConfig {
    fn default() -> Self {
        Self { cache_ttl_secs: 0 }
    }
}
