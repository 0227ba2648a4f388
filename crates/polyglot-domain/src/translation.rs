//! Translation records - request-scoped views assembled from relations

use crate::{ContentId, Language, RelationType, SiteId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Translations of one content item, keyed by target site
pub type TranslationMap = BTreeMap<SiteId, Translation>;

/// URL and title of a piece of content on a remote site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteContent {
    /// Absolute URL
    pub url: String,

    /// Human readable title (may be empty)
    pub title: String,
}

impl RemoteContent {
    /// Create remote content
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }
}

/// One target site's version of a content item
///
/// Never persisted; rebuilt per request (or per cache entry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    /// Site the request originated from
    pub source_site_id: SiteId,

    /// Site holding this version
    pub target_site_id: SiteId,

    /// Content id on the target site (0 for archives, search and front pages)
    pub target_content_id: ContentId,

    /// Kind of content the target id refers to
    pub relation_type: RelationType,

    /// Resolved URL on the target site
    pub remote_url: String,

    /// Resolved title on the target site
    pub remote_title: String,

    /// Language settings of the target site
    pub language: Language,

    /// Flag or icon URL for the target language
    pub icon_url: Option<String>,
}

/// Winner of Accept-Language negotiation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedirectTarget {
    /// HTTP code of the chosen language
    pub language: String,

    /// Combined score: site priority times visitor priority
    pub priority: f64,

    /// Chosen site
    pub site_id: SiteId,

    /// Content id on the chosen site
    pub content_id: ContentId,

    /// URL to redirect to
    pub url: String,
}
