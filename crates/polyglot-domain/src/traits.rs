//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the core and its collaborators.
//! Storage lives in `polyglot-store`; language settings, URL building and the
//! cache backend are supplied by the host.

use crate::{
    CacheKey, ContentId, ContentRelation, GroupKey, Language, RelationType, RemoteContent,
    SiteId, SiteRelation,
};
use std::collections::BTreeMap;
use std::time::Duration;

/// Persistence of site relations and content relation rows
///
/// Implemented by the infrastructure layer (polyglot-store). Implementations
/// surface storage failures through `Self::Error` and never retry.
pub trait RelationStore {
    /// Error type for store operations
    type Error;

    /// All sites joined to `site` in the undirected relation graph, ascending
    fn related_sites(&self, site: SiteId) -> Result<Vec<SiteId>, Self::Error>;

    /// Every stored site relation
    fn site_relations(&self) -> Result<Vec<SiteRelation>, Self::Error>;

    /// Insert missing edges between `base` and each of `sites`
    ///
    /// Self pairs and existing edges are ignored. Returns the number of edges created.
    fn set_relations(&self, base: SiteId, sites: &[SiteId]) -> Result<usize, Self::Error>;

    /// Remove every edge touching `site`, or only the edge to `other` when given
    ///
    /// Returns the number of edges removed.
    fn delete_relations(&self, site: SiteId, other: Option<SiteId>)
        -> Result<usize, Self::Error>;

    /// The translation group containing `(site, content_id)`, one entry per site
    ///
    /// Includes the item itself. Empty when the item belongs to no group.
    fn content_relations(
        &self,
        site: SiteId,
        content_id: ContentId,
        relation_type: &RelationType,
    ) -> Result<BTreeMap<SiteId, ContentId>, Self::Error>;

    /// Distinct group keys of rows matching any of `members`, in row insertion order
    fn find_group_keys(
        &self,
        members: &[(SiteId, ContentId)],
        relation_type: &RelationType,
    ) -> Result<Vec<GroupKey>, Self::Error>;

    /// All rows of one group
    fn group_members(
        &self,
        key: GroupKey,
        relation_type: &RelationType,
    ) -> Result<Vec<ContentRelation>, Self::Error>;

    /// Insert one row; returns `false` when an identical row already exists
    fn insert_content_row(&self, row: &ContentRelation) -> Result<bool, Self::Error>;

    /// Delete the row of `site` within the group `key`
    fn delete_content_row(
        &self,
        key: GroupKey,
        site: SiteId,
        relation_type: &RelationType,
    ) -> Result<usize, Self::Error>;

    /// Delete the row `(target_site, target_content)` from the group containing
    /// `(source_site, source_content)`
    fn delete_content_relation(
        &self,
        source_site: SiteId,
        target_site: SiteId,
        source_content: ContentId,
        target_content: ContentId,
        relation_type: &RelationType,
    ) -> Result<usize, Self::Error>;

    /// Rewrite every row of the groups in `from` to belong to `into`
    ///
    /// Must run as one unit. Rows whose site already has a row in `into` are
    /// dropped so a group never holds two rows for one site. Returns the
    /// number of rows moved.
    fn merge_groups(
        &self,
        into: GroupKey,
        from: &[GroupKey],
        relation_type: &RelationType,
    ) -> Result<usize, Self::Error>;

    /// Rows held by `site`, optionally restricted to one type
    fn site_content_relations(
        &self,
        site: SiteId,
        relation_type: Option<&RelationType>,
    ) -> Result<Vec<ContentRelation>, Self::Error>;

    /// Give `target` a row with the same content id in every group `source` belongs to
    ///
    /// Groups that already hold a row for `target` are left alone. Returns rows created.
    fn copy_site_content_relations(
        &self,
        source: SiteId,
        target: SiteId,
    ) -> Result<usize, Self::Error>;

    /// Delete every row held by `site`; groups left with a single row are removed too
    fn delete_site_content_relations(&self, site: SiteId) -> Result<usize, Self::Error>;
}

/// Per-site language settings
pub trait LanguageCatalog: Send + Sync {
    /// Language of `site`, or `None` when the site has no language configured
    fn site_language(&self, site: SiteId) -> Option<Language>;

    /// Languages of the given sites; sites without settings are left out
    fn languages_for(&self, sites: &[SiteId]) -> BTreeMap<SiteId, Language> {
        sites
            .iter()
            .filter_map(|site| self.site_language(*site).map(|language| (*site, language)))
            .collect()
    }
}

/// Site metadata and URL building supplied by the host
pub trait SiteDirectory: Send + Sync {
    /// Whether the site exists and is live
    fn site_exists(&self, site: SiteId) -> bool;

    /// Front page URL of the site
    fn home_url(&self, site: SiteId) -> Option<String>;

    /// Display name of the site
    fn site_name(&self, site: SiteId) -> Option<String>;

    /// Flag or icon for a site's language
    fn icon_url(&self, _site: SiteId, _language: &Language) -> Option<String> {
        None
    }

    /// Public URL and title of a singular item, if it is viewable
    fn permalink(&self, site: SiteId, content_id: ContentId) -> Option<RemoteContent>;

    /// Archive URL and name of a taxonomy term, if it is viewable
    fn term_link(&self, site: SiteId, term_id: ContentId) -> Option<RemoteContent>;

    /// Archive URL of a post type, if the site has that archive
    fn post_type_archive(&self, site: SiteId, post_type: &str) -> Option<RemoteContent>;

    /// Search results URL for a term
    fn search_url(&self, site: SiteId, term: &str) -> Option<RemoteContent>;
}

/// Type-specific details a resolver may need besides the target site
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveHints {
    /// Site of the current request
    pub source_site: Option<SiteId>,

    /// Content id of the current request
    pub source_content_id: ContentId,

    /// Post type of an archive request
    pub post_type: Option<String>,

    /// Term of a search request
    pub search_term: Option<String>,
}

/// Builds the remote URL and title for one request type
///
/// Registered per request type in the translation assembler's registry.
pub trait ContentResolver: Send + Sync {
    /// Resolve a mapped counterpart (`content_id`) on `site`
    fn resolve_related(
        &self,
        site: SiteId,
        content_id: ContentId,
        hints: &ResolveHints,
    ) -> Option<RemoteContent>;

    /// Resolve `site`'s version of the request when no relation row exists
    fn resolve_unrelated(&self, site: SiteId, hints: &ResolveHints) -> Option<RemoteContent>;
}

/// Key/value cache backend
///
/// Values are opaque strings (JSON in practice) so any external store fits.
pub trait Cache: Send + Sync {
    /// Get a live entry
    fn get(&self, key: &CacheKey) -> Option<String>;

    /// Store an entry; `None` keeps it until deleted
    fn set(&self, key: &CacheKey, value: String, ttl: Option<Duration>);

    /// Remove an entry; returns whether one existed
    fn delete(&self, key: &CacheKey) -> bool;
}
