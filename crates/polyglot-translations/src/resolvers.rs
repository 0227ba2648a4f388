//! Built-in content resolvers
//!
//! Each resolver turns a target site (and, for singular items and terms, the
//! mapped content id) into a remote URL and title through the host's
//! [`SiteDirectory`].

use polyglot_domain::traits::{ContentResolver, ResolveHints, SiteDirectory};
use polyglot_domain::{ContentId, RemoteContent, SiteId};
use std::sync::Arc;

/// Resolver of unregistered request types; never yields content
#[derive(Debug, Clone, Copy, Default)]
pub struct NullResolver;

impl ContentResolver for NullResolver {
    fn resolve_related(&self, _: SiteId, _: ContentId, _: &ResolveHints) -> Option<RemoteContent> {
        None
    }

    fn resolve_unrelated(&self, _: SiteId, _: &ResolveHints) -> Option<RemoteContent> {
        None
    }
}

/// Single posts and pages: permalink of the mapped item
pub struct SingularResolver {
    directory: Arc<dyn SiteDirectory>,
}

impl SingularResolver {
    /// Create a resolver over the host's site directory
    pub fn new(directory: Arc<dyn SiteDirectory>) -> Self {
        Self { directory }
    }
}

impl ContentResolver for SingularResolver {
    fn resolve_related(
        &self,
        site: SiteId,
        content_id: ContentId,
        _hints: &ResolveHints,
    ) -> Option<RemoteContent> {
        self.directory.permalink(site, content_id)
    }

    fn resolve_unrelated(&self, _site: SiteId, _hints: &ResolveHints) -> Option<RemoteContent> {
        None
    }
}

/// Taxonomy term archives: archive link of the mapped term
pub struct TermArchiveResolver {
    directory: Arc<dyn SiteDirectory>,
}

impl TermArchiveResolver {
    /// Create a resolver over the host's site directory
    pub fn new(directory: Arc<dyn SiteDirectory>) -> Self {
        Self { directory }
    }
}

impl ContentResolver for TermArchiveResolver {
    fn resolve_related(
        &self,
        site: SiteId,
        term_id: ContentId,
        _hints: &ResolveHints,
    ) -> Option<RemoteContent> {
        self.directory.term_link(site, term_id)
    }

    fn resolve_unrelated(&self, _site: SiteId, _hints: &ResolveHints) -> Option<RemoteContent> {
        None
    }
}

/// Post type archives, derived from the target site alone
pub struct PostTypeArchiveResolver {
    directory: Arc<dyn SiteDirectory>,
}

impl PostTypeArchiveResolver {
    /// Create a resolver over the host's site directory
    pub fn new(directory: Arc<dyn SiteDirectory>) -> Self {
        Self { directory }
    }
}

impl ContentResolver for PostTypeArchiveResolver {
    fn resolve_related(
        &self,
        site: SiteId,
        _content_id: ContentId,
        hints: &ResolveHints,
    ) -> Option<RemoteContent> {
        self.resolve_unrelated(site, hints)
    }

    fn resolve_unrelated(&self, site: SiteId, hints: &ResolveHints) -> Option<RemoteContent> {
        let post_type = hints.post_type.as_deref()?;
        self.directory.post_type_archive(site, post_type)
    }
}

/// Search results for the same term on the target site
pub struct SearchResolver {
    directory: Arc<dyn SiteDirectory>,
}

impl SearchResolver {
    /// Create a resolver over the host's site directory
    pub fn new(directory: Arc<dyn SiteDirectory>) -> Self {
        Self { directory }
    }
}

impl ContentResolver for SearchResolver {
    fn resolve_related(
        &self,
        site: SiteId,
        _content_id: ContentId,
        hints: &ResolveHints,
    ) -> Option<RemoteContent> {
        self.resolve_unrelated(site, hints)
    }

    fn resolve_unrelated(&self, site: SiteId, hints: &ResolveHints) -> Option<RemoteContent> {
        let term = hints.search_term.as_deref()?;
        self.directory.search_url(site, term)
    }
}

/// Front pages: the target site's home URL, titled with the site name
pub struct FrontPageResolver {
    directory: Arc<dyn SiteDirectory>,
}

impl FrontPageResolver {
    /// Create a resolver over the host's site directory
    pub fn new(directory: Arc<dyn SiteDirectory>) -> Self {
        Self { directory }
    }
}

impl ContentResolver for FrontPageResolver {
    fn resolve_related(
        &self,
        site: SiteId,
        _content_id: ContentId,
        hints: &ResolveHints,
    ) -> Option<RemoteContent> {
        self.resolve_unrelated(site, hints)
    }

    fn resolve_unrelated(&self, site: SiteId, _hints: &ResolveHints) -> Option<RemoteContent> {
        front_page(self.directory.as_ref(), site)
    }
}

/// Home URL and name of `site`
pub(crate) fn front_page(directory: &dyn SiteDirectory, site: SiteId) -> Option<RemoteContent> {
    let url = directory.home_url(site)?;
    let title = directory.site_name(site).unwrap_or_default();
    Some(RemoteContent::new(url, title))
}
