//! Request context and translation arguments
//!
//! Everything the assembler knows about the current request arrives through
//! [`RequestContext`]; nothing is read from process-wide state.

use polyglot_domain::{CacheKey, ContentId, RelationType, SiteId};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Cache namespace of assembled translation sets
pub const TRANSLATIONS_CACHE_NAMESPACE: &str = "translations";

/// Kind of page a request is for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RequestType {
    /// A single post or page
    Singular,
    /// Archive of one taxonomy term
    TermArchive,
    /// Archive of one post type
    PostTypeArchive,
    /// Search results
    Search,
    /// The site's front page
    FrontPage,
    /// Host-defined type with its own resolver
    Other(String),
}

impl RequestType {
    /// Stable name, also used in cache keys
    pub fn as_str(&self) -> &str {
        match self {
            RequestType::Singular => "singular",
            RequestType::TermArchive => "term-archive",
            RequestType::PostTypeArchive => "post-type-archive",
            RequestType::Search => "search",
            RequestType::FrontPage => "front-page",
            RequestType::Other(name) => name,
        }
    }

    /// Relation type used to look up the translation group
    pub fn relation_type(&self) -> RelationType {
        match self {
            RequestType::TermArchive => RelationType::TERM,
            _ => RelationType::POST,
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "singular" => RequestType::Singular,
            "term-archive" => RequestType::TermArchive,
            "post-type-archive" => RequestType::PostTypeArchive,
            "search" => RequestType::Search,
            "front-page" => RequestType::FrontPage,
            other => RequestType::Other(other.to_string()),
        })
    }
}

/// The current request, as seen by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Site serving the request
    pub site_id: SiteId,

    /// Queried content item, 0 when the page is not about one item
    pub content_id: ContentId,

    /// Kind of page
    pub request_type: RequestType,

    /// Post type of an archive request
    pub post_type: Option<String>,

    /// Term of a search request
    pub search_term: Option<String>,

    /// Visitor asked not to be redirected
    pub noredirect: bool,
}

impl RequestContext {
    /// Context for a page on `site_id` that is not about one item
    pub fn new(site_id: SiteId, request_type: RequestType) -> Self {
        Self {
            site_id,
            content_id: 0,
            request_type,
            post_type: None,
            search_term: None,
            noredirect: false,
        }
    }

    /// Context for a single post or page
    pub fn singular(site_id: SiteId, content_id: ContentId) -> Self {
        Self::new(site_id, RequestType::Singular).with_content(content_id)
    }

    /// Builder-style content id setter
    pub fn with_content(mut self, content_id: ContentId) -> Self {
        self.content_id = content_id;
        self
    }

    /// Builder-style post type setter
    pub fn with_post_type(mut self, post_type: impl Into<String>) -> Self {
        self.post_type = Some(post_type.into());
        self
    }

    /// Builder-style search term setter
    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    /// Builder-style opt-out of redirects
    pub fn with_noredirect(mut self, noredirect: bool) -> Self {
        self.noredirect = noredirect;
        self
    }
}

/// Arguments of one [`get_translations`](crate::TranslationAssembler::get_translations) call
///
/// Every field is optional; omitted fields are taken from the [`RequestContext`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationArgs {
    /// Source site
    pub site_id: Option<SiteId>,
    /// Source content item
    pub content_id: Option<ContentId>,
    /// Kind of page
    pub request_type: Option<RequestType>,
    /// Include the source site itself (default: false)
    pub include_base: Option<bool>,
    /// Suppress sites without an explicit content relation (default: false)
    pub strict: Option<bool>,
    /// Post type of an archive request
    pub post_type: Option<String>,
    /// Term of a search request
    pub search_term: Option<String>,
}

impl TranslationArgs {
    /// Empty arguments: everything comes from the context
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style site setter
    pub fn site(mut self, site_id: SiteId) -> Self {
        self.site_id = Some(site_id);
        self
    }

    /// Builder-style content setter
    pub fn content(mut self, content_id: ContentId) -> Self {
        self.content_id = Some(content_id);
        self
    }

    /// Builder-style request type setter
    pub fn request_type(mut self, request_type: RequestType) -> Self {
        self.request_type = Some(request_type);
        self
    }

    /// Builder-style `include_base` setter
    pub fn include_base(mut self, include_base: bool) -> Self {
        self.include_base = Some(include_base);
        self
    }

    /// Builder-style `strict` setter
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = Some(strict);
        self
    }

    /// Builder-style post type setter
    pub fn post_type(mut self, post_type: impl Into<String>) -> Self {
        self.post_type = Some(post_type.into());
        self
    }

    /// Builder-style search term setter
    pub fn search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    /// Fill omitted fields from the request context
    pub fn resolve(self, context: &RequestContext) -> ResolvedArgs {
        ResolvedArgs {
            site_id: self.site_id.unwrap_or(context.site_id),
            content_id: self.content_id.unwrap_or(context.content_id),
            request_type: self
                .request_type
                .unwrap_or_else(|| context.request_type.clone()),
            include_base: self.include_base.unwrap_or(false),
            strict: self.strict.unwrap_or(false),
            post_type: self.post_type.or_else(|| context.post_type.clone()),
            search_term: self.search_term.or_else(|| context.search_term.clone()),
        }
    }
}

/// Fully normalized arguments; what overrides see and what the cache key is built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArgs {
    /// Source site
    pub site_id: SiteId,
    /// Source content item, 0 for none
    pub content_id: ContentId,
    /// Kind of page
    pub request_type: RequestType,
    /// Include the source site itself
    pub include_base: bool,
    /// Suppress sites without an explicit content relation
    pub strict: bool,
    /// Post type of an archive request
    pub post_type: Option<String>,
    /// Term of a search request
    pub search_term: Option<String>,
}

impl ResolvedArgs {
    /// Typed cache key of these arguments
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(TRANSLATIONS_CACHE_NAMESPACE)
            .field("site_id", self.site_id)
            .field("content_id", self.content_id)
            .field("type", &self.request_type)
            .field("include_base", self.include_base)
            .field("strict", self.strict)
            .optional_field("post_type", self.post_type.as_deref())
            .optional_field("search_term", self.search_term.as_deref())
    }
}
