//! Content relations - per-site counterparts of one logical content item

use crate::{DomainError, SiteId};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Identifier of a content item, local to its site
///
/// Zero means "no content" and never appears in a stored relation.
pub type ContentId = u64;

/// Kind of content a relation links (`post`, `term`, ...)
///
/// Open-ended: hosts can introduce their own kinds through [`RelationType::new`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RelationType(Cow<'static, str>);

impl RelationType {
    /// Posts, pages and other singular items
    pub const POST: RelationType = RelationType(Cow::Borrowed("post"));

    /// Taxonomy terms
    pub const TERM: RelationType = RelationType(Cow::Borrowed("term"));

    /// Create a relation type from an identifier
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let valid = !value.is_empty()
            && value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(DomainError::InvalidRelationType(value));
        }
        Ok(Self(Cow::Owned(value)))
    }

    /// Get the type as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RelationType {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RelationType> for String {
    fn from(value: RelationType) -> Self {
        value.0.into_owned()
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical key of a translation group
///
/// Every row of a group carries the same `(source_site_id, source_content_id)`
/// pair; this is that pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    /// Site of the canonical source row
    pub site_id: SiteId,

    /// Content id of the canonical source row
    pub content_id: ContentId,
}

impl GroupKey {
    /// Create a group key
    pub fn new(site_id: SiteId, content_id: ContentId) -> Self {
        Self {
            site_id,
            content_id,
        }
    }
}

/// One stored content relation row
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentRelation {
    /// Site of the group's canonical source
    pub source_site_id: SiteId,

    /// Content id of the group's canonical source
    pub source_content_id: ContentId,

    /// Site holding this counterpart
    pub site_id: SiteId,

    /// Counterpart content id on `site_id`
    pub content_id: ContentId,

    /// Kind of content
    pub relation_type: RelationType,
}

impl ContentRelation {
    /// The group this row belongs to
    pub fn group_key(&self) -> GroupKey {
        GroupKey::new(self.source_site_id, self.source_content_id)
    }

    /// Whether this is the group's self-referencing row
    pub fn is_source_row(&self) -> bool {
        self.site_id == self.source_site_id && self.content_id == self.source_content_id
    }
}
