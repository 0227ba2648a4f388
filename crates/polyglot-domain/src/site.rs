//! Site module - nodes and edges of the site network

use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a site in the network
///
/// Always positive. Liveness is decided by the host through
/// [`SiteDirectory::site_exists`](crate::traits::SiteDirectory::site_exists).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct SiteId(u64);

impl SiteId {
    /// Create a site id, rejecting zero
    ///
    /// # Examples
    ///
    /// ```
    /// use polyglot_domain::SiteId;
    ///
    /// assert!(SiteId::new(3).is_ok());
    /// assert!(SiteId::new(0).is_err());
    /// ```
    pub fn new(value: u64) -> Result<Self, DomainError> {
        if value == 0 {
            return Err(DomainError::InvalidSiteId(value));
        }
        Ok(Self(value))
    }

    /// Get the raw value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for SiteId {
    type Error = DomainError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SiteId> for u64 {
    fn from(id: SiteId) -> Self {
        id.0
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An undirected edge between two sites
///
/// Stored canonically with the smaller id first so that inserting `(a, b)` and
/// `(b, a)` address the same edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SiteRelation {
    site_a: SiteId,
    site_b: SiteId,
}

impl SiteRelation {
    /// Create a canonical relation between two distinct sites
    pub fn new(first: SiteId, second: SiteId) -> Result<Self, DomainError> {
        if first == second {
            return Err(DomainError::SelfRelation(first.value()));
        }
        let (site_a, site_b) = if first < second {
            (first, second)
        } else {
            (second, first)
        };
        Ok(Self { site_a, site_b })
    }

    /// The smaller site id
    pub fn site_a(&self) -> SiteId {
        self.site_a
    }

    /// The larger site id
    pub fn site_b(&self) -> SiteId {
        self.site_b
    }

    /// Whether the relation touches the given site
    pub fn touches(&self, site: SiteId) -> bool {
        self.site_a == site || self.site_b == site
    }

    /// The site on the other end of the edge, if `site` is part of it
    pub fn other(&self, site: SiteId) -> Option<SiteId> {
        if self.site_a == site {
            Some(self.site_b)
        } else if self.site_b == site {
            Some(self.site_a)
        } else {
            None
        }
    }
}
