//! Typed cache keys
//!
//! A key is a namespace plus a sorted list of named fields. Its storage form is
//! `namespace:<sha256 of the fields>`, which is stable across processes and
//! independent of the order fields were added in.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

/// Cache key built from named fields
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    namespace: &'static str,
    fields: BTreeMap<&'static str, String>,
}

impl CacheKey {
    /// Start a key in the given namespace
    pub fn new(namespace: &'static str) -> Self {
        Self {
            namespace,
            fields: BTreeMap::new(),
        }
    }

    /// Add a field; a later value for the same name replaces the earlier one
    pub fn field(mut self, name: &'static str, value: impl fmt::Display) -> Self {
        self.fields.insert(name, value.to_string());
        self
    }

    /// Add a field only when a value is present
    pub fn optional_field<T: fmt::Display>(self, name: &'static str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.field(name, value),
            None => self,
        }
    }

    /// Namespace of this key
    pub fn namespace(&self) -> &'static str {
        self.namespace
    }

    /// Storage form of the key
    ///
    /// # Examples
    ///
    /// ```
    /// use polyglot_domain::CacheKey;
    ///
    /// let a = CacheKey::new("t").field("site", 1).field("type", "post");
    /// let b = CacheKey::new("t").field("type", "post").field("site", 1);
    /// assert_eq!(a.digest(), b.digest());
    /// ```
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for (name, value) in &self.fields {
            // Length prefixes keep "a=b" + "c" distinct from "a=bc"
            hasher.update((name.len() as u64).to_be_bytes());
            hasher.update(name.as_bytes());
            hasher.update((value.len() as u64).to_be_bytes());
            hasher.update(value.as_bytes());
        }
        format!("{}:{}", self.namespace, hex::encode(hasher.finalize()))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digest())
    }
}
