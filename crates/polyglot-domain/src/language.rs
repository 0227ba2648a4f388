//! Language module - per-site language settings

use serde::{Deserialize, Serialize};

/// Language settings of one site
///
/// Administrator-managed; the core reads it as an immutable snapshot per resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    /// HTTP language code (e.g. "en-US", "pt-BR", "de")
    pub http_code: String,

    /// Short ISO 639 code (e.g. "en", "pt")
    pub iso_code: String,

    /// Name in the language itself (e.g. "Deutsch")
    pub native_name: String,

    /// English name (e.g. "German")
    pub english_name: String,

    /// Written right to left
    #[serde(default)]
    pub is_rtl: bool,

    /// Weight of this site in negotiation; a tie-break factor, not a rank
    #[serde(default = "default_priority")]
    pub priority: u32,
}

fn default_priority() -> u32 {
    1
}

impl Language {
    /// Create a language with default flags (left to right, priority 1)
    pub fn new(
        http_code: impl Into<String>,
        native_name: impl Into<String>,
        english_name: impl Into<String>,
    ) -> Self {
        let http_code = http_code.into();
        let iso_code = primary_subtag(&http_code);
        Self {
            http_code,
            iso_code,
            native_name: native_name.into(),
            english_name: english_name.into(),
            is_rtl: false,
            priority: default_priority(),
        }
    }

    /// Builder-style priority setter
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Builder-style right-to-left setter
    pub fn with_rtl(mut self, is_rtl: bool) -> Self {
        self.is_rtl = is_rtl;
        self
    }

    /// Lowercased primary subtag of the HTTP code ("pt-BR" -> "pt")
    pub fn bare_code(&self) -> String {
        primary_subtag(&self.http_code)
    }

    /// Whether the HTTP code carries a region or script subtag
    pub fn has_region(&self) -> bool {
        self.http_code.contains(['-', '_'])
    }
}

/// Lowercased text before the first `-` or `_`
pub fn primary_subtag(tag: &str) -> String {
    tag.split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}
