//! Accept-Language header parsing
//!
//! Malformed segments are skipped, never reported: a header always parses.

use polyglot_domain::language::primary_subtag;
use tracing::debug;

/// Visitor languages in header order, each with a priority in `[0, 1]`
///
/// Tags compare case-insensitively with `_` and `-` treated alike. Inserting a
/// tag again replaces its priority but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AcceptLanguages {
    entries: Vec<(String, f64)>,
}

impl AcceptLanguages {
    /// No languages
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a tag; the priority is clamped to `[0, 1]`
    pub fn insert(&mut self, tag: impl Into<String>, priority: f64) {
        let tag = tag.into();
        let priority = clamp_priority(priority);
        match self.position(&tag) {
            Some(index) => self.entries[index].1 = priority,
            None => self.entries.push((tag, priority)),
        }
    }

    /// Priority of a tag
    pub fn get(&self, tag: &str) -> Option<f64> {
        self.position(tag).map(|index| self.entries[index].1)
    }

    /// Whether a tag is present
    pub fn contains(&self, tag: &str) -> bool {
        self.position(tag).is_some()
    }

    /// Tags and priorities in header order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries
            .iter()
            .map(|(tag, priority)| (tag.as_str(), *priority))
    }

    /// Number of tags
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no tag was accepted
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add the bare language of every regional tag
    ///
    /// `xx-YY` also registers `xx` at the same priority, directly after it,
    /// unless `xx` is already present anywhere in the header. A regional tag
    /// therefore never lowers an explicit bare entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use polyglot_negotiator::parse_accept_language;
    ///
    /// let expanded = parse_accept_language("en-US;q=0.8, fr;q=0.9").expanded();
    /// let tags: Vec<_> = expanded.iter().collect();
    /// assert_eq!(tags, vec![("en-US", 0.8), ("en", 0.8), ("fr", 0.9)]);
    /// ```
    pub fn expanded(&self) -> AcceptLanguages {
        let mut expanded = AcceptLanguages::new();
        for (tag, priority) in self.iter() {
            expanded.insert(tag, priority);

            if !tag.contains(['-', '_']) {
                continue;
            }
            let bare = primary_subtag(tag);
            if bare.is_empty() || self.contains(&bare) || expanded.contains(&bare) {
                continue;
            }
            expanded.insert(bare, priority);
        }
        expanded
    }

    fn position(&self, tag: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(existing, _)| same_tag(existing, tag))
    }
}

/// Case-insensitive tag comparison treating `_` as `-`
pub fn same_tag(a: &str, b: &str) -> bool {
    a.len() == b.len()
        && a.chars().zip(b.chars()).all(|(x, y)| {
            let x = if x == '_' { '-' } else { x };
            let y = if y == '_' { '-' } else { y };
            x.eq_ignore_ascii_case(&y)
        })
}

fn clamp_priority(priority: f64) -> f64 {
    if priority.is_nan() {
        0.0
    } else {
        priority.clamp(0.0, 1.0)
    }
}

/// Parse a raw `Accept-Language` header value
///
/// - parenthesised comments are removed first
/// - segments are split on `,` and trimmed
/// - the tag is the text before the first `;`; tags without any letter, `-`
///   or `_` are skipped
/// - no parameters means priority `1.0`; otherwise the `q` parameter is used,
///   clamped to `[0, 1]`, and a missing or unparsable `q` gives `0`
/// - a repeated tag keeps its first position and takes the last priority
///
/// # Examples
///
/// ```
/// use polyglot_negotiator::parse_accept_language;
///
/// let languages = parse_accept_language("de-CH, en (fallback);q=0.5, *;q=0.1");
/// assert_eq!(languages.get("de-ch"), Some(1.0));
/// assert_eq!(languages.get("en"), Some(0.5));
/// assert!(!languages.contains("*"));
/// ```
pub fn parse_accept_language(header: &str) -> AcceptLanguages {
    let mut languages = AcceptLanguages::new();
    let cleaned = strip_comments(header);

    for segment in cleaned.split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }

        let (tag, params) = match segment.split_once(';') {
            Some((tag, params)) => (tag.trim(), Some(params)),
            None => (segment, None),
        };

        if !tag
            .chars()
            .any(|c| c.is_alphabetic() || c == '-' || c == '_')
        {
            debug!(segment, "Skipping Accept-Language segment without a language tag");
            continue;
        }

        let priority = match params {
            None => 1.0,
            Some(params) => quality(params),
        };
        languages.insert(tag, priority);
    }

    languages
}

/// Value of the `q` parameter in `params`, 0 when missing or unparsable
fn quality(params: &str) -> f64 {
    params
        .split(';')
        .filter_map(|param| param.split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("q"))
        .and_then(|(_, value)| value.trim().parse::<f64>().ok())
        .map(clamp_priority)
        .unwrap_or(0.0)
}

/// Remove every `(` up to and including the next `)`
///
/// Works on the original characters in one pass, so no character of the
/// header can be mistaken for a delimiter. An unclosed `(` is kept as text.
fn strip_comments(header: &str) -> String {
    let mut cleaned = String::with_capacity(header.len());
    let mut rest = header;

    while let Some(open) = rest.find('(') {
        let Some(close) = rest[open..].find(')') else {
            break;
        };
        cleaned.push_str(&rest[..open]);
        rest = &rest[open + close + 1..];
    }
    cleaned.push_str(rest);
    cleaned
}
