//! Site metadata backed by the network configuration file.
//!
//! URLs follow the plain query-string scheme every site understands without
//! rewrite rules: `?p=` for items, `?cat=` for terms, `?post_type=` for
//! archives and `?s=` for searches.

use crate::config::{NetworkConfig, SiteConfig};
use polyglot_domain::traits::{LanguageCatalog, SiteDirectory};
use polyglot_domain::{ContentId, Language, RemoteContent, SiteId};
use std::collections::BTreeMap;

/// Static view of the configured sites
#[derive(Debug, Clone, Default)]
pub struct StaticNetwork {
    sites: BTreeMap<SiteId, SiteConfig>,
}

impl StaticNetwork {
    /// Build the view from a loaded configuration.
    pub fn from_config(config: &NetworkConfig) -> Self {
        let sites = config
            .sites
            .iter()
            .map(|site| (site.id, site.clone()))
            .collect();
        Self { sites }
    }

    fn live_site(&self, site: SiteId) -> Option<&SiteConfig> {
        self.sites.get(&site).filter(|config| config.live)
    }

    fn query_url(&self, site: SiteId, query: &str) -> Option<String> {
        let home = &self.live_site(site)?.home_url;
        Some(format!("{}?{}", home, query))
    }
}

impl LanguageCatalog for StaticNetwork {
    fn site_language(&self, site: SiteId) -> Option<Language> {
        self.sites.get(&site)?.language.clone()
    }
}

impl SiteDirectory for StaticNetwork {
    fn site_exists(&self, site: SiteId) -> bool {
        self.live_site(site).is_some()
    }

    fn home_url(&self, site: SiteId) -> Option<String> {
        self.live_site(site).map(|config| config.home_url.clone())
    }

    fn site_name(&self, site: SiteId) -> Option<String> {
        self.sites.get(&site).map(|config| config.name.clone())
    }

    fn icon_url(&self, site: SiteId, language: &Language) -> Option<String> {
        let base = self.sites.get(&site)?.flags_url.as_ref()?;
        Some(format!(
            "{}/{}.png",
            base.trim_end_matches('/'),
            language.iso_code
        ))
    }

    fn permalink(&self, site: SiteId, content_id: ContentId) -> Option<RemoteContent> {
        if content_id == 0 {
            return None;
        }
        let url = self.query_url(site, &format!("p={}", content_id))?;
        Some(RemoteContent::new(url, String::new()))
    }

    fn term_link(&self, site: SiteId, term_id: ContentId) -> Option<RemoteContent> {
        if term_id == 0 {
            return None;
        }
        let url = self.query_url(site, &format!("cat={}", term_id))?;
        Some(RemoteContent::new(url, String::new()))
    }

    fn post_type_archive(&self, site: SiteId, post_type: &str) -> Option<RemoteContent> {
        if post_type.is_empty() {
            return None;
        }
        let query = format!("post_type={}", urlencoding::encode(post_type));
        let url = self.query_url(site, &query)?;
        Some(RemoteContent::new(url, post_type))
    }

    fn search_url(&self, site: SiteId, term: &str) -> Option<RemoteContent> {
        let query = format!("s={}", urlencoding::encode(term));
        let url = self.query_url(site, &query)?;
        Some(RemoteContent::new(url, term))
    }
}
