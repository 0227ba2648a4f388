//! Translation assembler: builds the translation set of a request

use crate::config::AssemblerConfig;
use crate::context::{RequestContext, ResolvedArgs, TranslationArgs};
use crate::hooks::Hooks;
use crate::registry::ResolverRegistry;
use crate::resolvers::front_page;
use crate::TranslationError;
use polyglot_domain::traits::{
    Cache, LanguageCatalog, RelationStore, ResolveHints, SiteDirectory,
};
use polyglot_domain::{CacheKey, ContentId, SiteId, Translation, TranslationMap};
use polyglot_relations::ContentRelations;
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::sync::Arc;
use tracing::debug;

/// Assembles [`Translation`] records from relations, language settings and resolvers
///
/// # Examples
///
/// ```no_run
/// use polyglot_relations::{ContentRelations, RelationsConfig};
/// use polyglot_store::SqliteStore;
/// use polyglot_translations::{
///     AssemblerConfig, RequestContext, ResolverRegistry, TranslationArgs, TranslationAssembler,
/// };
/// # use polyglot_domain::traits::{LanguageCatalog, SiteDirectory};
/// # use std::sync::Arc;
/// # fn host() -> (Arc<dyn LanguageCatalog>, Arc<dyn SiteDirectory>) { unimplemented!() }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let (languages, directory) = host();
/// let store = Arc::new(SqliteStore::new("polyglot.db")?);
/// let relations = Arc::new(ContentRelations::new(store, RelationsConfig::default()));
/// let registry = ResolverRegistry::with_defaults(directory.clone());
///
/// let assembler = TranslationAssembler::new(
///     relations,
///     languages,
///     directory,
///     registry,
///     AssemblerConfig::default(),
/// );
///
/// let context = RequestContext::singular(polyglot_domain::SiteId::new(1)?, 42);
/// for (site, translation) in assembler.get_translations(&context, TranslationArgs::new())? {
///     println!("{}: {}", site, translation.remote_url);
/// }
/// # Ok(())
/// # }
/// ```
pub struct TranslationAssembler<S> {
    relations: Arc<ContentRelations<S>>,
    languages: Arc<dyn LanguageCatalog>,
    directory: Arc<dyn SiteDirectory>,
    registry: ResolverRegistry,
    cache: Option<Arc<dyn Cache>>,
    hooks: Hooks,
    config: AssemblerConfig,
}

impl<S> TranslationAssembler<S>
where
    S: RelationStore,
    S::Error: StdError + Send + Sync + 'static,
{
    /// Create an assembler without a cache or hooks
    pub fn new(
        relations: Arc<ContentRelations<S>>,
        languages: Arc<dyn LanguageCatalog>,
        directory: Arc<dyn SiteDirectory>,
        registry: ResolverRegistry,
        config: AssemblerConfig,
    ) -> Self {
        Self {
            relations,
            languages,
            directory,
            registry,
            cache: None,
            hooks: Hooks::new(),
            config,
        }
    }

    /// Attach a cache for assembled translation sets
    ///
    /// Sets are only cached while the relation resolver has a cache of its
    /// own: its writes publish the generations that retire stale sets. Hosts
    /// normally hand both the same cache.
    pub fn with_cache(mut self, cache: Arc<dyn Cache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Replace the hook lists
    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// The resolver registry
    pub fn registry(&self) -> &ResolverRegistry {
        &self.registry
    }

    /// The content relation resolver
    pub fn relations(&self) -> &ContentRelations<S> {
        &self.relations
    }

    /// Translations of the requested content, keyed by target site
    ///
    /// Sites are dropped when they have no language settings or no URL can be
    /// resolved for them. An un-networked site yields an empty map.
    pub fn get_translations(
        &self,
        context: &RequestContext,
        args: TranslationArgs,
    ) -> Result<TranslationMap, TranslationError> {
        let mut args = args.resolve(context);
        self.hooks.apply_args_overrides(context, &mut args);

        let key = self.translations_cache_key(&args);
        if let Some(cached) = key.as_ref().and_then(|key| self.cached_translations(key)) {
            debug!(site = args.site_id.value(), content_id = args.content_id, "Translations cache hit");
            return Ok(cached);
        }

        let translations = self.assemble(&args)?;
        let translations = self.hooks.apply_post_processors(&args, translations);

        if let Some(key) = &key {
            self.store_translations(key, &translations);
        }
        Ok(translations)
    }

    /// Cache key of the translation set for `args`; `None` when it must not be cached
    ///
    /// Carries the source item's relation generation, so any relation write
    /// on its group retires the entries cached before it.
    fn translations_cache_key(&self, args: &ResolvedArgs) -> Option<CacheKey> {
        if !self.config.cache_translations || self.cache.is_none() {
            return None;
        }
        let generation = self.relations.translations_generation(
            args.site_id,
            args.content_id,
            &args.request_type.relation_type(),
        )?;
        Some(args.cache_key().field("generation", generation))
    }

    fn assemble(&self, args: &ResolvedArgs) -> Result<TranslationMap, TranslationError> {
        let mut sites = self
            .relations
            .store()
            .related_sites(args.site_id)
            .map_err(|e| TranslationError::Store(Box::new(e)))?;

        if sites.is_empty() {
            debug!(site = args.site_id.value(), "Site has no related sites");
            return Ok(TranslationMap::new());
        }
        if args.include_base && !sites.contains(&args.site_id) {
            sites.push(args.site_id);
            sites.sort();
        }

        let relation_type = args.request_type.relation_type();
        let group = if args.content_id > 0 {
            self.relations
                .get_relations(args.site_id, args.content_id, &relation_type)?
        } else {
            BTreeMap::new()
        };

        if args.strict && group.is_empty() {
            debug!(
                site = args.site_id.value(),
                content_id = args.content_id,
                "No translation group in strict mode"
            );
            return Ok(TranslationMap::new());
        }

        let live: Vec<SiteId> = sites
            .into_iter()
            .filter(|site| self.directory.site_exists(*site))
            .collect();
        let languages = self.languages.languages_for(&live);

        let resolver = self.registry.get(&args.request_type);
        let hints = ResolveHints {
            source_site: Some(args.site_id),
            source_content_id: args.content_id,
            post_type: args.post_type.clone(),
            search_term: args.search_term.clone(),
        };

        let mut translations = TranslationMap::new();
        for (site, language) in languages {
            let mapped: Option<ContentId> = group.get(&site).copied();

            let remote = match mapped {
                Some(content_id) => resolver.resolve_related(site, content_id, &hints),
                None if args.strict => None,
                None => resolver.resolve_unrelated(site, &hints),
            };
            let remote = match remote {
                Some(remote) => Some(remote),
                None if args.strict => None,
                None => front_page(self.directory.as_ref(), site),
            };

            let Some(remote) = remote.filter(|remote| !remote.url.is_empty()) else {
                debug!(site = site.value(), "No URL for site, skipping");
                continue;
            };

            let icon_url = self.directory.icon_url(site, &language);
            translations.insert(
                site,
                Translation {
                    source_site_id: args.site_id,
                    target_site_id: site,
                    target_content_id: mapped.unwrap_or(0),
                    relation_type: relation_type.clone(),
                    remote_url: remote.url,
                    remote_title: remote.title,
                    language,
                    icon_url,
                },
            );
        }

        Ok(translations)
    }

    fn cached_translations(&self, key: &CacheKey) -> Option<TranslationMap> {
        let raw = self.cache.as_ref()?.get(key)?;
        match serde_json::from_str::<Vec<Translation>>(&raw) {
            Ok(list) => Some(
                list.into_iter()
                    .map(|translation| (translation.target_site_id, translation))
                    .collect(),
            ),
            Err(e) => {
                debug!(error = %e, "Discarding unreadable translations cache entry");
                None
            }
        }
    }

    fn store_translations(&self, key: &CacheKey, translations: &TranslationMap) {
        let Some(cache) = &self.cache else {
            return;
        };
        let list: Vec<&Translation> = translations.values().collect();
        match serde_json::to_string(&list) {
            Ok(value) => cache.set(key, value, Some(self.config.translations_ttl())),
            Err(e) => debug!(error = %e, "Translations not cached"),
        }
    }
}
