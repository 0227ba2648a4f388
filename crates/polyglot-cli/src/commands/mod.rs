//! Command implementations.
//!
//! Every command returns its rendered output so `main` decides where it goes.

mod config;
mod content;
mod negotiate;
mod sites;
mod translations;

pub use config::execute_config;
pub use content::execute_content;
pub use negotiate::{execute_negotiate, execute_parse_header};
pub use sites::execute_sites;
pub use translations::execute_translations;

use crate::cli::{Command, RequestArgs};
use crate::config::NetworkConfig;
use crate::error::{CliError, Result};
use crate::network::StaticNetwork;
use crate::output::Formatter;
use polyglot_domain::{RelationType, SiteId};
use polyglot_relations::{ContentRelations, RelationsConfig};
use polyglot_store::SqliteStore;
use polyglot_translations::{
    MemoryCache, RequestContext, RequestType, ResolverRegistry, TranslationAssembler,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Run one parsed command.
///
/// `config` and `parse-header` never touch the database; every other command
/// opens `database` (or the configured path) first.
pub fn execute(
    command: Command,
    config: NetworkConfig,
    config_path: Option<&Path>,
    database: Option<&Path>,
    formatter: &Formatter,
) -> Result<String> {
    let open = move || App::open(config, database);

    match command {
        Command::Config(args) => execute_config(args, config_path, formatter),
        Command::ParseHeader { header } => execute_parse_header(&header, formatter),
        Command::Sites(args) => execute_sites(args, &open()?, formatter),
        Command::Content(args) => execute_content(args, &open()?, formatter),
        Command::Translations(args) => execute_translations(args, &open()?, formatter),
        Command::Negotiate(args) => execute_negotiate(args, &open()?, formatter),
    }
}

/// Services shared by all commands of one invocation
pub struct App {
    /// Loaded network configuration
    pub config: NetworkConfig,
    /// Site metadata from the configuration
    pub network: Arc<StaticNetwork>,
    /// Content relation resolver over the database
    pub relations: Arc<ContentRelations<SqliteStore>>,
    cache: Arc<MemoryCache>,
}

impl App {
    /// Open the database at `database`, or the configured path.
    pub fn open(config: NetworkConfig, database: Option<&Path>) -> Result<Self> {
        let path = database.unwrap_or(config.database_path.as_path()).to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        debug!(path = %path.display(), "Opening relation database");
        let store = SqliteStore::new(&path)?;
        Ok(Self::with_store(config, store))
    }

    /// Run against a throwaway in-memory database.
    pub fn in_memory(config: NetworkConfig) -> Result<Self> {
        let store = SqliteStore::in_memory()?;
        Ok(Self::with_store(config, store))
    }

    fn with_store(config: NetworkConfig, store: SqliteStore) -> Self {
        let cache = Arc::new(MemoryCache::new());
        let relations_config = RelationsConfig {
            cache_ttl_secs: config.cache.relations_ttl_secs,
        };
        let relations = ContentRelations::new(Arc::new(store), relations_config)
            .with_cache(cache.clone());

        Self {
            network: Arc::new(StaticNetwork::from_config(&config)),
            relations: Arc::new(relations),
            cache,
            config,
        }
    }

    /// Translation assembler wired to the built-in resolvers.
    pub fn assembler(&self) -> TranslationAssembler<SqliteStore> {
        let registry = ResolverRegistry::with_defaults(self.network.clone());
        TranslationAssembler::new(
            self.relations.clone(),
            self.network.clone(),
            self.network.clone(),
            registry,
            self.config.cache.clone(),
        )
        .with_cache(self.cache.clone())
    }
}

/// Parse a site id argument.
pub(crate) fn site_id(value: u64) -> Result<SiteId> {
    SiteId::new(value).map_err(|e| CliError::InvalidInput(e.to_string()))
}

/// Parse a relation type argument.
pub(crate) fn relation_type(value: &str) -> Result<RelationType> {
    RelationType::new(value).map_err(|e| CliError::InvalidInput(e.to_string()))
}

/// Build the request context described by the shared request options.
pub(crate) fn request_context(args: &RequestArgs) -> Result<RequestContext> {
    let request_type: RequestType = args
        .request_type
        .parse()
        .map_err(|_| CliError::InvalidInput(args.request_type.clone()))?;

    let mut context =
        RequestContext::new(site_id(args.site)?, request_type).with_content(args.content);
    if let Some(post_type) = &args.post_type {
        context = context.with_post_type(post_type.clone());
    }
    if let Some(term) = &args.search {
        context = context.with_search_term(term.clone());
    }
    Ok(context)
}
