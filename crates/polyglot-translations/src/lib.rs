//! Polyglot Translations
//!
//! Assembles the translation set of a request: for every related site with
//! language settings, the URL and title of that site's version of the
//! requested page.
//!
//! ## Flow
//!
//! 1. [`TranslationArgs`] are normalized against the explicit [`RequestContext`]
//!    and passed through registered argument overrides
//! 2. The typed cache key of the normalized arguments, tagged with the source
//!    item's relation generation, is looked up; relation writes bump the
//!    generation, so they retire earlier entries at once
//! 3. On a miss, related sites and the translation group are read, each site is
//!    resolved through the [`ResolverRegistry`] and decorated with its language
//! 4. Post-processors run, the result is cached with the configured TTL
//!
//! Unregistered request types resolve through a [`NullResolver`].

#![warn(missing_docs)]

pub mod assembler;
pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod hooks;
pub mod registry;
pub mod resolvers;

pub use assembler::TranslationAssembler;
pub use cache::{CacheStats, MemoryCache};
pub use config::AssemblerConfig;
pub use context::{
    RequestContext, RequestType, ResolvedArgs, TranslationArgs, TRANSLATIONS_CACHE_NAMESPACE,
};
pub use error::TranslationError;
pub use hooks::{ArgsOverride, Hooks, PostProcessor};
pub use registry::ResolverRegistry;
pub use resolvers::{
    FrontPageResolver, NullResolver, PostTypeArchiveResolver, SearchResolver, SingularResolver,
    TermArchiveResolver,
};
