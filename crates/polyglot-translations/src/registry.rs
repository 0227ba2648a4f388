//! Content resolver registry
//!
//! One resolver per request type. The first registration for a type wins;
//! later ones are rejected so conflicts surface regardless of startup order.

use crate::context::RequestType;
use crate::resolvers::{
    FrontPageResolver, NullResolver, PostTypeArchiveResolver, SearchResolver, SingularResolver,
    TermArchiveResolver,
};
use polyglot_domain::traits::{ContentResolver, SiteDirectory};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::warn;

/// Registry mapping request types to content resolvers
pub struct ResolverRegistry {
    resolvers: Arc<RwLock<HashMap<RequestType, Arc<dyn ContentResolver>>>>,
    fallback: Arc<dyn ContentResolver>,
}

impl ResolverRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            resolvers: Arc::new(RwLock::new(HashMap::new())),
            fallback: Arc::new(NullResolver),
        }
    }

    /// Create a registry with the built-in resolvers for every standard request type
    pub fn with_defaults(directory: Arc<dyn SiteDirectory>) -> Self {
        let registry = Self::new();
        registry.register(
            RequestType::Singular,
            Arc::new(SingularResolver::new(directory.clone())),
        );
        registry.register(
            RequestType::TermArchive,
            Arc::new(TermArchiveResolver::new(directory.clone())),
        );
        registry.register(
            RequestType::PostTypeArchive,
            Arc::new(PostTypeArchiveResolver::new(directory.clone())),
        );
        registry.register(
            RequestType::Search,
            Arc::new(SearchResolver::new(directory.clone())),
        );
        registry.register(
            RequestType::FrontPage,
            Arc::new(FrontPageResolver::new(directory)),
        );
        registry
    }

    /// Register a resolver; returns `false` when the type already has one
    pub fn register(&self, request_type: RequestType, resolver: Arc<dyn ContentResolver>) -> bool {
        let mut resolvers = self
            .resolvers
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if resolvers.contains_key(&request_type) {
            warn!(request_type = %request_type, "Content resolver already registered");
            return false;
        }

        resolvers.insert(request_type, resolver);
        true
    }

    /// Resolver for a request type; unregistered types get a [`NullResolver`]
    pub fn get(&self, request_type: &RequestType) -> Arc<dyn ContentResolver> {
        self.resolvers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(request_type)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }

    /// Whether a resolver is registered for the type
    pub fn is_registered(&self, request_type: &RequestType) -> bool {
        self.resolvers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(request_type)
    }

    /// Get resolver count
    pub fn resolver_count(&self) -> usize {
        self.resolvers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for ResolverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyglot_domain::traits::ResolveHints;
    use polyglot_domain::{ContentId, RemoteContent, SiteId};

    struct FixedResolver(&'static str);

    impl ContentResolver for FixedResolver {
        fn resolve_related(
            &self,
            _site: SiteId,
            _content_id: ContentId,
            _hints: &ResolveHints,
        ) -> Option<RemoteContent> {
            Some(RemoteContent::new(self.0, ""))
        }

        fn resolve_unrelated(&self, _site: SiteId, _hints: &ResolveHints) -> Option<RemoteContent> {
            Some(RemoteContent::new(self.0, ""))
        }
    }

    fn resolve(registry: &ResolverRegistry, request_type: &RequestType) -> Option<String> {
        registry
            .get(request_type)
            .resolve_unrelated(SiteId::new(1).unwrap(), &ResolveHints::default())
            .map(|remote| remote.url)
    }

    #[test]
    fn test_new_registry() {
        let registry = ResolverRegistry::new();
        assert_eq!(registry.resolver_count(), 0);
        assert!(!registry.is_registered(&RequestType::Singular));
    }

    #[test]
    fn test_register_resolver() {
        let registry = ResolverRegistry::new();
        let event = RequestType::Other("event".into());

        assert!(registry.register(event.clone(), Arc::new(FixedResolver("first"))));
        assert!(registry.is_registered(&event));
        assert_eq!(resolve(&registry, &event).as_deref(), Some("first"));
    }

    #[test]
    fn test_first_registration_wins() {
        let registry = ResolverRegistry::new();
        assert!(registry.register(RequestType::Search, Arc::new(FixedResolver("first"))));
        assert!(!registry.register(RequestType::Search, Arc::new(FixedResolver("second"))));

        assert_eq!(registry.resolver_count(), 1);
        assert_eq!(
            resolve(&registry, &RequestType::Search).as_deref(),
            Some("first")
        );
    }

    #[test]
    fn test_unregistered_type_uses_null_resolver() {
        let registry = ResolverRegistry::new();
        assert_eq!(resolve(&registry, &RequestType::FrontPage), None);
    }
}
