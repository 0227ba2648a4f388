//! Typed extension points of the assembler
//!
//! Hooks are registered once at startup and run in registration order.

use crate::context::{RequestContext, ResolvedArgs};
use polyglot_domain::TranslationMap;

/// Adjusts normalized arguments before the cache lookup
pub type ArgsOverride = Box<dyn Fn(&RequestContext, &mut ResolvedArgs) + Send + Sync>;

/// Rewrites an assembled translation set before it is cached
pub type PostProcessor = Box<dyn Fn(&ResolvedArgs, TranslationMap) -> TranslationMap + Send + Sync>;

/// Ordered hook lists
#[derive(Default)]
pub struct Hooks {
    args_overrides: Vec<ArgsOverride>,
    post_processors: Vec<PostProcessor>,
}

impl Hooks {
    /// No hooks
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an argument override
    pub fn add_args_override<F>(&mut self, hook: F)
    where
        F: Fn(&RequestContext, &mut ResolvedArgs) + Send + Sync + 'static,
    {
        self.args_overrides.push(Box::new(hook));
    }

    /// Append a post-processor
    pub fn add_post_processor<F>(&mut self, hook: F)
    where
        F: Fn(&ResolvedArgs, TranslationMap) -> TranslationMap + Send + Sync + 'static,
    {
        self.post_processors.push(Box::new(hook));
    }

    pub(crate) fn apply_args_overrides(&self, context: &RequestContext, args: &mut ResolvedArgs) {
        for hook in &self.args_overrides {
            hook(context, args);
        }
    }

    pub(crate) fn apply_post_processors(
        &self,
        args: &ResolvedArgs,
        translations: TranslationMap,
    ) -> TranslationMap {
        self.post_processors
            .iter()
            .fold(translations, |translations, hook| hook(args, translations))
    }

    /// Number of registered hooks of both kinds
    pub fn len(&self) -> usize {
        self.args_overrides.len() + self.post_processors.len()
    }

    /// Whether no hook is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("args_overrides", &self.args_overrides.len())
            .field("post_processors", &self.post_processors.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TranslationArgs;
    use polyglot_domain::SiteId;

    fn context() -> RequestContext {
        RequestContext::singular(SiteId::new(1).unwrap(), 10)
    }

    #[test]
    fn test_overrides_run_in_order() {
        let mut hooks = Hooks::new();
        hooks.add_args_override(|_, args| args.content_id += 1);
        hooks.add_args_override(|_, args| args.content_id *= 2);

        let context = context();
        let mut args = TranslationArgs::new().resolve(&context);
        hooks.apply_args_overrides(&context, &mut args);
        assert_eq!(args.content_id, 22);
    }

    #[test]
    fn test_post_processors_chain() {
        let mut hooks = Hooks::new();
        hooks.add_post_processor(|_, mut map| {
            map.clear();
            map
        });
        assert_eq!(hooks.len(), 1);

        let context = context();
        let args = TranslationArgs::new().resolve(&context);
        let result = hooks.apply_post_processors(&args, TranslationMap::new());
        assert!(result.is_empty());
    }
}
