//! Redirect decision for an incoming request

use crate::Negotiator;
use polyglot_domain::{RedirectTarget, TranslationMap};
use polyglot_translations::RequestContext;
use tracing::debug;

/// Decides whether a visitor should be sent to another site
#[derive(Debug, Clone, Default)]
pub struct Redirector {
    negotiator: Negotiator,
}

impl Redirector {
    /// Create a redirector around a negotiator
    pub fn new(negotiator: Negotiator) -> Self {
        Self { negotiator }
    }

    /// The negotiation winner, if it is on a different site than the request
    ///
    /// Returns `None` when the visitor opted out of redirects, when nothing
    /// matches, or when the current site already is the best match.
    pub fn redirect_target(
        &self,
        context: &RequestContext,
        accept_language: &str,
        translations: &TranslationMap,
    ) -> Option<RedirectTarget> {
        if context.noredirect {
            debug!(site = context.site_id.value(), "Redirect disabled for request");
            return None;
        }

        let target = self.negotiator.negotiate(accept_language, translations)?;
        if target.site_id == context.site_id {
            debug!(site = context.site_id.value(), "Current site is the best match");
            return None;
        }
        Some(target)
    }
}
