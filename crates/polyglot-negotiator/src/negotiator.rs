//! Selection of the best translation for a visitor

use crate::accept_language::{parse_accept_language, AcceptLanguages};
use crate::NegotiationConfig;
use polyglot_domain::{RedirectTarget, Translation, TranslationMap};
use tracing::debug;

/// Scores translations against visitor languages
///
/// A candidate's score is the site's language priority times the visitor's
/// priority for that language. The visitor priority comes from an exact HTTP
/// code match, or else from a bare language match scaled by
/// [`NegotiationConfig::language_only_factor`].
#[derive(Debug, Clone, Default)]
pub struct Negotiator {
    config: NegotiationConfig,
}

impl Negotiator {
    /// Create a negotiator with the given configuration
    pub fn new(config: NegotiationConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &NegotiationConfig {
        &self.config
    }

    /// Parse `header` and select the best translation
    pub fn negotiate(&self, header: &str, translations: &TranslationMap) -> Option<RedirectTarget> {
        self.select_best_target(translations, &parse_accept_language(header))
    }

    /// The highest scoring translation; ties keep the first in map order
    ///
    /// # Examples
    ///
    /// ```
    /// use polyglot_domain::{Language, RelationType, SiteId, Translation, TranslationMap};
    /// use polyglot_negotiator::{parse_accept_language, Negotiator};
    ///
    /// fn translation(site: u64, language: Language) -> Translation {
    ///     Translation {
    ///         source_site_id: SiteId::new(9).unwrap(),
    ///         target_site_id: SiteId::new(site).unwrap(),
    ///         target_content_id: 0,
    ///         relation_type: RelationType::POST,
    ///         remote_url: format!("https://site{}.example/", site),
    ///         remote_title: String::new(),
    ///         language,
    ///         icon_url: None,
    ///     }
    /// }
    ///
    /// let mut translations = TranslationMap::new();
    /// let de = Language::new("de", "Deutsch", "German").with_priority(5);
    /// let fr = Language::new("fr", "Français", "French").with_priority(10);
    /// translations.insert(SiteId::new(1).unwrap(), translation(1, de));
    /// translations.insert(SiteId::new(2).unwrap(), translation(2, fr));
    ///
    /// let accept = parse_accept_language("fr, de;q=0.5");
    /// let target = Negotiator::default()
    ///     .select_best_target(&translations, &accept)
    ///     .unwrap();
    /// assert_eq!(target.site_id.value(), 2);
    /// assert_eq!(target.priority, 10.0);
    /// ```
    pub fn select_best_target(
        &self,
        translations: &TranslationMap,
        accept: &AcceptLanguages,
    ) -> Option<RedirectTarget> {
        let mut best: Option<RedirectTarget> = None;

        for candidate in self.score_candidates(translations, accept) {
            if best
                .as_ref()
                .is_none_or(|current| candidate.priority > current.priority)
            {
                best = Some(candidate);
            }
        }

        match &best {
            Some(target) => debug!(
                site = target.site_id.value(),
                language = %target.language,
                score = target.priority,
                "Selected redirect target"
            ),
            None => debug!("No translation matches the visitor's languages"),
        }
        best
    }

    /// Every translation the visitor accepts, scored, in map order
    pub fn score_candidates(
        &self,
        translations: &TranslationMap,
        accept: &AcceptLanguages,
    ) -> Vec<RedirectTarget> {
        let expanded = accept.expanded();

        translations
            .values()
            .filter(|translation| !translation.remote_url.is_empty())
            .filter_map(|translation| {
                let user_priority = self.user_priority(translation, &expanded);
                if user_priority <= 0.0 {
                    return None;
                }
                Some(RedirectTarget {
                    language: translation.language.http_code.clone(),
                    priority: f64::from(translation.language.priority) * user_priority,
                    site_id: translation.target_site_id,
                    content_id: translation.target_content_id,
                    url: translation.remote_url.clone(),
                })
            })
            .collect()
    }

    fn user_priority(&self, translation: &Translation, expanded: &AcceptLanguages) -> f64 {
        let language = &translation.language;
        if let Some(priority) = expanded.get(&language.http_code) {
            return priority;
        }

        expanded
            .get(&language.bare_code())
            .map(|priority| priority * self.config.factor())
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyglot_domain::{Language, RelationType, SiteId};

    fn translation(site: u64, language: Language) -> Translation {
        Translation {
            source_site_id: SiteId::new(99).unwrap(),
            target_site_id: SiteId::new(site).unwrap(),
            target_content_id: site * 10,
            relation_type: RelationType::POST,
            remote_url: format!("https://site{}.example/", site),
            remote_title: String::new(),
            language,
            icon_url: None,
        }
    }

    fn map(items: Vec<Translation>) -> TranslationMap {
        items
            .into_iter()
            .map(|translation| (translation.target_site_id, translation))
            .collect()
    }

    #[test]
    fn test_site_priority_times_user_priority() {
        let translations = map(vec![
            translation(1, Language::new("de", "Deutsch", "German").with_priority(5)),
            translation(2, Language::new("fr", "Français", "French").with_priority(10)),
        ]);

        let target = Negotiator::default()
            .negotiate("fr;q=1.0, de;q=0.5", &translations)
            .unwrap();
        assert_eq!(target.site_id.value(), 2);
        assert_eq!(target.priority, 10.0);
        assert_eq!(target.language, "fr");
        assert_eq!(target.content_id, 20);
        assert_eq!(target.url, "https://site2.example/");
    }

    #[test]
    fn test_bare_language_match_is_scaled() {
        let translations = map(vec![translation(
            1,
            Language::new("pt-BR", "Português", "Portuguese").with_priority(2),
        )]);

        let target = Negotiator::default()
            .negotiate("pt;q=1.0", &translations)
            .unwrap();
        assert!((target.priority - 2.0 * 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_exact_match_beats_bare_match() {
        let translations = map(vec![
            translation(1, Language::new("pt-PT", "Português", "Portuguese")),
            translation(2, Language::new("pt-BR", "Português", "Portuguese")),
        ]);

        let target = Negotiator::default()
            .negotiate("pt-BR", &translations)
            .unwrap();
        assert_eq!(target.site_id.value(), 2);
        assert_eq!(target.priority, 1.0);

        let scores = Negotiator::default()
            .score_candidates(&translations, &parse_accept_language("pt-BR"));
        assert_eq!(scores.len(), 2);
        assert!((scores[0].priority - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_exact_only_config_ignores_bare_matches() {
        let translations = map(vec![translation(
            1,
            Language::new("pt-BR", "Português", "Portuguese"),
        )]);

        let negotiator = Negotiator::new(NegotiationConfig::exact_only());
        assert!(negotiator.negotiate("pt", &translations).is_none());
    }

    #[test]
    fn test_ties_keep_first() {
        let translations = map(vec![
            translation(3, Language::new("en-GB", "English", "English")),
            translation(1, Language::new("en-US", "English", "English")),
        ]);

        let target = Negotiator::default().negotiate("en", &translations).unwrap();
        assert_eq!(target.site_id.value(), 1);
    }

    #[test]
    fn test_zero_priority_and_empty_url_are_dropped() {
        let mut without_url = translation(2, Language::new("fr", "Français", "French"));
        without_url.remote_url.clear();
        let translations = map(vec![
            translation(1, Language::new("de", "Deutsch", "German")),
            without_url,
        ]);

        assert!(Negotiator::default()
            .negotiate("de;q=0, fr", &translations)
            .is_none());
    }

    #[test]
    fn test_no_match() {
        let translations = map(vec![translation(
            1,
            Language::new("de", "Deutsch", "German"),
        )]);
        assert!(Negotiator::default().negotiate("ja", &translations).is_none());
        assert!(Negotiator::default().negotiate("", &translations).is_none());
        assert!(Negotiator::default()
            .negotiate("de", &TranslationMap::new())
            .is_none());
    }

    #[test]
    fn test_regional_header_matches_bare_site_language() {
        let translations = map(vec![translation(
            1,
            Language::new("de", "Deutsch", "German").with_priority(3),
        )]);

        // "de-AT" registers bare "de", which matches the site's code exactly
        let target = Negotiator::default()
            .negotiate("de-AT;q=0.5", &translations)
            .unwrap();
        assert_eq!(target.priority, 1.5);
    }
}
