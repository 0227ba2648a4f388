//! Accept-Language negotiation commands.

use super::{request_context, App};
use crate::cli::NegotiateArgs;
use crate::error::Result;
use crate::output::Formatter;
use polyglot_negotiator::{parse_accept_language, Negotiator, Redirector};
use polyglot_translations::TranslationArgs;
use tracing::info;

/// Execute the negotiate command.
///
/// Candidates are the request's translations including the current site, so
/// a visitor already on the best site is not redirected.
pub fn execute_negotiate(args: NegotiateArgs, app: &App, formatter: &Formatter) -> Result<String> {
    let context = request_context(&args.request)?.with_noredirect(args.noredirect);
    let translations = app
        .assembler()
        .get_translations(&context, TranslationArgs::new().include_base(true))?;

    let redirector = Redirector::new(Negotiator::new(app.config.negotiation.clone()));
    let target = redirector.redirect_target(&context, &args.accept, &translations);
    if let Some(target) = &target {
        info!(
            from = context.site_id.value(),
            to = target.site_id.value(),
            url = %target.url,
            "Redirecting visitor"
        );
    }
    formatter.format_redirect(target.as_ref())
}

/// Execute the parse-header command.
pub fn execute_parse_header(header: &str, formatter: &Formatter) -> Result<String> {
    formatter.format_accept_languages(&parse_accept_language(header))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::RequestArgs;
    use crate::commands::site_id;
    use crate::commands::test_support::app;
    use crate::config::OutputFormat;
    use polyglot_domain::traits::RelationStore;
    use polyglot_domain::RelationType;

    fn quiet() -> Formatter {
        Formatter::new(OutputFormat::Quiet, false)
    }

    fn negotiate(app: &App, site: u64, content: u64, accept: &str, noredirect: bool) -> String {
        let args = NegotiateArgs {
            request: RequestArgs {
                site,
                content,
                request_type: "singular".to_string(),
                post_type: None,
                search: None,
            },
            accept: accept.to_string(),
            noredirect,
        };
        execute_negotiate(args, app, &quiet()).unwrap()
    }

    fn networked_app() -> App {
        let app = app();
        app.relations
            .store()
            .set_relations(site_id(1).unwrap(), &[site_id(2).unwrap(), site_id(3).unwrap()])
            .unwrap();
        app.relations
            .set_relation(
                site_id(1).unwrap(),
                site_id(2).unwrap(),
                10,
                20,
                &RelationType::POST,
            )
            .unwrap();
        app
    }

    #[test]
    fn test_redirects_to_preferred_language() {
        let app = networked_app();
        assert_eq!(
            negotiate(&app, 1, 10, "de-CH, de;q=0.9, en;q=0.5", false),
            "https://example.com/de/?p=20"
        );
    }

    #[test]
    fn test_bare_language_reaches_regional_site() {
        let app = networked_app();
        assert_eq!(
            negotiate(&app, 1, 10, "fr", false),
            "https://example.com/fr/"
        );
    }

    #[test]
    fn test_stays_on_current_site() {
        let app = networked_app();
        assert_eq!(negotiate(&app, 1, 10, "en-US,de;q=0.5", false), "");
    }

    #[test]
    fn test_noredirect() {
        let app = networked_app();
        assert_eq!(negotiate(&app, 1, 10, "de-DE", true), "");
    }

    #[test]
    fn test_parse_header_quiet() {
        let output = execute_parse_header("da, en-GB;q=0.8, en;q=0.7", &quiet()).unwrap();
        assert_eq!(output, "da\nen-GB\nen");
    }
}
