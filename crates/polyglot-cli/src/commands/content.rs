//! Content relation commands.

use super::{relation_type, site_id, App};
use crate::cli::{ContentAction, ContentArgs};
use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::Formatter;

/// Execute a content subcommand.
pub fn execute_content(args: ContentArgs, app: &App, formatter: &Formatter) -> Result<String> {
    let relations = &app.relations;

    match args.action {
        ContentAction::Show {
            site,
            content,
            kind,
        } => {
            let kind = relation_type(&kind.relation_type)?;
            let group = relations.get_relations(site_id(site)?, content, &kind)?;
            formatter.format_group(&group)
        }
        ContentAction::Link {
            source_site,
            source_content,
            target_site,
            target_content,
            kind,
        } => {
            let written = relations.set_relation(
                site_id(source_site)?,
                site_id(target_site)?,
                source_content,
                target_content,
                &relation_type(&kind.relation_type)?,
            )?;
            Ok(if written {
                formatter.success("Relation saved")
            } else {
                formatter.info("Relation unchanged")
            })
        }
        ContentAction::Unlink {
            source_site,
            source_content,
            target_site,
            target_content,
            kind,
        } => {
            let removed = relations.delete_relation(
                site_id(source_site)?,
                site_id(target_site)?,
                source_content,
                target_content,
                &relation_type(&kind.relation_type)?,
            )?;
            Ok(formatter.count_result("Deleted", removed, "row"))
        }
        ContentAction::RelateAll {
            source,
            target,
            ids,
            kind,
        } => {
            let written = relations.relate_all_content_of_type(
                site_id(source)?,
                site_id(target)?,
                &relation_type(&kind.relation_type)?,
                ids,
            )?;
            Ok(formatter.count_result("Related", written, "item"))
        }
        ContentAction::Has {
            site,
            relation_type: kind,
        } => {
            let kind = kind.as_deref().map(relation_type).transpose()?;
            let has = relations.has_site_relations(site_id(site)?, kind.as_ref())?;
            Ok(match has_relations_output(formatter, has) {
                Some(text) => text,
                None if has => formatter.success(&format!("Site {} has content relations", site)),
                None => formatter.info(&format!("Site {} has no content relations", site)),
            })
        }
    }
}

fn has_relations_output(formatter: &Formatter, has: bool) -> Option<String> {
    match formatter.format() {
        OutputFormat::Json => Some(serde_json::json!({ "has_relations": has }).to_string()),
        OutputFormat::Quiet => Some(has.to_string()),
        OutputFormat::Table => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::TypeArg;
    use crate::commands::test_support::app;

    fn quiet() -> Formatter {
        Formatter::new(OutputFormat::Quiet, false)
    }

    fn kind(name: &str) -> TypeArg {
        TypeArg {
            relation_type: name.to_string(),
        }
    }

    fn run(action: ContentAction, app: &App) -> String {
        execute_content(ContentArgs { action }, app, &quiet()).unwrap()
    }

    fn link(app: &App, source: (u64, u64), target: (u64, u64), relation: &str) -> String {
        let formatter = Formatter::new(OutputFormat::Table, false);
        execute_content(
            ContentArgs {
                action: ContentAction::Link {
                    source_site: source.0,
                    source_content: source.1,
                    target_site: target.0,
                    target_content: target.1,
                    kind: kind(relation),
                },
            },
            app,
            &formatter,
        )
        .unwrap()
    }

    fn show(app: &App, site: u64, content: u64, relation: &str) -> String {
        run(
            ContentAction::Show {
                site,
                content,
                kind: kind(relation),
            },
            app,
        )
    }

    #[test]
    fn test_link_and_show_from_either_side() {
        let app = app();
        assert_eq!(link(&app, (1, 10), (2, 20), "post"), "✓ Relation saved");
        assert_eq!(link(&app, (2, 20), (1, 10), "post"), "ℹ Relation unchanged");
        link(&app, (2, 20), (3, 30), "post");

        assert_eq!(show(&app, 3, 30, "post"), "1:10\n2:20\n3:30");
        assert_eq!(show(&app, 1, 10, "term"), "");
    }

    #[test]
    fn test_unlink_last_counterpart_removes_group() {
        let app = app();
        link(&app, (1, 10), (2, 20), "post");
        let removed = run(
            ContentAction::Unlink {
                source_site: 1,
                source_content: 10,
                target_site: 2,
                target_content: 20,
                kind: kind("post"),
            },
            &app,
        );
        assert_eq!(removed, "2");
        assert_eq!(show(&app, 1, 10, "post"), "");
    }

    #[test]
    fn test_relate_all_and_has() {
        let app = app();
        let has = |site, relation: Option<&str>| {
            run(
                ContentAction::Has {
                    site,
                    relation_type: relation.map(str::to_string),
                },
                &app,
            )
        };
        assert_eq!(has(3, None), "false");

        let written = run(
            ContentAction::RelateAll {
                source: 1,
                target: 3,
                ids: vec![5, 0, 6],
                kind: kind("term"),
            },
            &app,
        );
        assert_eq!(written, "2");
        assert_eq!(show(&app, 3, 6, "term"), "1:6\n3:6");
        assert_eq!(has(3, None), "true");
        assert_eq!(has(3, Some("term")), "true");
        assert_eq!(has(3, Some("post")), "false");
    }

    #[test]
    fn test_invalid_relation_type() {
        let app = app();
        let result = execute_content(
            ContentArgs {
                action: ContentAction::Show {
                    site: 1,
                    content: 10,
                    kind: kind(""),
                },
            },
            &app,
            &quiet(),
        );
        assert!(result.is_err());
    }
}
