//! Site relation graph commands.

use super::{site_id, App};
use crate::cli::{SitesAction, SitesArgs};
use crate::error::{CliError, Result};
use crate::output::{Formatter, SiteRow};
use polyglot_domain::traits::RelationStore;
use polyglot_domain::SiteId;

/// Execute a sites subcommand.
pub fn execute_sites(args: SitesArgs, app: &App, formatter: &Formatter) -> Result<String> {
    let store = app.relations.store();

    match args.action {
        SitesAction::List => {
            let mut rows = Vec::new();
            for site in &app.config.sites {
                rows.push(SiteRow {
                    id: site.id,
                    name: site.name.clone(),
                    language: site.language.as_ref().map(|l| l.http_code.clone()),
                    home_url: site.home_url.clone(),
                    live: site.live,
                    related: store.related_sites(site.id)?,
                });
            }
            formatter.format_sites(&rows)
        }
        SitesAction::Link { site, others } => {
            let base = site_id(site)?;
            let others = others
                .into_iter()
                .map(site_id)
                .collect::<Result<Vec<SiteId>>>()?;
            let created = store.set_relations(base, &others)?;
            Ok(formatter.count_result("Linked", created, "site relation"))
        }
        SitesAction::Unlink { site, other } => {
            let other = other.map(site_id).transpose()?;
            let removed = store.delete_relations(site_id(site)?, other)?;
            Ok(formatter.count_result("Unlinked", removed, "site relation"))
        }
        SitesAction::Related { site } => {
            let site = site_id(site)?;
            let related = store.related_sites(site)?;
            formatter.format_related(site, &related)
        }
        SitesAction::Remove { site } => {
            let rows = app.relations.delete_all_for_site(site_id(site)?)?;
            Ok(formatter.count_result("Removed", rows, "content relation"))
        }
        SitesAction::Duplicate { source, target } => {
            let (source, target) = (site_id(source)?, site_id(target)?);
            if source == target {
                return Err(CliError::InvalidInput(
                    "Source and target site must differ".to_string(),
                ));
            }
            let rows = app.relations.duplicate_relations(source, target)?;
            Ok(formatter.count_result("Copied", rows, "content relation"))
        }
    }
}
