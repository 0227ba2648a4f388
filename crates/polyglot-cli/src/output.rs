//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use polyglot_domain::{ContentId, RedirectTarget, SiteId, TranslationMap};
use polyglot_negotiator::AcceptLanguages;
use serde::Serialize;
use std::collections::BTreeMap;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// One row of the site listing.
#[derive(Debug, Clone, Serialize)]
pub struct SiteRow {
    /// Site id
    pub id: SiteId,
    /// Display name
    pub name: String,
    /// HTTP language code, if configured
    pub language: Option<String>,
    /// Front page URL
    pub home_url: String,
    /// Whether the site is live
    pub live: bool,
    /// Related sites
    pub related: Vec<SiteId>,
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Active output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format the site listing.
    pub fn format_sites(&self, sites: &[SiteRow]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(sites)?),
            OutputFormat::Quiet => Ok(join_ids(sites.iter().map(|site| site.id))),
            OutputFormat::Table => {
                if sites.is_empty() {
                    return Ok(self.colorize("No sites configured.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Name", "Language", "Home", "Live", "Related"]);
                for site in sites {
                    builder.push_record([
                        site.id.to_string(),
                        site.name.clone(),
                        site.language.clone().unwrap_or_else(|| "-".to_string()),
                        site.home_url.clone(),
                        if site.live { "yes" } else { "no" }.to_string(),
                        join_list(site.related.iter()),
                    ]);
                }
                Ok(self.render(builder))
            }
        }
    }

    /// Format the sites related to `site`.
    pub fn format_related(&self, site: SiteId, related: &[SiteId]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "site_id": site,
                "related": related,
            }))?),
            OutputFormat::Quiet => Ok(join_ids(related.iter().copied())),
            OutputFormat::Table => {
                if related.is_empty() {
                    return Ok(self.colorize(
                        &format!("Site {} is not connected to any site.", site),
                        "yellow",
                    ));
                }
                Ok(format!(
                    "Site {} is related to: {}",
                    site,
                    join_list(related.iter())
                ))
            }
        }
    }

    /// Format a translation group, one row per site.
    pub fn format_group(&self, group: &BTreeMap<SiteId, ContentId>) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let members: Vec<_> = group
                    .iter()
                    .map(|(site, content)| {
                        serde_json::json!({ "site_id": site, "content_id": content })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&members)?)
            }
            OutputFormat::Quiet => Ok(group
                .iter()
                .map(|(site, content)| format!("{}:{}", site, content))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if group.is_empty() {
                    return Ok(self.colorize("No translations related.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Site", "Content"]);
                for (site, content) in group {
                    builder.push_record([site.to_string(), content.to_string()]);
                }
                Ok(self.render(builder))
            }
        }
    }

    /// Format assembled translations.
    pub fn format_translations(&self, translations: &TranslationMap) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let list: Vec<_> = translations.values().collect();
                Ok(serde_json::to_string_pretty(&list)?)
            }
            OutputFormat::Quiet => Ok(translations
                .values()
                .map(|translation| translation.remote_url.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if translations.is_empty() {
                    return Ok(self.colorize("No translations found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Site", "Language", "Content", "Title", "URL"]);
                for translation in translations.values() {
                    builder.push_record([
                        translation.target_site_id.to_string(),
                        translation.language.http_code.clone(),
                        translation.target_content_id.to_string(),
                        translation.remote_title.clone(),
                        translation.remote_url.clone(),
                    ]);
                }
                Ok(self.render(builder))
            }
        }
    }

    /// Format the negotiation outcome.
    pub fn format_redirect(&self, target: Option<&RedirectTarget>) -> Result<String> {
        match (self.format, target) {
            (OutputFormat::Json, target) => Ok(serde_json::to_string_pretty(&target)?),
            (OutputFormat::Quiet, Some(target)) => Ok(target.url.clone()),
            (OutputFormat::Quiet, None) => Ok(String::new()),
            (OutputFormat::Table, Some(target)) => Ok(self.success(&format!(
                "Redirect to site {} ({}, score {:.2}): {}",
                target.site_id, target.language, target.priority, target.url
            ))),
            (OutputFormat::Table, None) => Ok(self.info("No redirect")),
        }
    }

    /// Format a parsed Accept-Language header.
    pub fn format_accept_languages(&self, accept: &AcceptLanguages) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let map: serde_json::Map<String, serde_json::Value> = accept
                    .iter()
                    .map(|(tag, priority)| (tag.to_string(), serde_json::json!(priority)))
                    .collect();
                Ok(serde_json::to_string_pretty(&map)?)
            }
            OutputFormat::Quiet => Ok(accept
                .iter()
                .map(|(tag, _)| tag)
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if accept.is_empty() {
                    return Ok(self.colorize("No languages accepted.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Language", "Priority"]);
                for (tag, priority) in accept.iter() {
                    builder.push_record([tag.to_string(), format!("{:.3}", priority)]);
                }
                Ok(self.render(builder))
            }
        }
    }

    /// Format a count of changed records.
    pub fn count_result(&self, operation: &str, count: usize, noun: &str) -> String {
        match self.format {
            OutputFormat::Json => serde_json::json!({ "operation": operation, "count": count })
                .to_string(),
            OutputFormat::Quiet => count.to_string(),
            OutputFormat::Table => self.success(&format!("{} {} {}(s)", operation, count, noun)),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn render(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn join_ids(ids: impl Iterator<Item = SiteId>) -> String {
    ids.map(|id| id.to_string()).collect::<Vec<_>>().join("\n")
}

fn join_list<'a>(ids: impl Iterator<Item = &'a SiteId>) -> String {
    ids.map(|id| id.to_string()).collect::<Vec<_>>().join(", ")
}
