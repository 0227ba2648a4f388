//! Configuration management for the CLI.
//!
//! The network file describes every site (home URL, name, language) plus the
//! database location and tuning for negotiation and caching.

use crate::error::{CliError, Result};
use polyglot_domain::{Language, SiteId};
use polyglot_negotiator::NegotiationConfig;
use polyglot_translations::AssemblerConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// SQLite database holding the relations
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Accept-Language negotiation
    #[serde(default)]
    pub negotiation: NegotiationConfig,

    /// Translation and relation caching
    #[serde(default)]
    pub cache: AssemblerConfig,

    /// Output settings
    #[serde(default)]
    pub settings: Settings,

    /// Sites of the network
    #[serde(default)]
    pub sites: Vec<SiteConfig>,
}

/// One site of the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site id
    pub id: SiteId,

    /// Front page URL, with trailing slash
    pub home_url: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Whether the site is live
    #[serde(default = "default_true")]
    pub live: bool,

    /// Base URL of flag icons; `<base>/<iso code>.png`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags_url: Option<String>,

    /// Language settings; sites without them get no translations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl NetworkConfig {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| CliError::Config("Could not find config directory".into()))?;
        Ok(base.join("polyglot").join("network.toml"))
    }

    /// Load configuration from `path`, or the default path.
    ///
    /// A missing file yields the default configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };

        if !path.exists() {
            warn!(path = %path.display(), "Network config not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)?;
        let config: NetworkConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Reject inconsistent settings.
    pub fn validate(&self) -> Result<()> {
        self.negotiation
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;
        self.cache
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;

        let mut seen = BTreeSet::new();
        for site in &self.sites {
            if !seen.insert(site.id) {
                return Err(CliError::Config(format!("Site {} is defined twice", site.id)));
            }
            if site.home_url.is_empty() {
                return Err(CliError::Config(format!("Site {} has no home_url", site.id)));
            }
        }
        Ok(())
    }

    /// Configuration of one site.
    pub fn site(&self, id: SiteId) -> Option<&SiteConfig> {
        self.sites.iter().find(|site| site.id == id)
    }

    /// A two-site example network, written by `config init`.
    pub fn example() -> Self {
        let site = |id: u64| SiteId::new(id).map_err(|e| CliError::Config(e.to_string()));
        let sites = match (site(1), site(2)) {
            (Ok(en), Ok(de)) => vec![
                SiteConfig {
                    id: en,
                    home_url: "https://example.com/".to_string(),
                    name: "Example".to_string(),
                    live: true,
                    flags_url: None,
                    language: Some(Language::new("en-US", "English", "English")),
                },
                SiteConfig {
                    id: de,
                    home_url: "https://example.com/de/".to_string(),
                    name: "Beispiel".to_string(),
                    live: true,
                    flags_url: None,
                    language: Some(Language::new("de-DE", "Deutsch", "German")),
                },
            ],
            _ => Vec::new(),
        };

        Self {
            sites,
            ..Self::default()
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            negotiation: NegotiationConfig::default(),
            cache: AssemblerConfig::default(),
            settings: Settings::default(),
            sites: Vec::new(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("polyglot").join("polyglot.db"))
        .unwrap_or_else(|| PathBuf::from("polyglot.db"))
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
