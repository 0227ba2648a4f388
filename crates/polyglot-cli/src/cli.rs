//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Polyglot CLI - Manage translation relations across a network of sites.
#[derive(Debug, Parser)]
#[command(name = "polyglot")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Network configuration file path
    #[arg(short, long, global = true, env = "POLYGLOT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database path, overriding the configuration
    #[arg(short, long, global = true, env = "POLYGLOT_DATABASE")]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (ids and URLs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the site relation graph
    Sites(SitesArgs),

    /// Manage content translation groups
    Content(ContentArgs),

    /// List the translations of a request
    Translations(TranslationsArgs),

    /// Pick a redirect target from an Accept-Language header
    Negotiate(NegotiateArgs),

    /// Show how an Accept-Language header is parsed
    ParseHeader {
        /// Raw header value
        header: String,
    },

    /// Manage the network configuration file
    Config(ConfigArgs),
}

/// Arguments for site graph management.
#[derive(Debug, Parser)]
pub struct SitesArgs {
    #[command(subcommand)]
    pub action: SitesAction,
}

/// Site graph actions.
#[derive(Debug, Subcommand)]
pub enum SitesAction {
    /// List configured sites with their language and related sites
    List,

    /// Connect a site to one or more other sites
    Link {
        /// Base site
        site: u64,
        /// Sites to connect
        #[arg(required = true)]
        others: Vec<u64>,
    },

    /// Disconnect a site from one site, or from all when none is given
    Unlink {
        /// Base site
        site: u64,
        /// Site to disconnect
        other: Option<u64>,
    },

    /// Show the sites related to a site
    Related {
        /// Site id
        site: u64,
    },

    /// Remove a site from the network together with its content relations
    Remove {
        /// Site id
        site: u64,
    },

    /// Give a new site the relations of an existing one
    Duplicate {
        /// Site to copy from
        source: u64,
        /// Newly created site
        target: u64,
    },
}

/// Arguments for content relation management.
#[derive(Debug, Parser)]
pub struct ContentArgs {
    #[command(subcommand)]
    pub action: ContentAction,
}

/// Relation type option shared by content commands.
#[derive(Debug, Clone, Args)]
pub struct TypeArg {
    /// Relation type ("post", "term" or a custom type)
    #[arg(short = 't', long = "type", default_value = "post")]
    pub relation_type: String,
}

/// Content relation actions.
#[derive(Debug, Subcommand)]
pub enum ContentAction {
    /// Show the translation group of an item
    Show {
        /// Site id
        site: u64,
        /// Content id
        content: u64,
        #[command(flatten)]
        kind: TypeArg,
    },

    /// Relate an item to its counterpart on another site; content 0 unlinks
    Link {
        /// Source site
        source_site: u64,
        /// Source content id
        source_content: u64,
        /// Target site
        target_site: u64,
        /// Target content id
        target_content: u64,
        #[command(flatten)]
        kind: TypeArg,
    },

    /// Remove one counterpart from an item's translation group
    Unlink {
        /// Source site
        source_site: u64,
        /// Source content id
        source_content: u64,
        /// Target site
        target_site: u64,
        /// Target content id
        target_content: u64,
        #[command(flatten)]
        kind: TypeArg,
    },

    /// Relate every listed id on one site to the same id on another
    RelateAll {
        /// Site holding the originals
        source: u64,
        /// Site holding identical copies
        target: u64,
        /// Content ids to relate
        #[arg(required = true)]
        ids: Vec<u64>,
        #[command(flatten)]
        kind: TypeArg,
    },

    /// Check whether a site holds any content relation
    Has {
        /// Site id
        site: u64,
        /// Restrict to one relation type
        #[arg(short = 't', long = "type")]
        relation_type: Option<String>,
    },
}

/// Request options shared by translations and negotiate.
#[derive(Debug, Clone, Args)]
pub struct RequestArgs {
    /// Site of the request
    pub site: u64,

    /// Content id of the request (0 for none)
    #[arg(default_value = "0")]
    pub content: u64,

    /// Request type (singular, term-archive, post-type-archive, search, front-page or custom)
    #[arg(short = 'r', long, default_value = "singular")]
    pub request_type: String,

    /// Post type of an archive request
    #[arg(long)]
    pub post_type: Option<String>,

    /// Term of a search request
    #[arg(long)]
    pub search: Option<String>,
}

/// Arguments for the translations command.
#[derive(Debug, Parser)]
pub struct TranslationsArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    /// Include the request's own site
    #[arg(long)]
    pub include_base: bool,

    /// Only list sites with an explicit relation
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the negotiate command.
#[derive(Debug, Parser)]
pub struct NegotiateArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    /// Accept-Language header of the visitor
    #[arg(short, long)]
    pub accept: String,

    /// Visitor opted out of redirects
    #[arg(long)]
    pub noredirect: bool,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the active configuration
    Show,

    /// Write an example configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file path
    Path,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
