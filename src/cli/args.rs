//! Command line argument parsing for the harf CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Harf - diacritic-insensitive Arabic search and highlighting
#[derive(Parser, Debug, Clone)]
#[command(name = "harf")]
#[command(about = "Diacritic-insensitive Arabic normalization, matching and highlighting")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct HarfArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Highlight configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE", env = "HARF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl HarfArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the normalized form of a text
    Normalize(NormalizeArgs),

    /// Highlight every match of one or more queries
    Highlight(HighlightArgs),

    /// Print the byte spans of every match
    Find(FindArgs),

    /// Filter a list of named entries by name or number
    Lookup(LookupArgs),

    /// Cut a highlighted excerpt around the first match
    Snippet(SnippetArgs),
}

/// Arguments for normalizing text
#[derive(Parser, Debug, Clone)]
pub struct NormalizeArgs {
    /// Text to normalize, or "-" to read stdin
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Compose decomposed sequences (NFC) before normalizing
    #[arg(long)]
    pub nfc: bool,

    /// Keep diacritics
    #[arg(long)]
    pub keep_diacritics: bool,

    /// Keep tatweel
    #[arg(long)]
    pub keep_tatweel: bool,
}

/// Arguments for highlighting
#[derive(Parser, Debug, Clone)]
pub struct HighlightArgs {
    /// Text to highlight, or "-" to read stdin
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Queries to highlight; several queries are highlighted together
    #[arg(value_name = "QUERY", required = true)]
    pub queries: Vec<String>,

    /// HTML tag used for marks
    #[arg(long)]
    pub tag: Option<String>,

    /// CSS class put on the mark tag
    #[arg(long)]
    pub css_class: Option<String>,

    /// Omit the class attribute
    #[arg(long, conflicts_with = "css_class")]
    pub no_css_class: bool,

    /// Literal start marker (overrides --tag)
    #[arg(long, requires = "end")]
    pub start: Option<String>,

    /// Literal end marker (overrides --tag)
    #[arg(long, requires = "start")]
    pub end: Option<String>,
}

/// Arguments for finding match spans
#[derive(Parser, Debug, Clone)]
pub struct FindArgs {
    /// Text to search, or "-" to read stdin
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Query string
    #[arg(value_name = "QUERY")]
    pub query: String,
}

/// Arguments for filtering entries
#[derive(Parser, Debug, Clone)]
pub struct LookupArgs {
    /// Name fragment or number
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Entries file: a JSON array of {"order": n, "name": "..."}
    #[arg(short, long, value_name = "ENTRIES_FILE")]
    pub entries: PathBuf,

    /// Maximum number of entries to print
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for cutting snippets
#[derive(Parser, Debug, Clone)]
pub struct SnippetArgs {
    /// Text to excerpt, or "-" to read stdin
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Query string
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Snippet length in grapheme clusters
    #[arg(
        short = 'n',
        long,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub max_length: Option<usize>,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
