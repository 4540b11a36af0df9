//! Command line argument parsing for the Vallu CLI using clap.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Vallu - semantic search over a couplet corpus
#[derive(Parser, Debug, Clone)]
#[command(name = "vallu")]
#[command(about = "Semantic search over a couplet corpus")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct ValluArgs {
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

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl ValluArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Search the corpus (item number, preset question or free text)
    Search(SearchArgs),

    /// Load the corpus and report on its embeddings
    Stats(StatsArgs),

    /// Decode a single embedding blob
    Decode(DecodeArgs),

    /// Show the items related to one item
    Related(RelatedArgs),

    /// List the preset questions
    Presets(PresetsArgs),
}

/// Arguments for searching
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Corpus rows file (JSON array or JSON lines)
    #[arg(value_name = "ROWS")]
    pub rows_path: PathBuf,

    /// Query string
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Maximum number of results to return (default from configuration)
    #[arg(short = 'n', long)]
    pub top_n: Option<usize>,

    /// Engine configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Embedding service API key
    #[arg(long, env = "VALLU_OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

/// Arguments for corpus statistics
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    /// Corpus rows file (JSON array or JSON lines)
    #[arg(value_name = "ROWS")]
    pub rows_path: PathBuf,

    /// List every skipped row with its reason
    #[arg(long)]
    pub skipped: bool,
}

/// Arguments for decoding a blob
#[derive(Parser, Debug, Clone)]
pub struct DecodeArgs {
    /// Embedding blob, e.g. "Optional(x'0000803f')"
    #[arg(value_name = "BLOB")]
    pub blob: String,
}

/// Arguments for related items
#[derive(Parser, Debug, Clone)]
pub struct RelatedArgs {
    /// Corpus rows file (JSON array or JSON lines)
    #[arg(value_name = "ROWS")]
    pub rows_path: PathBuf,

    /// Item number
    #[arg(value_name = "ID")]
    pub id: i64,
}

/// Arguments for listing presets
#[derive(Parser, Debug, Clone)]
pub struct PresetsArgs {
    /// Only show this category
    #[arg(long)]
    pub category: Option<String>,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
