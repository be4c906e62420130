//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Economics Notes article renderer CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: econotes.toml)
    #[arg(short = 'C', long, default_value = "econotes.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Article data file override (articles.json)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub data: Option<PathBuf>,

    /// Output directory override (relative to project root)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Render a single markdown article to an HTML fragment
    #[command(visible_alias = "r")]
    Render {
        /// Markdown source path. Omitting it is a no-op.
        #[arg(value_hint = clap::ValueHint::FilePath)]
        path: Option<PathBuf>,

        /// Write the fragment to a file instead of stdout
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Render every article in the metadata store
    #[command(visible_alias = "b")]
    Build,

    /// Query article metadata as JSON
    #[command(visible_alias = "q")]
    Query {
        #[command(flatten)]
        args: QueryArgs,
    },
}

/// Query command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct QueryArgs {
    /// Filter by category name or slug (`all` matches everything)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Filter by search term over title, description, category and tags
    #[arg(short, long)]
    pub search: Option<String>,

    /// List the store's categories instead of articles
    #[arg(long, conflicts_with_all = ["category", "search"])]
    pub categories: bool,

    /// Pretty-print JSON output
    #[arg(short, long)]
    pub pretty: bool,
}
