//! Econotes - a markdown article renderer for economics notes sites.

mod cli;
mod config;
mod dom;
mod logger;
mod render;
mod store;
mod typeset;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::NotesConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    logger::set_verbose(cli.verbose);

    let config = NotesConfig::load(&cli)?;

    match &cli.command {
        Commands::Render { path, output } => {
            cli::render::render_article(&config, path.as_deref(), output.as_deref())
        }
        Commands::Build => cli::build::build_articles(&config),
        Commands::Query { args } => cli::query::query_articles(&config, args),
    }
}
