//! `render` command: one markdown file to one HTML fragment.

use std::path::Path;

use anyhow::{Context, Result};

use crate::config::NotesConfig;
use crate::debug;
use crate::render::ArticleRenderer;
use crate::typeset::TypesetBridge;

/// Render a single article. No path means nothing to do, which is not an
/// error. The fragment goes to `output` when given, stdout otherwise.
pub fn render_article(
    config: &NotesConfig,
    path: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let Some(path) = path else {
        debug!("render"; "no source path given, nothing to render");
        return Ok(());
    };

    let bridge = TypesetBridge::new(config.typeset.clone());
    let renderer = ArticleRenderer::new(&bridge);
    let html = renderer.render_path(path);

    match output {
        Some(target) => std::fs::write(target, html)
            .with_context(|| format!("could not write `{}`", target.display()))?,
        None => println!("{html}"),
    }
    Ok(())
}
