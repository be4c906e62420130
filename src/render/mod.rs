//! Article rendering pipeline.
//!
//! Raw markdown goes through the block parser, then the structural
//! enhancer, then (when the source carries math) the typesetting bridge.
//! Fetch failure degrades to a fixed fallback fragment; nothing in the
//! pipeline propagates an error past the entry points.

pub mod block;
pub mod enhance;
pub mod inline;
pub mod math;

use std::path::Path;

use crate::log;
use crate::typeset::TypesetBridge;

/// Fragment shown when an article body cannot be loaded.
pub const FALLBACK_HTML: &str = "<p>We could not load this article right now.</p>";

/// Renders article bodies against one typesetting bridge.
pub struct ArticleRenderer<'a> {
    bridge: &'a TypesetBridge,
}

impl<'a> ArticleRenderer<'a> {
    pub fn new(bridge: &'a TypesetBridge) -> Self {
        Self { bridge }
    }

    /// Render raw markdown to the final HTML fragment.
    pub fn render(&self, markdown: &str) -> String {
        let html = block::markdown_to_html(markdown);
        let html = enhance::enhance(&html);
        self.bridge.typeset(&html, markdown)
    }

    /// Fetch an article body and render it. A failed read logs the error
    /// and yields the fallback fragment instead of propagating.
    pub fn render_path(&self, path: &Path) -> String {
        match std::fs::read_to_string(path) {
            Ok(markdown) => self.render(&markdown),
            Err(e) => {
                log!("error"; "could not load `{}`: {e}", path.display());
                FALLBACK_HTML.to_string()
            }
        }
    }
}
