//! `build` command: render every article in the metadata store.

use anyhow::Result;
use rayon::prelude::*;

use crate::config::NotesConfig;
use crate::render::ArticleRenderer;
use crate::store::ArticleStore;
use crate::typeset::TypesetBridge;
use crate::{debug, log};

/// Render all store articles into the output directory, in parallel.
///
/// Per-article failures (missing source, unwritable output) log and are
/// skipped; the build itself only fails when the store or the output
/// directory is unusable.
pub fn build_articles(config: &NotesConfig) -> Result<()> {
    let store = ArticleStore::load(&config.data_path())?;
    if store.is_empty() {
        log!("build"; "article store is empty, nothing to render");
        return Ok(());
    }
    let output_dir = config.output_dir();
    std::fs::create_dir_all(&output_dir)?;

    let bridge = TypesetBridge::new(config.typeset.clone());
    let renderer = ArticleRenderer::new(&bridge);

    let rendered: usize = store
        .articles()
        .par_iter()
        .map(|article| {
            let Some(path) = article.source_path() else {
                debug!("build"; "`{}` has no source path, skipped", article.id);
                return 0;
            };

            let html = renderer.render_path(&config.content_path(path));
            let target = output_dir.join(format!("{}.html", article.id));
            match std::fs::write(&target, html) {
                Ok(()) => 1,
                Err(e) => {
                    log!("error"; "could not write `{}`: {e}", target.display());
                    0
                }
            }
        })
        .sum();

    log!("build"; "rendered {rendered} of {} article{}", store.len(),
        if store.len() == 1 { "" } else { "s" });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_site(dir: &std::path::Path) {
        std::fs::create_dir_all(dir.join("articles")).unwrap();
        std::fs::create_dir_all(dir.join("data")).unwrap();
        std::fs::write(
            dir.join("articles/supply-demand.md"),
            "# Supply and Demand\n\nPrices clear markets.\n",
        )
        .unwrap();
        std::fs::write(
            dir.join("data/articles.json"),
            r#"{
                "articles": [
                    {
                        "id": "supply-demand",
                        "title": "Supply and Demand",
                        "category": "Microeconomics",
                        "date": "2024-03-01",
                        "path": "articles/supply-demand.md"
                    },
                    {
                        "id": "missing-body",
                        "title": "Missing",
                        "category": "Macroeconomics",
                        "date": "2024-04-01",
                        "path": "articles/missing.md"
                    },
                    {
                        "id": "pathless",
                        "title": "No Source",
                        "category": "Macroeconomics",
                        "date": "2024-04-02"
                    }
                ]
            }"#,
        )
        .unwrap();
    }

    fn site_config(root: &std::path::Path) -> NotesConfig {
        NotesConfig {
            root: root.to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_writes_fragments() {
        let dir = tempfile::tempdir().unwrap();
        write_site(dir.path());

        build_articles(&site_config(dir.path())).unwrap();

        let rendered = std::fs::read_to_string(
            dir.path().join("dist/articles/supply-demand.html"),
        )
        .unwrap();
        assert_eq!(
            rendered,
            "<h1>Supply and Demand</h1><p>Prices clear markets.</p>"
        );
    }

    #[test]
    fn test_build_falls_back_on_missing_body() {
        let dir = tempfile::tempdir().unwrap();
        write_site(dir.path());

        build_articles(&site_config(dir.path())).unwrap();

        let fallback = std::fs::read_to_string(
            dir.path().join("dist/articles/missing-body.html"),
        )
        .unwrap();
        assert_eq!(fallback, crate::render::FALLBACK_HTML);
    }

    #[test]
    fn test_build_skips_pathless_articles() {
        let dir = tempfile::tempdir().unwrap();
        write_site(dir.path());

        build_articles(&site_config(dir.path())).unwrap();

        assert!(!dir.path().join("dist/articles/pathless.html").exists());
    }

    #[test]
    fn test_build_empty_store_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("data")).unwrap();
        std::fs::write(dir.path().join("data/articles.json"), r#"{"articles": []}"#).unwrap();

        build_articles(&site_config(dir.path())).unwrap();

        assert!(!dir.path().join("dist/articles").exists());
    }

    #[test]
    fn test_build_fails_without_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = NotesConfig {
            root: dir.path().to_path_buf(),
            ..Default::default()
        };
        assert!(build_articles(&config).is_err());
    }
}
