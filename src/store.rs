//! Article metadata store (`articles.json`).
//!
//! The store supplies the list of article records the site renders and
//! filters. The renderer only consumes `path`; the remaining fields feed
//! `query` and the site's list pages.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One article record.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ArticleMeta {
    pub id: String,
    pub title: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_path: Option<String>,
    pub date: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Markdown source path, relative to the content directory. Absence
    /// makes rendering this article a silent no-op.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub featured: bool,
}

impl ArticleMeta {
    /// Source path, treating an empty string like a missing one.
    pub fn source_path(&self) -> Option<&str> {
        self.path.as_deref().filter(|p| !p.is_empty())
    }

    /// Case-insensitive search over title, description, category and tags.
    fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle))
            || self.category.to_lowercase().contains(&needle)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&needle))
    }
}

/// A category entry from the store.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CategoryMeta {
    pub name: String,
    pub slug: String,
    pub count: usize,
}

/// On-disk shape of `articles.json`.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ArticleData {
    articles: Vec<ArticleMeta>,
    categories: Vec<CategoryMeta>,
}

/// Loaded article store.
#[derive(Debug, Default)]
pub struct ArticleStore {
    articles: Vec<ArticleMeta>,
    categories: Vec<CategoryMeta>,
}

impl ArticleStore {
    /// Load and parse the store from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("could not load `{}`", path.display()))?;
        let data: ArticleData = serde_json::from_str(&raw)
            .with_context(|| format!("invalid article data in `{}`", path.display()))?;
        Ok(Self {
            articles: data.articles,
            categories: data.categories,
        })
    }

    pub fn articles(&self) -> &[ArticleMeta] {
        &self.articles
    }

    pub fn categories(&self) -> &[CategoryMeta] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Articles newest first. Dates are ISO `YYYY-MM-DD`, so the
    /// lexicographic order is the chronological one.
    pub fn sorted_by_date_desc(&self) -> Vec<&ArticleMeta> {
        let mut articles: Vec<&ArticleMeta> = self.articles.iter().collect();
        articles.sort_by(|a, b| b.date.cmp(&a.date));
        articles
    }

    /// Filter by category slug/name (case-insensitive; `all` or absent
    /// matches everything) and search term. Results come back newest first.
    pub fn filter(&self, category: Option<&str>, search: Option<&str>) -> Vec<&ArticleMeta> {
        self.sorted_by_date_desc()
            .into_iter()
            .filter(|article| match category {
                Some(cat) if !cat.eq_ignore_ascii_case("all") => {
                    article.category.eq_ignore_ascii_case(cat)
                        || article
                            .category_path
                            .as_deref()
                            .is_some_and(|p| p.eq_ignore_ascii_case(cat))
                }
                _ => true,
            })
            .filter(|article| match search {
                Some(term) if !term.is_empty() => article.matches_search(term),
                _ => true,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> ArticleStore {
        let json = r#"{
            "articles": [
                {
                    "id": "supply-demand",
                    "title": "Supply and Demand",
                    "category": "Microeconomics",
                    "categoryPath": "micro",
                    "date": "2024-03-01",
                    "tags": ["markets", "equilibrium"],
                    "description": "How prices clear markets.",
                    "path": "articles/supply-demand.md",
                    "readTime": "6 min",
                    "author": "J. Doe",
                    "featured": true
                },
                {
                    "id": "inflation",
                    "title": "Understanding Inflation",
                    "category": "Macroeconomics",
                    "date": "2024-05-10",
                    "tags": ["prices"],
                    "path": "articles/inflation.md"
                },
                {
                    "id": "draft-note",
                    "title": "Untitled",
                    "category": "Macroeconomics",
                    "date": "2024-01-15",
                    "tags": []
                }
            ],
            "categories": [
                {"name": "Microeconomics", "slug": "micro", "count": 1},
                {"name": "Macroeconomics", "slug": "macro", "count": 2}
            ]
        }"#;
        let data: ArticleData = serde_json::from_str(json).unwrap();
        ArticleStore {
            articles: data.articles,
            categories: data.categories,
        }
    }

    #[test]
    fn test_deserialize_fields() {
        let store = sample_store();
        let first = &store.articles()[0];
        assert_eq!(first.id, "supply-demand");
        assert_eq!(first.category_path.as_deref(), Some("micro"));
        assert_eq!(first.read_time.as_deref(), Some("6 min"));
        assert!(first.featured);
        assert_eq!(store.categories()[1].slug, "macro");
    }

    #[test]
    fn test_missing_optional_fields() {
        let store = sample_store();
        let last = &store.articles()[2];
        assert!(last.source_path().is_none());
        assert!(!last.featured);
        assert!(last.author.is_none());
    }

    #[test]
    fn test_sorted_by_date_desc() {
        let store = sample_store();
        let sorted = store.sorted_by_date_desc();
        assert_eq!(sorted[0].id, "inflation");
        assert_eq!(sorted[2].id, "draft-note");
    }

    #[test]
    fn test_filter_by_category_slug() {
        let store = sample_store();
        let micro = store.filter(Some("micro"), None);
        assert_eq!(micro.len(), 1);
        assert_eq!(micro[0].id, "supply-demand");
    }

    #[test]
    fn test_filter_all_matches_everything() {
        let store = sample_store();
        assert_eq!(store.filter(Some("all"), None).len(), 3);
        let all = store.filter(None, None);
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id, "inflation");
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let store = sample_store();
        let hits = store.filter(None, Some("EQUILIBRIUM"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "supply-demand");
    }

    #[test]
    fn test_search_combined_with_category() {
        let store = sample_store();
        let hits = store.filter(Some("Macroeconomics"), Some("inflation"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "inflation");
    }
}
