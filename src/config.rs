//! Site configuration from `econotes.toml`, with CLI overrides.
//!
//! Every section has defaults, so a missing config file is valid: the
//! tool runs against `data/articles.json` and writes to `dist/articles`
//! out of the box. CLI flags override file values.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::cli::Cli;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// `[site]` section: where article data and sources live.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    /// Article metadata store (JSON).
    pub data: PathBuf,
    /// Directory the store's article paths are relative to.
    pub content: PathBuf,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            data: PathBuf::from("data/articles.json"),
            content: PathBuf::from("."),
        }
    }
}

/// `[build]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BuildSection {
    /// Directory rendered HTML fragments are written to.
    pub output: PathBuf,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            output: PathBuf::from("dist/articles"),
        }
    }
}

/// `[typeset]` section: the external math engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TypesetSection {
    /// Run the engine at all. HTML rendering works without it; math stays
    /// as raw delimiter markup.
    pub enable: bool,
    /// Engine command name, resolved on PATH. Empty means none.
    pub command: String,
    /// Extra arguments passed to the engine.
    pub args: Vec<String>,
}

impl Default for TypesetSection {
    fn default() -> Self {
        Self {
            enable: true,
            command: String::new(),
            args: Vec::new(),
        }
    }
}

/// Loaded site configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct NotesConfig {
    pub site: SiteSection,
    pub build: BuildSection,
    pub typeset: TypesetSection,

    /// Project root (config file directory). Not read from the file.
    #[serde(skip)]
    pub root: PathBuf,
}

impl NotesConfig {
    /// Load from the CLI-specified config path, then apply CLI overrides.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = if cli.config.exists() {
            let raw = std::fs::read_to_string(&cli.config)
                .map_err(|e| ConfigError::Io(cli.config.clone(), e))?;
            toml::from_str(&raw)?
        } else {
            Self::default()
        };

        config.root = cli
            .config
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        if let Some(data) = &cli.data {
            config.site.data = data.clone();
        }
        if let Some(output) = &cli.output {
            config.build.output = output.clone();
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.build.output.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "build.output must not be empty".to_string(),
            ));
        }
        if self.typeset.enable && self.typeset.command.is_empty() && !self.typeset.args.is_empty() {
            return Err(ConfigError::Validation(
                "typeset.args set without typeset.command".to_string(),
            ));
        }
        Ok(())
    }

    /// Absolute-ish path to the article store.
    pub fn data_path(&self) -> PathBuf {
        self.root.join(&self.site.data)
    }

    /// Resolve an article source path from the store.
    pub fn content_path(&self, article_path: &str) -> PathBuf {
        self.root.join(&self.site.content).join(article_path)
    }

    /// Output directory for rendered fragments.
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.build.output)
    }
}
