//! Corpus configuration management for `folio.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                        |
//! |-------------|------------------------------------------------|
//! | `[content]` | Input directory, extensions, strict mode       |
//! | `[index]`   | JSON index output path, pretty-printing        |
//! | `[extra]`   | User-defined custom fields                     |
//!
//! # Example
//!
//! ```toml
//! [content]
//! dir = "_posts"
//! extensions = ["md", "markdown"]
//! strict = false
//!
//! [index]
//! output = "index.json"
//! pretty = true
//!
//! [extra]
//! site_title = "My Blog"
//! ```
//!
//! The config file is optional: a missing `folio.toml` means defaults, a
//! present-but-invalid one is a fatal error.

mod defaults;
mod error;

use error::ConfigError;

use crate::cli::{Cli, Commands};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing folio.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// CLI arguments reference
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory (set after loading)
    #[serde(skip)]
    pub root: PathBuf,

    /// Content discovery settings
    #[serde(default)]
    pub content: ContentConfig,

    /// Index output settings
    #[serde(default)]
    pub index: IndexConfig,

    /// User-defined extra fields
    #[serde(default)]
    pub extra: HashMap<String, toml::Value>,
}

/// `[content]` section: where posts live and how to treat bad ones.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ContentConfig {
    /// Directory of markdown posts
    #[serde(default = "defaults::content::dir")]
    #[educe(Default = defaults::content::dir())]
    pub dir: PathBuf,

    /// File extensions treated as posts
    #[serde(default = "defaults::content::extensions")]
    #[educe(Default = defaults::content::extensions())]
    pub extensions: Vec<String>,

    /// Promote recorded per-file failures into a fatal build error
    #[serde(default = "defaults::r#false")]
    pub strict: bool,
}

/// `[index]` section: where and how the JSON index is written.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct IndexConfig {
    /// Output path for the serialized index
    #[serde(default = "defaults::index::output")]
    #[educe(Default = defaults::index::output())]
    pub output: PathBuf,

    /// Pretty-print the JSON index
    #[serde(default = "defaults::r#false")]
    pub pretty: bool,
}

impl Config {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Get CLI arguments reference
    pub fn get_cli(&self) -> &'static Cli {
        self.cli.unwrap()
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &'static Cli) {
        self.cli = Some(cli);

        let root = cli.root.clone().unwrap_or_else(|| PathBuf::from("./"));
        let root = Self::normalize_path(&root);
        self.config_path = Self::normalize_path(&root.join(&cli.config));

        // Apply CLI overrides before path normalization
        let corpus_args = cli.corpus_args();
        Self::update_option(&mut self.content.dir, corpus_args.dir.as_ref());
        Self::update_option(&mut self.content.strict, corpus_args.strict.as_ref());

        if let Commands::Build { out, pretty, .. } = &cli.command {
            Self::update_option(&mut self.index.output, out.as_ref());
            Self::update_option(&mut self.index.pretty, pretty.as_ref());
        }

        // Normalize all paths relative to root
        self.content.dir = Self::normalize_path(&root.join(&self.content.dir));
        self.index.output = Self::normalize_path(&root.join(&self.index.output));
        self.root = root;
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration for the current command
    pub fn validate(&self) -> Result<()> {
        if self.content.extensions.is_empty() {
            bail!(ConfigError::Validation(
                "[content.extensions] must have at least one element".into()
            ));
        }

        if let Some(ext) = self
            .content
            .extensions
            .iter()
            .find(|ext| ext.starts_with('.') || ext.is_empty())
        {
            bail!(ConfigError::Validation(format!(
                "[content.extensions] entries must be bare extensions, got `{ext}`"
            )));
        }

        if self.get_cli().is_build() && self.index.output.is_dir() {
            bail!(ConfigError::Validation(
                "[index.output] points at a directory".into()
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
