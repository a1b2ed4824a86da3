//! quillpost: a small static site generator for a personal blog
//!
//! A build runs in two phases. [`content::ContentLoader`] discovers the
//! Markdown/MDX posts, assigns their slugs and sorts them newest first; then
//! [`generator::create_pages`] maps that sequence to page descriptors which
//! the [`generator::Generator`] renders through the embedded Tera templates.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod server;
pub mod templates;

pub use error::BuildError;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Name of the site configuration file
pub const CONFIG_FILE: &str = "_config.yml";

/// A blog site rooted at a directory
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Source directory
    pub source_dir: PathBuf,
    /// Directory holding the posts (`source_dir/base_path`)
    pub content_dir: PathBuf,
    /// Static assets copied verbatim to the output
    pub static_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Site {
    /// Open a site directory, loading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Self::with_config(base_dir, config)
    }

    /// Build a site from an already loaded configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Result<Self> {
        config.validate()?;

        let source_dir = base_dir.join(&config.source_dir);
        let content_dir = source_dir.join(config.base_path.trim_matches('/'));
        let static_dir = base_dir.join(&config.static_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            source_dir,
            content_dir,
            static_dir,
            public_dir,
        })
    }

    /// Path of the configuration file
    pub fn config_path(&self) -> PathBuf {
        self.base_dir.join(CONFIG_FILE)
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post
    pub fn new_post(&self, title: &str, tags: &[String], name: Option<&str>) -> Result<PathBuf> {
        commands::new::create_post(self, title, tags, name)
    }
}
