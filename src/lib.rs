//! folio-rs: content resolution for a portfolio and essay site
//!
//! Essays and curated links live in a hosted database, with markdown files on
//! disk as a fallback. This crate resolves content remote-first, falls back to
//! the local files when the backend is down or empty, and renders markdown
//! bodies to HTML for whatever presentation layer sits on top.

pub mod commands;
pub mod config;
pub mod content;
pub mod resolver;
pub mod store;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::MarkdownRenderer;
use resolver::Resolver;
use store::{LocalStore, RemoteStore};

/// Name of the site configuration file in the base directory
pub const CONFIG_FILE: &str = "_config.yml";

/// The main application
#[derive(Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Root of the local fallback documents
    pub content_dir: PathBuf,
}

impl Folio {
    /// Create a new instance from a directory, reading `_config.yml` and the
    /// `FOLIO_REMOTE_*` environment variables
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} in {:?}, using defaults", CONFIG_FILE, base_dir);
            config::SiteConfig::default()
        };
        config.apply_env();

        Ok(Self::with_config(base_dir, config))
    }

    /// Create an instance from an already loaded configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let content_dir = base_dir.join(&config.content_dir);
        Self {
            config,
            base_dir,
            content_dir,
        }
    }

    pub fn local_store(&self) -> LocalStore {
        LocalStore::new(&self.content_dir)
    }

    pub fn remote_store(&self) -> Result<RemoteStore> {
        Ok(RemoteStore::new(&self.config.remote)?)
    }

    /// Build the resolver used by every content command
    pub fn resolver(&self) -> Result<Resolver<RemoteStore>> {
        Ok(Resolver::new(self.remote_store()?, self.local_store()))
    }

    pub fn renderer(&self) -> MarkdownRenderer {
        MarkdownRenderer::from_config(&self.config.markdown)
    }
}
