//! mdsite: Markdown posts to HTML fragments for a small personal site
//!
//! The core is three pure functions in [`content`]: front-matter extraction,
//! first-heading stripping and a substitution-based Markdown renderer. The
//! rest of the crate is the authoring tool around them: listings, the build
//! step that writes `posts/<slug>.html`, and a preview server.

pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// The site being worked on
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Markdown posts, `posts.json` and rendered fragments
    pub posts_dir: PathBuf,
    /// `projects.json`
    pub projects_dir: PathBuf,
}

impl Site {
    /// Create a new Site instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let posts_dir = base_dir.join(&config.posts_dir);
        let projects_dir = base_dir.join(&config.projects_dir);

        Self {
            config,
            base_dir,
            posts_dir,
            projects_dir,
        }
    }

    /// Path of `posts.json`
    pub fn post_index(&self) -> PathBuf {
        self.posts_dir.join(&self.config.post_index)
    }

    /// Path of `projects.json`
    pub fn project_index(&self) -> PathBuf {
        self.projects_dir.join(&self.config.project_index)
    }

    /// Render every post to HTML
    pub fn build(&self) -> Result<()> {
        commands::build::run(self)
    }

    /// Remove rendered fragments and the build cache
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
