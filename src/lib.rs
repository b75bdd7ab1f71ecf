//! guide-site: a static site generator for markdown guides
//!
//! Guides are `<slug>.mdx` files with a `---` delimited front-matter block.
//! The crate lists them into an index page and renders each one into its own
//! page, resolving embedded components such as `<Image />` against a fixed
//! registry.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod render;
pub mod templates;

pub use error::{Error, Result};

use content::{DirectorySource, GuideFile, GuideLoader, RenderedGuide};
use std::path::{Path, PathBuf};

/// The guide site application
#[derive(Clone)]
pub struct GuideSite {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding the guide files
    pub guides_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl GuideSite {
    /// Create a new site from a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> anyhow::Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a site with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let guides_dir = base_dir.join(&config.guides_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            guides_dir,
            public_dir,
        }
    }

    /// The guides directory as a content source
    pub fn source(&self) -> DirectorySource {
        DirectorySource::new(&self.guides_dir)
    }

    /// Generate the static site
    pub fn generate(&self) -> anyhow::Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> anyhow::Result<()> {
        commands::clean::run(self)
    }
}

/// List the guides in a directory using the default conventions
pub fn list_guides<P: AsRef<Path>>(dir: P) -> Result<Vec<GuideFile>> {
    let source = DirectorySource::new(dir);
    GuideLoader::new(&source).list_guides()
}

/// Slugs of every guide file in a directory
pub fn list_slugs<P: AsRef<Path>>(dir: P) -> Result<Vec<String>> {
    let source = DirectorySource::new(dir);
    GuideLoader::new(&source).list_slugs()
}

/// Render one guide from a directory
pub fn render_guide<P: AsRef<Path>>(dir: P, slug: &str) -> Result<RenderedGuide> {
    let source = DirectorySource::new(dir);
    GuideLoader::new(&source).render_guide(slug)
}
