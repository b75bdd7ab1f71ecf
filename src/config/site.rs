//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub heading: String,
    pub intro: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub guides_dir: String,
    pub public_dir: String,
    /// Extension (without the dot) that marks a file as a guide
    pub extension: String,

    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub highlight: HighlightConfig,

    /// Components that guides may embed by name
    pub components: Vec<ComponentConfig>,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Guides".to_string(),
            description: "technical guides".to_string(),
            heading: "All guides".to_string(),
            intro: "Here's a list of guides".to_string(),
            language: "en".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            guides_dir: "guides".to_string(),
            public_dir: "public".to_string(),
            extension: crate::content::loader::DEFAULT_EXTENSION.to_string(),

            index: IndexConfig::default(),
            highlight: HighlightConfig::default(),

            components: vec![ComponentConfig {
                name: "Image".to_string(),
                required: vec!["src".to_string()],
            }],
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot work with
    pub fn validate(&self) -> Result<(), crate::Error> {
        let ext = self.extension.trim_start_matches('.');
        if ext.is_empty() || ext.contains('/') {
            return Err(crate::Error::Config(format!(
                "extension {:?} is not a file extension",
                self.extension
            )));
        }
        if self.index.order().is_none() {
            return Err(crate::Error::Config(format!(
                "unknown index.order_by {:?}",
                self.index.order_by
            )));
        }
        Ok(())
    }

    /// Guide file extension without a leading dot
    pub fn guide_extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }
}

/// Index page configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// `date`, `slug` or `title`, prefixed with `-` for descending
    pub order_by: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            order_by: "-date".to_string(),
        }
    }
}

/// Field the index is sorted on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    Date,
    Slug,
    Title,
}

impl IndexConfig {
    /// Parse `order_by` into a field and a descending flag
    pub fn order(&self) -> Option<(OrderField, bool)> {
        let (key, descending) = match self.order_by.strip_prefix('-') {
            Some(key) => (key, true),
            None => (self.order_by.as_str(), false),
        };
        let field = match key {
            "date" => OrderField::Date,
            "slug" => OrderField::Slug,
            "title" => OrderField::Title,
            _ => return None,
        };
        Some((field, descending))
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

/// An embeddable component guides may reference
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComponentConfig {
    pub name: String,
    #[serde(default)]
    pub required: Vec<String>,
}
