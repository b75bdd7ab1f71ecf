//! Guide models

use serde::Serialize;

use super::{FrontMatter, StructuredContent};

/// One guide source file
#[derive(Debug, Clone, PartialEq)]
pub struct GuideFile {
    /// File name without the guide extension
    pub slug: String,

    pub front_matter: FrontMatter,

    /// Raw markdown after the front-matter block
    pub body: String,
}

impl GuideFile {
    pub fn summary(&self) -> GuideSummary {
        GuideSummary {
            slug: self.slug.clone(),
            date: self.front_matter.date.clone(),
            title: self.front_matter.title.clone(),
            description: self.front_matter.description.clone(),
        }
    }
}

/// A row of the index page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuideSummary {
    pub slug: String,
    pub date: String,
    pub title: String,
    pub description: String,
}

/// A guide ready for its page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedGuide {
    pub slug: String,
    pub title: String,
    pub content: StructuredContent,
}
