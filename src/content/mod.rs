//! Content module - guide files, front-matter, and markdown processing

mod component;
mod frontmatter;
mod guide;
pub mod loader;
mod markdown;
mod source;
mod tree;

pub use component::{ComponentError, ComponentRegistry};
pub use frontmatter::{FrontMatter, FrontMatterError};
pub use guide::{GuideFile, GuideSummary, RenderedGuide};
pub use loader::GuideLoader;
pub use markdown::{MarkdownTransformer, TransformError};
pub use source::{ContentSource, DirectorySource, MemorySource};
pub use tree::{plain_text, Alignment, Block, Component, Inline, PropValue, StructuredContent};
