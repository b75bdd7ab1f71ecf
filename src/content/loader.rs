//! Content loader - lists and renders guides from a content source

use super::{
    ComponentRegistry, ContentSource, FrontMatter, GuideFile, GuideSummary, MarkdownTransformer,
    RenderedGuide,
};
use crate::config::SiteConfig;
use crate::error::{Error, Result};

/// Default guide file extension
pub const DEFAULT_EXTENSION: &str = "mdx";

/// Loads guides from a [`ContentSource`]
pub struct GuideLoader<'a> {
    source: &'a dyn ContentSource,
    extension: String,
    transformer: MarkdownTransformer,
}

impl<'a> GuideLoader<'a> {
    /// Loader with the default extension and component registry
    pub fn new(source: &'a dyn ContentSource) -> Self {
        Self::from_config(source, &SiteConfig::default())
    }

    /// Loader using the site's extension and component registry
    pub fn from_config(source: &'a dyn ContentSource, config: &SiteConfig) -> Self {
        Self {
            source,
            extension: config.guide_extension().to_string(),
            transformer: MarkdownTransformer::new(ComponentRegistry::from_config(
                &config.components,
            )),
        }
    }

    /// Slug of a file name, if the name follows the guide convention
    pub fn slug_of<'n>(&self, file_name: &'n str) -> Option<&'n str> {
        let slug = file_name
            .strip_suffix(self.extension.as_str())?
            .strip_suffix('.')?;
        is_valid_slug(slug).then_some(slug)
    }

    fn file_name(&self, slug: &str) -> String {
        format!("{}.{}", slug, self.extension)
    }

    /// Slugs of every file named like a guide, sorted
    fn candidate_slugs(&self) -> Result<Vec<String>> {
        let mut slugs: Vec<String> = self
            .source
            .entries()?
            .iter()
            .filter_map(|name| self.slug_of(name))
            .map(str::to_string)
            .collect();
        slugs.sort();
        Ok(slugs)
    }

    /// Load every guide, skipping files that fail to load
    pub fn list_guides(&self) -> Result<Vec<GuideFile>> {
        let mut guides = Vec::new();

        for slug in self.candidate_slugs()? {
            match self.load_guide(&slug) {
                Ok(guide) => guides.push(guide),
                Err(e) => {
                    tracing::warn!("Skipping guide {:?}: {}", self.file_name(&slug), e);
                }
            }
        }

        Ok(guides)
    }

    /// Slugs of the guides [`list_guides`](Self::list_guides) returns, sorted
    pub fn list_slugs(&self) -> Result<Vec<String>> {
        Ok(self
            .list_guides()?
            .into_iter()
            .map(|guide| guide.slug)
            .collect())
    }

    /// Index rows for every loadable guide
    pub fn list_summaries(&self) -> Result<Vec<GuideSummary>> {
        Ok(self
            .list_guides()?
            .iter()
            .map(GuideFile::summary)
            .collect())
    }

    /// Load a single guide by slug
    pub fn load_guide(&self, slug: &str) -> Result<GuideFile> {
        let file_name = self.file_name(slug);
        if !is_valid_slug(slug) {
            return Err(Error::NotFound {
                path: self.source.location().join(file_name),
            });
        }

        let content = self.source.read(&file_name)?;
        let (front_matter, body) =
            FrontMatter::parse(&content).map_err(|e| Error::parse(&file_name, e.to_string()))?;

        Ok(GuideFile {
            slug: slug.to_string(),
            front_matter,
            body: body.to_string(),
        })
    }

    /// Load a guide and turn its body into structured content
    pub fn render_guide(&self, slug: &str) -> Result<RenderedGuide> {
        let guide = self.load_guide(slug)?;
        self.render(guide)
    }

    /// Turn an already loaded guide into structured content
    pub fn render(&self, guide: GuideFile) -> Result<RenderedGuide> {
        let content = self
            .transformer
            .transform(&guide.body)
            .map_err(|e| Error::parse(self.file_name(&guide.slug), e.to_string()))?;

        tracing::debug!(
            "Rendered guide {:?} ({} blocks)",
            guide.slug,
            content.blocks.len()
        );

        Ok(RenderedGuide {
            slug: guide.slug,
            title: guide.front_matter.title,
            content,
        })
    }
}

/// A slug names a file directly inside the content directory
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('.')
        && !slug.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ComponentConfig;
    use crate::content::{Block, Inline, MemorySource};
    use std::collections::HashSet;

    const HELLO: &str = "---\ntitle: \"Hello\"\ndate: \"2023-01-01\"\ndescription: \"intro\"\n---\n# Hi\n";

    fn guide(title: &str, date: &str, body: &str) -> String {
        format!("---\ntitle: {title}\ndate: {date}\ndescription: about {title}\n---\n{body}")
    }

    #[test]
    fn test_hello_world_scenario() {
        let source: MemorySource = [("hello-world.mdx", HELLO)].into_iter().collect();
        let loader = GuideLoader::new(&source);

        let summaries = loader.list_summaries().unwrap();
        assert_eq!(
            summaries,
            vec![GuideSummary {
                slug: "hello-world".to_string(),
                date: "2023-01-01".to_string(),
                title: "Hello".to_string(),
                description: "intro".to_string(),
            }]
        );

        let rendered = loader.render_guide("hello-world").unwrap();
        assert_eq!(rendered.title, "Hello");
        assert_eq!(
            rendered.content.blocks,
            vec![Block::Heading {
                level: 1,
                id: "hi".to_string(),
                content: vec![Inline::text("Hi")],
            }]
        );
    }

    #[test]
    fn test_slugs_match_listed_guides() {
        let source: MemorySource = [
            ("zeta.mdx", guide("Zeta", "2022-03-01", "z")),
            ("alpha.mdx", guide("Alpha", "2021-01-01", "a")),
            ("readme.txt", "not a guide".to_string()),
            ("draft.mdx.bak", guide("Draft", "2020-01-01", "d")),
            (".hidden.mdx", guide("Hidden", "2020-01-01", "h")),
        ]
        .into_iter()
        .collect();
        let loader = GuideLoader::new(&source);

        let slugs = loader.list_slugs().unwrap();
        let listed: Vec<_> = loader
            .list_guides()
            .unwrap()
            .into_iter()
            .map(|g| g.slug)
            .collect();
        assert_eq!(slugs, vec!["alpha", "zeta"]);
        assert_eq!(listed, slugs);
    }

    #[test]
    fn test_empty_source() {
        let source = MemorySource::new();
        let loader = GuideLoader::new(&source);
        assert!(loader.list_guides().unwrap().is_empty());
        assert!(loader.list_slugs().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_guide_skipped_everywhere() {
        let source: MemorySource = [
            ("good.mdx", guide("Good", "2023-01-01", "ok")),
            ("broken.mdx", "---\ntitle: Broken\n# never closed\n".to_string()),
            ("back\\slash.mdx", guide("Odd", "2023-01-01", "x")),
        ]
        .into_iter()
        .collect();
        let loader = GuideLoader::new(&source);

        let guides = loader.list_guides().unwrap();
        assert_eq!(guides.len(), 1);
        assert_eq!(guides[0].slug, "good");

        let slugs: HashSet<_> = loader.list_slugs().unwrap().into_iter().collect();
        let listed: HashSet<_> = guides.into_iter().map(|g| g.slug).collect();
        assert_eq!(slugs, listed);

        // asked for directly, the broken file still fails loudly
        assert!(loader.render_guide("broken").unwrap_err().is_parse());
    }

    #[test]
    fn test_missing_slug_not_found() {
        let source: MemorySource = [("hello-world.mdx", HELLO)].into_iter().collect();
        let loader = GuideLoader::new(&source);
        assert!(loader.render_guide("missing-slug").unwrap_err().is_not_found());
    }

    #[test]
    fn test_path_like_slugs_rejected() {
        let source: MemorySource = [("hello-world.mdx", HELLO)].into_iter().collect();
        let loader = GuideLoader::new(&source);
        for slug in ["", "../hello-world", "a/b", ".hidden"] {
            assert!(loader.render_guide(slug).unwrap_err().is_not_found(), "{slug}");
        }
    }

    #[test]
    fn test_unknown_component_fails_render() {
        let source: MemorySource = [(
            "chart.mdx",
            guide("Chart", "2023-01-01", "<Chart data={x} />\n"),
        )]
        .into_iter()
        .collect();
        let loader = GuideLoader::new(&source);

        let err = loader.render_guide("chart").unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("chart.mdx"));
        assert!(err.to_string().contains("Chart"));

        // listing only reads front-matter, so the guide is still indexed
        assert_eq!(loader.list_guides().unwrap().len(), 1);
    }

    #[test]
    fn test_config_extension_and_components() {
        let source: MemorySource = [
            ("chart.md", guide("Chart", "2023-01-01", "<Chart data={x} />\n")),
            ("other.mdx", guide("Other", "2023-01-01", "o")),
        ]
        .into_iter()
        .collect();
        let config = SiteConfig {
            extension: ".md".to_string(),
            components: vec![ComponentConfig {
                name: "Chart".to_string(),
                required: vec!["data".to_string()],
            }],
            ..Default::default()
        };
        let loader = GuideLoader::from_config(&source, &config);

        assert_eq!(loader.list_slugs().unwrap(), vec!["chart"]);
        let rendered = loader.render_guide("chart").unwrap();
        assert!(matches!(&rendered.content.blocks[0], Block::Component(c) if c.name == "Chart"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let source: MemorySource = [(
            "tour.mdx",
            guide(
                "Tour",
                "2023-01-01",
                "## Start\n\n1. one\n2. two\n\n<Image src=\"/t.png\" />\n\n```sh\nls\n```\n",
            ),
        )]
        .into_iter()
        .collect();
        let loader = GuideLoader::new(&source);
        let first = loader.render_guide("tour").unwrap();
        let second = loader.render_guide("tour").unwrap();
        assert_eq!(first.content, second.content);
    }
}
