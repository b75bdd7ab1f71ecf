//! Built-in page templates using the Tera template engine
//!
//! The layout, index and guide templates are embedded in the binary.
//! Styling, icons and navigation are left to whatever wraps the output.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{GuideSummary, RenderedGuide};
use crate::helpers::{encode_segment, full_url_for, guide_url, html_escape, time_tag};

/// Template renderer with the embedded templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Values are escaped with the `html_escape` filter where they are used
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("default/layout.html")),
            ("index.html", include_str!("default/index.html")),
            ("guide.html", include_str!("default/guide.html")),
        ])?;

        tera.register_filter("html_escape", html_escape_filter);
        tera.register_filter("time_tag", time_tag_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// The index page: one table row per guide
    pub fn index(&self, config: &SiteConfig, summaries: &[GuideSummary]) -> Result<String> {
        let rows: Vec<IndexRow> = summaries
            .iter()
            .map(|summary| IndexRow {
                url: guide_url(config, &summary.slug),
                date: summary.date.clone(),
                title: summary.title.clone(),
                description: summary.description.clone(),
            })
            .collect();

        let mut context = page_context(config, &config.title, full_url_for(config, "/"));
        context.insert("guides", &rows);
        self.render("index.html", &context)
    }

    /// A guide page: title heading followed by the rendered content
    pub fn guide(
        &self,
        config: &SiteConfig,
        guide: &RenderedGuide,
        content_html: &str,
    ) -> Result<String> {
        let title = format!("{} | {}", guide.title, config.title);
        let canonical = full_url_for(config, &format!("guides/{}/", encode_segment(&guide.slug)));

        let toc: Vec<TocEntry> = guide
            .content
            .headings()
            .into_iter()
            .map(|(level, id, text)| TocEntry {
                level,
                id: id.to_string(),
                text,
            })
            .collect();

        let mut context = page_context(config, &title, canonical);
        context.insert("guide_title", &guide.title);
        context.insert("toc", &toc);
        context.insert("content", content_html);
        self.render("guide.html", &context)
    }
}

/// Site values every page can use
#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub heading: String,
    pub intro: String,
    pub language: String,
}

impl From<&SiteConfig> for SiteData {
    fn from(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            heading: config.heading.clone(),
            intro: config.intro.clone(),
            language: config.language.clone(),
        }
    }
}

/// One row of the index table
#[derive(Debug, Clone, Serialize)]
pub struct IndexRow {
    pub url: String,
    pub date: String,
    pub title: String,
    pub description: String,
}

/// A heading linked from the guide's table of contents
#[derive(Debug, Clone, Serialize)]
pub struct TocEntry {
    pub level: u8,
    pub id: String,
    pub text: String,
}

fn page_context(config: &SiteConfig, page_title: &str, canonical: String) -> Context {
    let mut context = Context::new();
    context.insert("site", &SiteData::from(config));
    context.insert("page_title", page_title);
    context.insert("canonical", &canonical);
    context.insert("version", env!("CARGO_PKG_VERSION"));
    context
}

/// Tera filter: escape HTML special characters
fn html_escape_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("html_escape", "value", String, value);
    Ok(tera::Value::String(html_escape(&s)))
}

/// Tera filter: wrap a date in a `<time>` element
fn time_tag_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("time_tag", "value", String, value);
    Ok(tera::Value::String(time_tag(&s)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Block, Inline, StructuredContent};

    fn summary(slug: &str, title: &str) -> GuideSummary {
        GuideSummary {
            slug: slug.to_string(),
            date: "2023-01-01".to_string(),
            title: title.to_string(),
            description: "intro".to_string(),
        }
    }

    #[test]
    fn test_index_rows_link_to_guides() {
        let config = SiteConfig::default();
        let html = TemplateRenderer::new()
            .unwrap()
            .index(&config, &[summary("hello-world", "Hello <World>")])
            .unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Guides</title>"));
        assert!(html.contains("<h1>All guides</h1>"));
        assert!(html.contains(r#"<a href="/guides/hello-world/">Hello &lt;World&gt;</a>"#));
        assert!(html.contains(r#"<time datetime="2023-01-01">2023-01-01</time>"#));
        assert!(html.contains(r#"<td class="detail">intro</td>"#));
        assert!(html.contains(r#"<link rel="canonical" href="http://example.com/">"#));
    }

    #[test]
    fn test_index_keeps_row_order() {
        let config = SiteConfig::default();
        let html = TemplateRenderer::new()
            .unwrap()
            .index(&config, &[summary("b", "Second"), summary("a", "First")])
            .unwrap();
        assert!(html.find("Second").unwrap() < html.find("First").unwrap());
    }

    #[test]
    fn test_empty_index_has_no_rows() {
        let config = SiteConfig::default();
        let html = TemplateRenderer::new().unwrap().index(&config, &[]).unwrap();
        assert!(html.contains("<tbody>"));
        assert!(!html.contains("<tr>"));
    }

    #[test]
    fn test_guide_page() {
        let config = SiteConfig {
            url: "https://docs.example.com".to_string(),
            ..Default::default()
        };
        let guide = RenderedGuide {
            slug: "hello".to_string(),
            title: "Hello & welcome".to_string(),
            content: StructuredContent::new(vec![Block::Paragraph {
                content: vec![Inline::text("x")],
            }]),
        };
        let html = TemplateRenderer::new()
            .unwrap()
            .guide(&config, &guide, "<p>x</p>\n")
            .unwrap();
        assert!(html.contains("<title>Hello &amp; welcome | Guides</title>"));
        assert!(html.contains("<h1>Hello &amp; welcome</h1>\n<p>x</p>\n"));
        assert!(html.contains(r#"href="https://docs.example.com/guides/hello/""#));
        assert!(!html.contains(r#"<nav class="toc">"#));
    }

    #[test]
    fn test_guide_toc_lists_headings() {
        let config = SiteConfig::default();
        let heading = |level, id: &str, text: &str| Block::Heading {
            level,
            id: id.to_string(),
            content: vec![Inline::text(text)],
        };
        let guide = RenderedGuide {
            slug: "setup".to_string(),
            title: "Setup".to_string(),
            content: StructuredContent::new(vec![
                heading(2, "install", "Install"),
                heading(3, "linux", "Linux & WSL"),
            ]),
        };
        let html = TemplateRenderer::new()
            .unwrap()
            .guide(&config, &guide, "")
            .unwrap();
        assert!(html.contains(r#"<nav class="toc">"#));
        assert!(html.contains(r##"<li class="toc-level-2"><a href="#install">Install</a></li>"##));
        assert!(html.contains(r##"<li class="toc-level-3"><a href="#linux">Linux &amp; WSL</a></li>"##));
    }
}
