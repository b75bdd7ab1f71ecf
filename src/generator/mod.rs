//! Generator module - writes the index and guide pages to the public directory

use anyhow::{Context, Result};
use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use crate::config::OrderField;
use crate::content::{GuideFile, GuideLoader, GuideSummary};
use crate::helpers::parse_date_string;
use crate::render::HtmlRenderer;
use crate::templates::TemplateRenderer;
use crate::GuideSite;

/// Outcome of a full build
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Guides listed on the index page, i.e. those whose page was written
    pub indexed: usize,
    /// Guide pages written
    pub pages: usize,
    /// Slugs whose page failed to render, with the reason
    pub failed: Vec<(String, String)>,
}

/// Static site generator
pub struct Generator {
    site: GuideSite,
    renderer: HtmlRenderer,
    templates: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &GuideSite) -> Result<Self> {
        Ok(Self {
            site: site.clone(),
            renderer: HtmlRenderer::from_config(&site.config.highlight),
            templates: TemplateRenderer::new()?,
        })
    }

    /// Generate the entire site
    ///
    /// Every page that can be rendered is written even when others fail;
    /// failures are reported in the returned [`BuildReport`] and left out
    /// of the index so it never links to a missing page.
    pub fn generate(&self) -> Result<BuildReport> {
        let source = self.site.source();
        let loader = GuideLoader::from_config(&source, &self.site.config);

        // A missing guides directory fails the build before anything is written
        let guides = loader
            .list_guides()
            .with_context(|| format!("Failed to list guides in {:?}", self.site.guides_dir))?;

        fs::create_dir_all(&self.site.public_dir)
            .with_context(|| format!("Failed to create {:?}", self.site.public_dir))?;

        // Pages from a previous build must not outlive their guide
        let guides_out = self.site.public_dir.join("guides");
        if guides_out.exists() {
            fs::remove_dir_all(&guides_out)
                .with_context(|| format!("Failed to clear {:?}", guides_out))?;
        }

        let mut report = BuildReport::default();
        let mut published = Vec::new();

        for guide in guides {
            let summary = guide.summary();
            match self.generate_guide_page(&loader, guide) {
                Ok(()) => {
                    report.pages += 1;
                    published.push(summary);
                }
                Err(e) => {
                    tracing::error!("Failed to render guide {:?}: {:#}", summary.slug, e);
                    report.failed.push((summary.slug, format!("{:#}", e)));
                }
            }
        }

        report.indexed = self.generate_index(published)?;
        Ok(report)
    }

    /// Generate the index page
    fn generate_index(&self, mut summaries: Vec<GuideSummary>) -> Result<usize> {
        if let Some((field, descending)) = self.site.config.index.order() {
            sort_summaries(&mut summaries, field, descending);
        }

        let html = self.templates.index(&self.site.config, &summaries)?;
        self.write(Path::new("index.html"), &html)?;
        Ok(summaries.len())
    }

    /// Generate one guide page
    fn generate_guide_page(&self, loader: &GuideLoader<'_>, guide: GuideFile) -> Result<()> {
        let slug = guide.slug.clone();
        let guide = loader.render(guide)?;
        if guide.content.is_empty() {
            tracing::warn!("Guide {:?} has no content", slug);
        }
        let content_html = self.renderer.render(&guide.content);
        let html = self
            .templates
            .guide(&self.site.config, &guide, &content_html)?;

        self.write(&Path::new("guides").join(slug).join("index.html"), &html)
    }

    fn write(&self, relative: &Path, html: &str) -> Result<()> {
        let output_path = self.site.public_dir.join(relative);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {:?}", parent))?;
        }
        fs::write(&output_path, html)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }
}

/// Order index rows by a field; ties fall back to the slug
pub fn sort_summaries(summaries: &mut [GuideSummary], field: OrderField, descending: bool) {
    summaries.sort_by(|a, b| {
        let ord = match field {
            OrderField::Date => compare_dates(&a.date, &b.date),
            OrderField::Slug => Ordering::Equal,
            OrderField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        }
        .then_with(|| a.slug.cmp(&b.slug));

        if descending {
            ord.reverse()
        } else {
            ord
        }
    });
}

/// Parsed dates order chronologically and after unparseable ones
fn compare_dates(a: &str, b: &str) -> Ordering {
    let key = |s: &str| (parse_date_string(s), s.to_string());
    key(a).cmp(&key(b))
}
