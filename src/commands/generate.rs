//! Generate static files

use anyhow::Result;

use crate::generator::{BuildReport, Generator};
use crate::GuideSite;

/// Generate the static site, failing if any guide page could not be built
pub fn run(site: &GuideSite) -> Result<()> {
    let report = build(site)?;

    if !report.failed.is_empty() {
        let slugs: Vec<_> = report.failed.iter().map(|(slug, _)| slug.as_str()).collect();
        anyhow::bail!(
            "{} guide page(s) failed to build: {}",
            report.failed.len(),
            slugs.join(", ")
        );
    }

    Ok(())
}

/// Generate the static site and return what was written
pub fn build(site: &GuideSite) -> Result<BuildReport> {
    let start = std::time::Instant::now();

    tracing::info!("Loading guides from {:?}", site.guides_dir);
    let report = Generator::new(site)?.generate()?;

    let duration = start.elapsed();
    tracing::info!(
        "Indexed {} guides and wrote {} pages in {:.2}s",
        report.indexed,
        report.pages,
        duration.as_secs_f64()
    );

    Ok(report)
}
