//! List site content

use anyhow::Result;

use crate::content::GuideLoader;
use crate::generator::sort_summaries;
use crate::GuideSite;

/// Print the guides in index order
pub fn run(site: &GuideSite, json: bool) -> Result<()> {
    let source = site.source();
    let loader = GuideLoader::from_config(&source, &site.config);

    let mut summaries = loader.list_summaries()?;
    if let Some((field, descending)) = site.config.index.order() {
        sort_summaries(&mut summaries, field, descending);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!("Guides ({}):", summaries.len());
    for summary in summaries {
        println!(
            "  {} - {} [{}]",
            summary.date, summary.title, summary.slug
        );
        if !summary.description.is_empty() {
            println!("      {}", summary.description);
        }
    }

    Ok(())
}
