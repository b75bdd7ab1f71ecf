//! Clean the public directory

use anyhow::{Context, Result};
use std::fs;

use crate::GuideSite;

/// Remove the public directory
pub fn run(site: &GuideSite) -> Result<()> {
    if site.public_dir.exists() {
        fs::remove_dir_all(&site.public_dir)
            .with_context(|| format!("Failed to delete {:?}", site.public_dir))?;
        tracing::info!("Deleted: {:?}", site.public_dir);
    } else {
        tracing::debug!("Nothing to clean at {:?}", site.public_dir);
    }

    Ok(())
}
