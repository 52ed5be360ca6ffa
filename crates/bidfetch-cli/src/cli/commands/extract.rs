//! `bidfetch extract` – list a notice's download items (dry run).

use anyhow::{Context, Result};
use bidfetch_core::extract::extract_from_pdf;
use std::path::Path;

pub fn run_extract(path: &Path) -> Result<()> {
    let items =
        extract_from_pdf(path).with_context(|| format!("extract links from {}", path.display()))?;
    println!("Files to download: {}", items.len());
    for item in &items {
        println!("{}\t{}", item.display_name, item.url);
    }
    Ok(())
}
