//! Remove rendered fragments

use anyhow::Result;
use std::fs;

use crate::cache::CACHE_DIR;
use crate::content::loader::ContentLoader;
use crate::Site;

/// Delete every `<slug>.html` that has a `<slug>.md` next to it, plus the cache
pub fn run(site: &Site) -> Result<()> {
    let loader = ContentLoader::new(site);

    for source in loader.post_sources() {
        let fragment = source.with_extension("html");
        if fragment.exists() {
            fs::remove_file(&fragment)?;
            tracing::info!("Deleted: {:?}", fragment);
        }
    }

    let cache_dir = site.base_dir.join(CACHE_DIR);
    if cache_dir.exists() {
        fs::remove_dir_all(&cache_dir)?;
        tracing::info!("Deleted: {:?}", cache_dir);
    }

    Ok(())
}
