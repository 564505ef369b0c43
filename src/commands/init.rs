//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::content::listing::{Listing, PostEntry, ProjectEntry};
use crate::Site;

const DEFAULT_CONFIG: &str = r#"# Directory
posts_dir: posts
projects_dir: projects
post_index: posts.json
project_index: projects.json

# Writing
date_format: '%B %d, %Y'
strip_heading: true

# Preview server
server:
  port: 4000
  ip: localhost
"#;

/// Initialize a new site in the given directory; existing files are left alone
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)?;

    let config_path = target_dir.join("_config.yml");
    if !config_path.exists() {
        fs::write(&config_path, DEFAULT_CONFIG)?;
        tracing::info!("Created: {:?}", config_path);
    }

    let site = Site::new(target_dir)?;
    fs::create_dir_all(&site.posts_dir)?;
    fs::create_dir_all(&site.projects_dir)?;

    if !site.post_index().exists() {
        Listing::<PostEntry>::default().save(&site.post_index())?;
    }
    if !site.project_index().exists() {
        Listing::<ProjectEntry>::default().save(&site.project_index())?;
    }

    Ok(())
}
