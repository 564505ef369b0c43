//! Render a single markdown file to stdout

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::content::extract_front_matter;
use crate::content::loader::render_post;
use crate::Site;

/// What `render` should print
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutput {
    /// The HTML fragment
    Html { keep_heading: bool },
    /// The front-matter as a JSON object
    Metadata,
}

/// Render `file` and return what should be printed
pub fn run(site: &Site, file: &Path, output: RenderOutput) -> Result<String> {
    let path = if file.is_absolute() {
        file.to_path_buf()
    } else {
        site.base_dir.join(file)
    };
    let raw = fs::read_to_string(&path).with_context(|| format!("Failed to read {:?}", path))?;

    match output {
        RenderOutput::Html { keep_heading } => {
            let strip = site.config.strip_heading && !keep_heading;
            Ok(render_post(&raw, strip))
        }
        RenderOutput::Metadata => {
            let (front_matter, _) = extract_front_matter(&raw);
            Ok(serde_json::to_string_pretty(&front_matter)?)
        }
    }
}
