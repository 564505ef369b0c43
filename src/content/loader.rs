//! Content loader - loads posts and listings from the site directory

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::listing::{Listing, PostEntry, ProjectEntry};
use super::{extract_front_matter, first_heading, render_markdown, strip_first_heading, Post};
use crate::Site;

/// Loads content from the posts directory
pub struct ContentLoader<'a> {
    site: &'a Site,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(site: &'a Site) -> Self {
        Self { site }
    }

    /// Markdown files directly inside the posts directory, sorted by name
    pub fn post_sources(&self) -> Vec<PathBuf> {
        let posts_dir = &self.site.posts_dir;
        if !posts_dir.exists() {
            return Vec::new();
        }

        let mut sources: Vec<PathBuf> = WalkDir::new(posts_dir)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .filter(|p| p.is_file() && is_markdown_file(p))
            .collect();
        sources.sort();
        sources
    }

    /// Load every post; broken files are logged and skipped
    pub fn load_posts(&self) -> Vec<Post> {
        let mut posts = Vec::new();
        for path in self.post_sources() {
            match self.load_post(&path) {
                Ok(post) => posts.push(post),
                Err(e) => tracing::warn!("Failed to load post {:?}: {}", path, e),
            }
        }
        posts
    }

    /// Load and render a single post from a file
    pub fn load_post(&self, path: &Path) -> Result<Post> {
        let raw = fs::read_to_string(path)?;
        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid post file name: {:?}", path))?
            .to_string();

        let (front_matter, body) = extract_front_matter(&raw);

        let title = front_matter
            .title()
            .or_else(|| first_heading(body))
            .map(str::to_string)
            .unwrap_or_else(|| slug.clone());

        let content = render_post(&raw, self.site.config.strip_heading);
        tracing::debug!("Rendered {:?} ({} bytes)", path, content.len());

        Ok(Post {
            slug,
            title,
            date: front_matter.date().map(str::to_string),
            description: front_matter.description().map(str::to_string),
            content,
            front_matter,
            raw,
            source: path.to_path_buf(),
        })
    }

    pub fn load_post_listing(&self) -> Result<Listing<PostEntry>> {
        Ok(Listing::load(&self.site.post_index())?)
    }

    pub fn load_project_listing(&self) -> Result<Listing<ProjectEntry>> {
        Ok(Listing::load(&self.site.project_index())?)
    }
}

/// Front-matter off, optional title line off, then markdown to HTML
pub fn render_post(raw: &str, strip_heading: bool) -> String {
    if strip_heading {
        render_markdown(&strip_first_heading(raw))
    } else {
        let (_, body) = extract_front_matter(raw);
        render_markdown(body)
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext == "md" || ext == "markdown")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::TempDir;

    fn site_in(dir: &TempDir) -> Site {
        let site = Site::with_config(dir.path().to_path_buf(), SiteConfig::default());
        fs::create_dir_all(&site.posts_dir).unwrap();
        site
    }

    #[test]
    fn test_render_post_strips_title() {
        let raw = "---\ntitle: Hello\n---\n# Hello\nBody text";
        assert_eq!(render_post(raw, true), "<p>Body text</p>");
        assert_eq!(render_post(raw, false), "<h1>Hello</h1><br>Body text</p>");
    }

    #[test]
    fn test_load_post_title_sources() {
        let dir = TempDir::new().unwrap();
        let site = site_in(&dir);
        fs::write(site.posts_dir.join("a.md"), "---\ntitle: From Meta\n---\n# Heading\n").unwrap();
        fs::write(site.posts_dir.join("b.md"), "# From Heading\ntext").unwrap();
        fs::write(site.posts_dir.join("c.md"), "just text").unwrap();
        fs::write(site.posts_dir.join("notes.txt"), "ignored").unwrap();

        let loader = ContentLoader::new(&site);
        let posts = loader.load_posts();
        let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["From Meta", "From Heading", "c"]);
        assert_eq!(posts[1].content, "<p>text</p>");
    }

    #[test]
    fn test_load_post_metadata() {
        let dir = TempDir::new().unwrap();
        let site = site_in(&dir);
        let path = site.posts_dir.join("hello.md");
        fs::write(&path, "---\ndate: May 01, 2024\ndescription: Hi there\n---\nBody").unwrap();

        let post = ContentLoader::new(&site).load_post(&path).unwrap();
        assert_eq!(post.slug, "hello");
        assert_eq!(post.date.as_deref(), Some("May 01, 2024"));
        assert_eq!(post.description.as_deref(), Some("Hi there"));
        assert_eq!(post.content, "<p>Body</p>");
    }

    #[test]
    fn test_missing_posts_dir() {
        let dir = TempDir::new().unwrap();
        let site = Site::with_config(dir.path().join("nowhere"), SiteConfig::default());
        assert!(ContentLoader::new(&site).post_sources().is_empty());
    }
}
