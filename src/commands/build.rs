//! Render posts to HTML fragments

use anyhow::Result;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode, DebouncedEvent};
use std::fs;
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

use crate::cache::{self, CacheDb};
use crate::content::listing::{Listing, PostEntry};
use crate::content::loader::ContentLoader;
use crate::content::Post;
use crate::Site;

/// What a build did
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Fragments written
    pub rendered: usize,
    /// Fragments already up to date
    pub skipped: usize,
    /// Posts that could not be loaded or written
    pub failed: usize,
    /// Slugs added to `posts.json` because only the markdown existed
    pub listed: Vec<String>,
}

/// Build the site (with incremental support)
pub fn run(site: &Site) -> Result<()> {
    run_with_options(site, false).map(|_| ())
}

/// Build with force option
pub fn run_with_options(site: &Site, force: bool) -> Result<BuildReport> {
    let start = Instant::now();
    let loader = ContentLoader::new(site);
    let mut report = BuildReport::default();

    let settings_hash = cache::hash_content(&format!("strip_heading={}", site.config.strip_heading));
    let old_cache = if force {
        CacheDb::default()
    } else {
        CacheDb::load(&site.base_dir)
    };
    let mut new_cache = CacheDb::new(settings_hash);

    let mut listing = loader.load_post_listing()?;
    let mut listing_changed = false;

    for path in loader.post_sources() {
        let post = match loader.load_post(&path) {
            Ok(post) => post,
            Err(e) => {
                tracing::warn!("Failed to load post {:?}: {}", path, e);
                report.failed += 1;
                continue;
            }
        };

        let content_hash = cache::hash_content(&post.raw);
        let output = post.output_path();

        if output.exists() && old_cache.is_fresh(settings_hash, &post.slug, content_hash) {
            tracing::debug!("Unchanged: {}", post.slug);
            report.skipped += 1;
        } else if let Err(e) = fs::write(&output, &post.content) {
            tracing::warn!("Failed to write {:?}: {}", output, e);
            report.failed += 1;
            continue;
        } else {
            tracing::debug!("Wrote {:?}", output);
            report.rendered += 1;
        }
        new_cache.record(&post.slug, content_hash);

        if listing.append_missing(post.to_entry()) {
            tracing::info!("Listed new post: {}", post.slug);
            report.listed.push(post.slug.clone());
            listing_changed = true;
        } else if fill_listing_gaps(&mut listing, &post) {
            listing_changed = true;
        }
    }

    for entry in listing.entries() {
        if !site.posts_dir.join(format!("{}.md", entry.slug)).exists() {
            tracing::warn!("Listed post {} has no markdown source", entry.slug);
        }
    }

    if listing_changed {
        listing.save(&site.post_index())?;
    }
    new_cache.save(&site.base_dir)?;

    tracing::info!(
        "Built in {:.2}s: {} rendered, {} unchanged, {} failed",
        start.elapsed().as_secs_f64(),
        report.rendered,
        report.skipped,
        report.failed
    );

    Ok(report)
}

/// Copy front-matter date and description into an existing listing record
/// when the record leaves them blank
fn fill_listing_gaps(listing: &mut Listing<PostEntry>, post: &Post) -> bool {
    let Some(entry) = listing
        .entries_mut()
        .iter_mut()
        .find(|e| e.slug == post.slug)
    else {
        return false;
    };

    let mut changed = false;
    if entry.date.is_empty() {
        if let Some(date) = &post.date {
            entry.date = date.clone();
            changed = true;
        }
    }
    if entry.description.is_empty() {
        if let Some(description) = &post.description {
            entry.description = description.clone();
            changed = true;
        }
    }
    changed
}

/// Watch sources and rebuild on change; calls `on_rebuild` after each build
pub fn watch_with<F>(site: &Site, mut on_rebuild: F) -> Result<()>
where
    F: FnMut(&BuildReport),
{
    let (tx, rx) = channel();

    // Create debouncer to avoid multiple rapid rebuilds
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    for dir in [&site.posts_dir, &site.projects_dir] {
        if dir.exists() {
            debouncer.watcher().watch(dir, RecursiveMode::NonRecursive)?;
            tracing::debug!("Watching: {:?}", dir);
        }
    }

    let config_path = site.base_dir.join("_config.yml");
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant: Vec<&DebouncedEvent> =
                    events.iter().filter(|e| is_source_change(&e.path)).collect();
                if relevant.is_empty() {
                    continue;
                }

                for event in &relevant {
                    tracing::info!("File changed: {}", event.path.display());
                }

                // Config edits can move directories or flip strip_heading
                let site = match Site::new(&site.base_dir) {
                    Ok(reloaded) => reloaded,
                    Err(e) => {
                        tracing::error!("Failed to reload config: {}", e);
                        continue;
                    }
                };

                match run_with_options(&site, false) {
                    Ok(report) => on_rebuild(&report),
                    Err(e) => tracing::error!("Build failed: {}", e),
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

/// Watch and rebuild until interrupted
pub fn watch(site: &Site) -> Result<()> {
    tracing::info!("Watching for changes. Press Ctrl+C to stop.");
    watch_with(site, |_| {})
}

/// Markdown, listings and config; never our own `.html` output
fn is_source_change(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    if path_str.ends_with('~') || path_str.contains(cache::CACHE_DIR) {
        return false;
    }
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("md" | "markdown" | "json" | "yml" | "yaml")
    )
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
    fn test_build_writes_fragments() {
        let dir = TempDir::new().unwrap();
        let site = site_in(&dir);
        fs::write(
            site.posts_dir.join("hello.md"),
            "---\ntitle: Hello\n---\n# Hello\nSome **bold** text",
        )
        .unwrap();

        let report = run_with_options(&site, false).unwrap();
        assert_eq!(report.rendered, 1);

        let html = fs::read_to_string(site.posts_dir.join("hello.html")).unwrap();
        assert_eq!(html, "<p>Some <strong>bold</strong> text</p>");
    }

    #[test]
    fn test_build_keeps_heading_when_configured() {
        let dir = TempDir::new().unwrap();
        let config = SiteConfig {
            strip_heading: false,
            ..Default::default()
        };
        let site = Site::with_config(dir.path().to_path_buf(), config);
        fs::create_dir_all(&site.posts_dir).unwrap();
        fs::write(site.posts_dir.join("a.md"), "# Title").unwrap();

        run_with_options(&site, false).unwrap();
        let html = fs::read_to_string(site.posts_dir.join("a.html")).unwrap();
        assert_eq!(html, "<h1>Title</h1>");
    }

    #[test]
    fn test_build_is_incremental() {
        let dir = TempDir::new().unwrap();
        let site = site_in(&dir);
        let source = site.posts_dir.join("a.md");
        fs::write(&source, "one").unwrap();
        fs::write(site.posts_dir.join("b.md"), "two").unwrap();

        let first = run_with_options(&site, false).unwrap();
        assert_eq!((first.rendered, first.skipped), (2, 0));

        let second = run_with_options(&site, false).unwrap();
        assert_eq!((second.rendered, second.skipped), (0, 2));

        fs::write(&source, "one, edited").unwrap();
        let third = run_with_options(&site, false).unwrap();
        assert_eq!((third.rendered, third.skipped), (1, 1));

        let forced = run_with_options(&site, true).unwrap();
        assert_eq!((forced.rendered, forced.skipped), (2, 0));
    }

    #[test]
    fn test_build_rewrites_deleted_fragment() {
        let dir = TempDir::new().unwrap();
        let site = site_in(&dir);
        fs::write(site.posts_dir.join("a.md"), "one").unwrap();
        run_with_options(&site, false).unwrap();

        fs::remove_file(site.posts_dir.join("a.html")).unwrap();
        let report = run_with_options(&site, false).unwrap();
        assert_eq!(report.rendered, 1);
        assert!(site.posts_dir.join("a.html").exists());
    }

    #[test]
    fn test_build_lists_unlisted_posts() {
        let dir = TempDir::new().unwrap();
        let site = site_in(&dir);

        let mut listing = Listing::default();
        listing.upsert(PostEntry {
            title: "Known".to_string(),
            slug: "known".to_string(),
            date: String::new(),
            description: String::new(),
        });
        listing.save(&site.post_index()).unwrap();

        fs::write(site.posts_dir.join("known.md"), "---\ndate: May 01, 2024\n---\nbody").unwrap();
        fs::write(site.posts_dir.join("fresh.md"), "# Fresh Post\nbody").unwrap();

        let report = run_with_options(&site, false).unwrap();
        assert_eq!(report.listed, ["fresh"]);

        let listing: Listing<PostEntry> = Listing::load(&site.post_index()).unwrap();
        let slugs: Vec<_> = listing.entries().iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["known", "fresh"]);
        assert_eq!(listing.entries()[0].date, "May 01, 2024");
        assert_eq!(listing.entries()[1].title, "Fresh Post");
    }

    #[test]
    fn test_is_source_change() {
        assert!(is_source_change(Path::new("posts/a.md")));
        assert!(is_source_change(Path::new("posts/posts.json")));
        assert!(is_source_change(Path::new("_config.yml")));
        assert!(!is_source_change(Path::new("posts/a.html")));
        assert!(!is_source_change(Path::new("posts/a.md~")));
    }
}
