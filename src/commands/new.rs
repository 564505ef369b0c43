//! Add a new post or project

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::listing::{require, Listing, PostEntry, ProjectEntry};
use crate::Site;

/// Options for `new post`
#[derive(Debug, Default, Clone)]
pub struct PostOptions {
    pub description: Option<String>,
    /// Overrides the slug derived from the title
    pub slug: Option<String>,
    /// Overrides today's date
    pub date: Option<String>,
    /// Overwrite an existing markdown file
    pub force: bool,
}

/// Starter content for a fresh post
fn post_template(title: &str) -> String {
    format!(
        r#"# {title}

Write your post content here.

## Heading 2

You can use markdown formatting:

- **Bold text**
- *Italic text*
- [Links](https://example.com)
- `code`

```python
# Code blocks
def example():
    pass
```

## Another Section

Add more content here.
"#
    )
}

/// URL slug for a title; apostrophes are dropped rather than split on
fn slugify(text: &str) -> String {
    let text: String = text.chars().filter(|c| !matches!(c, '\'' | '\u{2019}')).collect();
    slug::slugify(text)
}

/// Today's date in the configured chrono format
fn today(format: &str) -> Result<String> {
    use chrono::format::{Item, StrftimeItems};

    let items: Vec<Item> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        anyhow::bail!("Invalid date_format: {:?}", format);
    }
    Ok(chrono::Local::now()
        .format_with_items(items.into_iter())
        .to_string())
}

/// Write `posts/<slug>.md` and put the post at the top of `posts.json`
pub fn create_post(site: &Site, title: &str, options: &PostOptions) -> Result<PathBuf> {
    let title = title.trim();
    require("Title", title)?;

    let slug = match options.slug.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => slugify(s),
        _ => slugify(title),
    };
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a URL slug from {:?}", title);
    }

    let date = match options.date.as_deref().map(str::trim) {
        Some(d) if !d.is_empty() => d.to_string(),
        _ => today(&site.config.date_format)?,
    };

    fs::create_dir_all(&site.posts_dir)?;
    let file_path = site.posts_dir.join(format!("{}.md", slug));

    if file_path.exists() && !options.force {
        anyhow::bail!(
            "File already exists: {:?} (use --force to overwrite)",
            file_path
        );
    }

    fs::write(&file_path, post_template(title))?;
    println!("Created: {:?}", file_path);

    let index = site.post_index();
    let mut posts: Listing<PostEntry> = Listing::load(&index)?;
    posts.upsert(PostEntry::new(
        title,
        &slug,
        &date,
        options.description.as_deref().unwrap_or_default(),
    ));
    posts.save(&index)?;
    println!("Updated: {:?}", index);
    tracing::info!("Added post {} ({} posts listed)", slug, posts.len());

    Ok(file_path)
}

/// Put a project at the top of `projects.json`
pub fn create_project(site: &Site, title: &str, url: &str, description: Option<&str>) -> Result<()> {
    let title = title.trim();
    let url = url.trim();
    require("Title", title)?;
    require("URL", url)?;

    let index = site.project_index();
    let mut projects: Listing<ProjectEntry> = Listing::load(&index)?;
    projects.upsert(ProjectEntry::new(title, url, description.unwrap_or_default()));
    projects.save(&index)?;

    println!("Updated: {:?}", index);
    tracing::info!("Added project {} ({} projects listed)", title, projects.len());

    Ok(())
}
