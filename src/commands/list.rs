//! List site content

use anyhow::Result;

use crate::content::listing::{Listing, PostEntry, ProjectEntry};
use crate::content::loader::ContentLoader;
use crate::Site;

/// List site content by type
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    let loader = ContentLoader::new(site);

    match content_type {
        "post" | "posts" => {
            for line in post_lines(&loader.load_post_listing()?) {
                println!("{}", line);
            }
        }
        "project" | "projects" => {
            for line in project_lines(&loader.load_project_listing()?) {
                println!("{}", line);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: posts, projects",
                content_type
            );
        }
    }

    Ok(())
}

fn post_lines(posts: &Listing<PostEntry>) -> Vec<String> {
    let mut lines = vec![format!("Posts ({}):", posts.len())];
    for post in posts.entries() {
        let date = if post.date.is_empty() { "-" } else { post.date.as_str() };
        lines.push(format!("  {} - {} [{}]", date, post.title, post.slug));
    }
    lines
}

fn project_lines(projects: &Listing<ProjectEntry>) -> Vec<String> {
    let mut lines = vec![format!("Projects ({}):", projects.len())];
    for project in projects.entries() {
        lines.push(format!("  {} <{}>", project.title, project.url));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_lines() {
        let mut posts = Listing::default();
        posts.upsert(PostEntry::new("Older", "older", "", ""));
        posts.upsert(PostEntry::new("Hello", "hello", "May 01, 2024", ""));

        assert_eq!(
            post_lines(&posts),
            [
                "Posts (2):",
                "  May 01, 2024 - Hello [hello]",
                "  - - Older [older]"
            ]
        );
    }

    #[test]
    fn test_project_lines() {
        let mut projects = Listing::default();
        projects.upsert(ProjectEntry::new("Tool", "https://x", ""));
        assert_eq!(project_lines(&projects), ["Projects (1):", "  Tool <https://x>"]);
    }
}
