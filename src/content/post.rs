//! Post model

use serde::Serialize;
use std::path::PathBuf;

use super::listing::PostEntry;
use super::FrontMatter;

/// A markdown post loaded from `posts/<slug>.md`
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// File stem; also the `?post=` value the blog page looks up
    pub slug: String,

    /// Title from front-matter, the first H1, or the slug
    pub title: String,

    /// Display date from front-matter, as written
    pub date: Option<String>,

    pub description: Option<String>,

    /// Raw markdown content, front-matter included
    pub raw: String,

    /// Rendered HTML fragment
    pub content: String,

    pub front_matter: FrontMatter,

    /// Full source file path
    pub source: PathBuf,
}

impl Post {
    /// Where the rendered fragment goes, next to the source
    pub fn output_path(&self) -> PathBuf {
        self.source.with_extension("html")
    }

    /// Listing record for a post that `posts.json` does not know yet
    pub fn to_entry(&self) -> PostEntry {
        PostEntry::new(
            &self.title,
            &self.slug,
            self.date.as_deref().unwrap_or_default(),
            self.description.as_deref().unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Post {
        Post {
            slug: "hello".to_string(),
            title: "Hello".to_string(),
            date: Some("May 01, 2024".to_string()),
            description: None,
            raw: String::new(),
            content: String::new(),
            front_matter: FrontMatter::default(),
            source: PathBuf::from("site/posts/hello.md"),
        }
    }

    #[test]
    fn test_output_path() {
        assert_eq!(sample().output_path(), PathBuf::from("site/posts/hello.html"));
    }

    #[test]
    fn test_to_entry() {
        let entry = sample().to_entry();
        assert_eq!(entry.slug, "hello");
        assert_eq!(entry.date, "May 01, 2024");
        assert_eq!(entry.description, "Blog post: Hello");
    }
}
