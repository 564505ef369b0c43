//! Front-matter parsing

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

lazy_static! {
    /// `---` line, metadata lines, closing `---` line, anchored at the very start
    pub(crate) static ref FRONT_MATTER: Regex =
        Regex::new(r"^---\s*\n([\s\S]*?)\n---\s*\n").unwrap();
}

/// Key/value metadata from the head of a post
///
/// Every value is kept as a plain string. Duplicate keys keep the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FrontMatter {
    fields: BTreeMap<String, String>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> (Self, &str) {
        let Some(caps) = FRONT_MATTER.captures(content) else {
            return (Self::default(), content);
        };

        let block = caps.get(1).map_or("", |m| m.as_str());
        let end = caps.get(0).map_or(0, |m| m.end());

        (Self::parse_block(block), &content[end..])
    }

    /// Parse the lines between the delimiters. Lines without a colon are skipped.
    fn parse_block(block: &str) -> Self {
        let mut fields = BTreeMap::new();
        for line in block.lines() {
            if let Some((key, value)) = line.split_once(':') {
                fields.insert(key.trim().to_string(), value.trim().to_string());
            }
        }
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title")
    }

    pub fn date(&self) -> Option<&str> {
        self.get("date")
    }

    pub fn description(&self) -> Option<&str> {
        self.get("description")
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Split a document into its metadata and body.
///
/// Documents without a leading `---` block come back untouched with empty
/// metadata. This never fails; unparsable lines are just absent keys.
pub fn extract_front_matter(doc: &str) -> (FrontMatter, &str) {
    FrontMatter::parse(doc)
}
