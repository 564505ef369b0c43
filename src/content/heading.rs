//! Leading title removal

use lazy_static::lazy_static;
use regex::Regex;

use super::frontmatter::FRONT_MATTER;

lazy_static! {
    static ref LEADING_H1: Regex = Regex::new(r"^#[ \t]+.*\n").unwrap();
    static ref ANY_H1: Regex = Regex::new(r"(?m)^#[ \t]+(.*?)[ \t]*\r?$").unwrap();
}

/// Drop the front-matter block and a leading `# Title` line.
///
/// Post pages already print the title from the listing, so the first H1 of
/// the body would show up twice. A heading without a trailing newline is kept.
pub fn strip_first_heading(doc: &str) -> String {
    let body = FRONT_MATTER.replace(doc, "");
    LEADING_H1.replace(&body, "").into_owned()
}

/// Text of the first level-1 heading anywhere in the document
pub fn first_heading(doc: &str) -> Option<&str> {
    ANY_H1
        .captures(doc)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|title| !title.is_empty())
}
