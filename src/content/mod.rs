//! Content module - front-matter, markdown rendering, posts and listings

mod frontmatter;
mod heading;
pub mod listing;
pub mod loader;
pub mod markdown;
mod post;

pub use frontmatter::{extract_front_matter, FrontMatter};
pub use heading::{first_heading, strip_first_heading};
pub use markdown::render_markdown;
pub use post::Post;
