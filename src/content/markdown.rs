//! Markdown rendering
//!
//! Rendering is a fixed pipeline of text substitutions rather than a parse
//! tree. Each step sees the output of the step before it, so the order of
//! [`PIPELINE`] matters: later rules rely on tags that earlier rules emitted.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref H3: Regex = Regex::new(r"(?imR)^### (.*)$").unwrap();
    static ref H2: Regex = Regex::new(r"(?imR)^## (.*)$").unwrap();
    static ref H1: Regex = Regex::new(r"(?imR)^# (.*)$").unwrap();
    static ref BOLD_STARS: Regex = Regex::new(r"\*\*(.+?)\*\*").unwrap();
    static ref BOLD_UNDERSCORES: Regex = Regex::new(r"__(.+?)__").unwrap();
    static ref ITALIC_STAR: Regex = Regex::new(r"\*(.+?)\*").unwrap();
    static ref ITALIC_UNDERSCORE: Regex = Regex::new(r"_(.+?)_").unwrap();
    static ref IMAGE: Regex = Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap();
    static ref LINK: Regex = Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap();
    static ref CODE_BLOCK: Regex = Regex::new(r"```([\s\S]*?)```").unwrap();
    static ref INLINE_CODE: Regex = Regex::new(r"`([^`]+)`").unwrap();
    static ref BLOCKQUOTE: Regex = Regex::new(r"(?imR)^> (.*)$").unwrap();
}

/// A single named rewrite step
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub apply: fn(&str) -> String,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

/// Rewrite steps in the order they run
pub const PIPELINE: &[Rule] = &[
    Rule { name: "headers", apply: headers },
    Rule { name: "bold", apply: bold },
    Rule { name: "italic", apply: italic },
    // `![..](..)` must be consumed before the link rule sees its `[..](..)` tail
    Rule { name: "images", apply: images },
    Rule { name: "links", apply: links },
    Rule { name: "code_blocks", apply: code_blocks },
    Rule { name: "inline_code", apply: inline_code },
    Rule { name: "blockquotes", apply: blockquotes },
    Rule { name: "line_breaks", apply: line_breaks },
    Rule { name: "wrap_paragraph", apply: wrap_paragraph },
    Rule { name: "cleanup", apply: cleanup },
];

/// Render markdown to HTML
///
/// Never fails. Input that does not fit the rules (unbalanced markers,
/// nested lists, ...) comes out with leftover artifacts instead of an error.
pub fn render_markdown(body: &str) -> String {
    PIPELINE.iter().fold(body.to_string(), |text, rule| {
        let out = (rule.apply)(&text);
        tracing::debug!("markdown rule {}: {} -> {} bytes", rule.name, text.len(), out.len());
        out
    })
}

/// `###`, `##` and `#` at line start become `<h3>`, `<h2>`, `<h1>`.
///
/// Longest marker first, so `#` never matches inside `##`.
pub fn headers(text: &str) -> String {
    let text = H3.replace_all(text, "<h3>${1}</h3>");
    let text = H2.replace_all(&text, "<h2>${1}</h2>");
    H1.replace_all(&text, "<h1>${1}</h1>").into_owned()
}

/// `**x**` and `__x__` become `<strong>x</strong>`.
pub fn bold(text: &str) -> String {
    let text = BOLD_STARS.replace_all(text, "<strong>${1}</strong>");
    BOLD_UNDERSCORES
        .replace_all(&text, "<strong>${1}</strong>")
        .into_owned()
}

/// `*x*` and `_x_` become `<em>x</em>`. Expects [`bold`] to have run.
pub fn italic(text: &str) -> String {
    let text = ITALIC_STAR.replace_all(text, "<em>${1}</em>");
    ITALIC_UNDERSCORE
        .replace_all(&text, "<em>${1}</em>")
        .into_owned()
}

/// `![alt](url)` becomes `<img src="url" alt="alt">`.
pub fn images(text: &str) -> String {
    IMAGE
        .replace_all(text, r#"<img src="${2}" alt="${1}">"#)
        .into_owned()
}

/// `[text](url)` becomes `<a href="url">text</a>`.
pub fn links(text: &str) -> String {
    LINK.replace_all(text, r#"<a href="${2}">${1}</a>"#)
        .into_owned()
}

/// Triple-backtick fences become `<pre><code>`. Content is not escaped.
pub fn code_blocks(text: &str) -> String {
    CODE_BLOCK
        .replace_all(text, "<pre><code>${1}</code></pre>")
        .into_owned()
}

/// Single-backtick spans become `<code>`.
pub fn inline_code(text: &str) -> String {
    INLINE_CODE
        .replace_all(text, "<code>${1}</code>")
        .into_owned()
}

/// Every `> ` line gets its own `<blockquote>`; consecutive lines stay separate.
pub fn blockquotes(text: &str) -> String {
    BLOCKQUOTE
        .replace_all(text, "<blockquote>${1}</blockquote>")
        .into_owned()
}

/// Blank lines split paragraphs, remaining newlines become `<br>`.
pub fn line_breaks(text: &str) -> String {
    text.replace("\n\n", "</p><p>").replace('\n', "<br>")
}

pub fn wrap_paragraph(text: &str) -> String {
    format!("<p>{}</p>", text)
}

/// Drop empty paragraphs and `<p>` tags hugging block-level elements.
pub fn cleanup(text: &str) -> String {
    text.replace("<p></p>", "")
        .replace("<p><h", "<h")
        .replace("</h1></p>", "</h1>")
        .replace("</h2></p>", "</h2>")
        .replace("</h3></p>", "</h3>")
        .replace("<p><pre>", "<pre>")
        .replace("</pre></p>", "</pre>")
        .replace("<p><blockquote>", "<blockquote>")
        .replace("</blockquote></p>", "</blockquote>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_empty() {
        assert_eq!(render_markdown(""), "");
    }

    #[test]
    fn test_render_heading_not_wrapped() {
        assert_eq!(render_markdown("# Title"), "<h1>Title</h1>");
    }

    #[test]
    fn test_render_emphasis() {
        assert_eq!(
            render_markdown("**bold** and *italic*"),
            "<p><strong>bold</strong> and <em>italic</em></p>"
        );
    }

    #[test]
    fn test_render_link() {
        assert_eq!(
            render_markdown("[text](http://x)"),
            r#"<p><a href="http://x">text</a></p>"#
        );
    }

    #[test]
    fn test_render_image() {
        assert_eq!(
            render_markdown("![alt](http://img)"),
            r#"<p><img src="http://img" alt="alt"></p>"#
        );
    }

    #[test]
    fn test_render_image_next_to_link() {
        assert_eq!(
            render_markdown("![logo](/a.png) see [home](/)"),
            r#"<p><img src="/a.png" alt="logo"> see <a href="/">home</a></p>"#
        );
    }

    #[test]
    fn test_render_document() {
        let markdown = "# Title\n\nHello **world**.\n\n> quote\n\n```\ncode\n```";
        assert_eq!(
            render_markdown(markdown),
            "<h1>Title</h1><p>Hello <strong>world</strong>.</p>\
             <blockquote>quote</blockquote><pre><code><br>code<br></code></pre>"
        );
    }

    #[test]
    fn test_render_consecutive_headings() {
        assert_eq!(render_markdown("# A\n\n## B"), "<h1>A</h1><h2>B</h2>");
    }

    #[test]
    fn test_render_line_break_inside_paragraph() {
        assert_eq!(render_markdown("one\ntwo"), "<p>one<br>two</p>");
    }

    #[test]
    fn test_blockquote_lines_stay_separate() {
        assert_eq!(
            render_markdown("> a\n> b"),
            "<blockquote>a</blockquote><br><blockquote>b</blockquote>"
        );
    }

    #[test]
    fn test_unbalanced_markers_pass_through() {
        assert_eq!(render_markdown("**open"), "<p>**open</p>");
        assert_eq!(render_markdown("`tick"), "<p>`tick</p>");
    }

    #[test]
    fn test_render_is_total_on_odd_input() {
        for input in ["\n", "\n\n\n", "#", "> ", "```", "[](", "![", "__", "***"] {
            let _ = render_markdown(input);
        }
    }

    #[test]
    fn test_headers_rule() {
        assert_eq!(
            headers("### a\n## b\n# c\nplain # d"),
            "<h3>a</h3>\n<h2>b</h2>\n<h1>c</h1>\nplain # d"
        );
    }

    #[test]
    fn test_crlf_line_endings_stay_outside_tags() {
        assert_eq!(headers("# T\r\n## U\r\n"), "<h1>T</h1>\r\n<h2>U</h2>\r\n");
        assert_eq!(blockquotes("> q\r\n"), "<blockquote>q</blockquote>\r\n");
        assert_eq!(
            render_markdown("# Title\r\n\r\nBody"),
            "<h1>Title</h1>\r<br>\r<br>Body</p>"
        );
    }

    #[test]
    fn test_bold_rule() {
        assert_eq!(bold("**a** __b__"), "<strong>a</strong> <strong>b</strong>");
    }

    #[test]
    fn test_italic_rule() {
        assert_eq!(italic("*a* and _b_"), "<em>a</em> and <em>b</em>");
    }

    #[test]
    fn test_italic_before_bold_mangles_strong() {
        // why bold has to run first
        assert_eq!(italic("**bold**"), "<em>*bold</em>*");
    }

    #[test]
    fn test_links_rule_leaves_bang() {
        // why images has to run before links
        assert_eq!(links("![a](u)"), r#"!<a href="u">a</a>"#);
    }

    #[test]
    fn test_code_block_rule_spans_lines() {
        assert_eq!(
            code_blocks("```\nfn a() {}\n```"),
            "<pre><code>\nfn a() {}\n</code></pre>"
        );
    }

    #[test]
    fn test_code_block_content_not_escaped() {
        assert_eq!(
            code_blocks("```<b>```"),
            "<pre><code><b></code></pre>"
        );
    }

    #[test]
    fn test_inline_code_rule() {
        assert_eq!(inline_code("use `x`"), "use <code>x</code>");
    }

    #[test]
    fn test_line_breaks_rule() {
        assert_eq!(line_breaks("a\n\nb\nc"), "a</p><p>b<br>c");
    }

    #[test]
    fn test_cleanup_rule() {
        assert_eq!(
            cleanup("<p></p><p><h2>x</h2></p><p><pre>y</pre></p>"),
            "<h2>x</h2><pre>y</pre>"
        );
    }

    #[test]
    fn test_pipeline_order() {
        let names: Vec<_> = PIPELINE.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            [
                "headers",
                "bold",
                "italic",
                "images",
                "links",
                "code_blocks",
                "inline_code",
                "blockquotes",
                "line_breaks",
                "wrap_paragraph",
                "cleanup"
            ]
        );
    }
}
