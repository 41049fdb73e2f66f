//! Markdown → structured HTML.

use pulldown_cmark::{Event, Options, Parser, html};

use crate::dom::Document;
use crate::error::Result;
use crate::sanitize::sanitize;
use crate::util;

fn options() -> Options {
    Options::ENABLE_STRIKETHROUGH
}

/// Render Markdown to HTML without sanitizing.
///
/// Single newlines inside a paragraph become line breaks: post drafts are
/// written line by line and a soft wrap would join the lines.
fn render_unsafe_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, options()).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });

    let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut html_output, parser);
    html_output
}

/// Convert Markdown to sanitized HTML, reporting parser failures.
pub fn try_markdown_to_html(markdown: &str) -> Result<String> {
    let raw = util::guard("markdown parsing", || render_unsafe_html(markdown))?;
    Ok(sanitize(&raw))
}

/// Parse Markdown straight into a [`Document`].
pub fn parse_markdown(markdown: &str) -> Result<Document> {
    let raw = util::guard("markdown parsing", || render_unsafe_html(markdown))?;
    Ok(Document::parse(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Tag;

    #[test]
    fn test_heading_and_emphasis() {
        let doc = parse_markdown("# Title\n\nSome *text*.").unwrap();
        let tags: Vec<_> = doc.elements().map(|e| e.tag).collect();
        assert_eq!(tags, vec![Tag::H1, Tag::P, Tag::Em]);

        let h1 = doc.elements().next().unwrap();
        assert_eq!(h1.text_content(), "Title");
        let p = doc.elements().find(|e| e.tag == Tag::P).unwrap();
        assert_eq!(p.text_content(), "Some text.");
        let em = doc.elements().find(|e| e.tag == Tag::Em).unwrap();
        assert_eq!(em.text_content(), "text");
    }

    #[test]
    fn test_soft_break_becomes_line_break() {
        let html = try_markdown_to_html("line one\nline two").unwrap();
        assert!(html.contains("line one<br>"), "got {html}");
    }

    #[test]
    fn test_strikethrough() {
        let html = try_markdown_to_html("~~gone~~").unwrap();
        assert!(html.contains("<del>gone</del>"), "got {html}");
    }

    #[test]
    fn test_raw_html_is_sanitized() {
        let html = try_markdown_to_html("hi <script>alert(1)</script>\n\n<img src=x onerror=y>").unwrap();
        assert!(!html.contains("script"));
        assert!(!html.contains("img"));
        assert!(html.contains("<p>hi"));
    }

    #[test]
    fn test_links_keep_safe_href() {
        let html = try_markdown_to_html("[Site](https://x.example) [bad](javascript:alert(1))")
            .unwrap();
        assert!(html.contains(r#"<a href="https://x.example">Site</a>"#));
        assert!(html.contains("<a>bad</a>"));
    }

    #[test]
    fn test_tables_are_not_enabled() {
        let doc = parse_markdown("| a | b |\n|---|---|\n| 1 | 2 |").unwrap();
        assert!(doc.elements().all(|e| Tag::ALL.contains(&e.tag)));
        assert!(doc.text_content().contains('|'));
    }
}
