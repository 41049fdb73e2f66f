//! Plain-text projection and length accounting.
//!
//! The projection is the one number the editor compares against the
//! platform limit, so both editing surfaces must land on the same string:
//! text leaves are concatenated, every `br` and block boundary contributes
//! exactly one line break, and source formatting whitespace is ignored.

use crate::dom::{Document, Element, Node, Tag, fold_line_breaks, is_html_space, is_insignificant};

/// The platform's post length limit, in characters.
pub const PLATFORM_CHAR_LIMIT: usize = 3000;

/// Character count of a projection against [`PLATFORM_CHAR_LIMIT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthReport {
    pub chars: usize,
    pub limit: usize,
    pub over_limit: bool,
}

impl LengthReport {
    pub fn new(chars: usize) -> Self {
        Self {
            chars,
            limit: PLATFORM_CHAR_LIMIT,
            over_limit: chars > PLATFORM_CHAR_LIMIT,
        }
    }

    /// Characters left before the limit (zero once over it).
    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.chars)
    }
}

/// Length of a plain-text string, counted in Unicode scalar values.
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Project a document to bare text.
pub fn project(doc: &Document) -> String {
    let mut projector = Projector::default();
    projector.walk(&doc.children);
    projector
        .out
        .trim_matches(is_html_space)
        .to_string()
}

#[derive(Default)]
struct Projector {
    out: String,
    pending_boundary: bool,
}

impl Projector {
    fn walk(&mut self, nodes: &[Node]) {
        for (idx, node) in nodes.iter().enumerate() {
            match node {
                Node::Text(text) => {
                    if !is_insignificant(nodes, idx) {
                        self.push_text(text);
                    }
                }
                Node::Element(el) => self.walk_element(el),
            }
        }
    }

    fn walk_element(&mut self, el: &Element) {
        match el.tag {
            Tag::Br => {
                self.flush_boundary();
                self.trim_line_end();
                self.out.push('\n');
            }
            Tag::Pre => {
                self.pending_boundary = true;
                let text = el.text_content();
                let text = text.strip_suffix('\n').unwrap_or(text.as_str());
                if !text.is_empty() {
                    self.flush_boundary();
                    self.out.push_str(text);
                }
                self.pending_boundary = true;
            }
            tag if tag.is_block() => {
                self.pending_boundary = true;
                self.walk(&el.children);
                self.pending_boundary = true;
            }
            _ => self.walk(&el.children),
        }
    }

    fn push_text(&mut self, text: &str) {
        let text = fold_line_breaks(text);
        let at_line_start =
            self.pending_boundary || self.out.is_empty() || self.out.ends_with('\n');
        let text = if at_line_start {
            text.trim_start_matches(is_html_space)
        } else {
            &text[..]
        };
        if text.is_empty() {
            return;
        }
        self.flush_boundary();
        self.out.push_str(text);
    }

    /// A boundary becomes a line break only between two pieces of content,
    /// and never doubles one that is already there.
    fn flush_boundary(&mut self) {
        if !self.pending_boundary {
            return;
        }
        self.pending_boundary = false;
        self.trim_line_end();
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
    }

    fn trim_line_end(&mut self) {
        let trimmed = self.out.trim_end_matches([' ', '\t']).len();
        self.out.truncate(trimmed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(html: &str) -> String {
        project(&Document::parse(html))
    }

    #[test]
    fn test_paragraphs() {
        assert_eq!(plain("<p>a</p><p>b</p>"), "a\nb");
    }

    #[test]
    fn test_inline_markup_adds_nothing() {
        assert_eq!(plain("<p><strong>Hello</strong> <em>world</em></p>"), "Hello world");
        assert_eq!(plain(r#"<p><a href="https://x.example">Site</a></p>"#), "Site");
    }

    #[test]
    fn test_line_breaks() {
        assert_eq!(plain("<p>a<br>b</p>"), "a\nb");
        assert_eq!(plain("<p>a<br><br>b</p>"), "a\n\nb");
    }

    #[test]
    fn test_empty_paragraph_line() {
        assert_eq!(plain("<p>a</p><p><br></p><p>b</p>"), "a\n\nb");
    }

    #[test]
    fn test_trailing_break_absorbed_by_boundary() {
        assert_eq!(plain("<p>a<br></p><p>b</p>"), "a\nb");
    }

    #[test]
    fn test_lists_and_quotes() {
        assert_eq!(plain("<ul><li>One</li><li>Two</li></ul>"), "One\nTwo");
        assert_eq!(plain("<ul><li>a<ul><li>b</li></ul></li></ul>"), "a\nb");
        assert_eq!(plain("<blockquote><p>q</p></blockquote><p>x</p>"), "q\nx");
    }

    #[test]
    fn test_source_whitespace_ignored() {
        assert_eq!(plain("<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>"), "a\nb");
        assert_eq!(plain("<p>a\n   b</p>"), "a b");
        assert_eq!(plain("<p>  a</p>"), "a");
    }

    #[test]
    fn test_pre_is_verbatim() {
        assert_eq!(plain("<pre>a  b\n  c\n</pre>"), "a  b\n  c");
    }

    #[test]
    fn test_nbsp_is_content() {
        assert_eq!(char_count(&plain("<p>a\u{a0}b</p>")), 3);
    }

    #[test]
    fn test_char_count_is_scalar_values() {
        assert_eq!(char_count("héllo"), 5);
        assert_eq!(char_count("👍"), 1);
    }

    #[test]
    fn test_length_report() {
        let report = LengthReport::new(3000);
        assert!(!report.over_limit);
        assert_eq!(report.remaining(), 0);
        let report = LengthReport::new(3001);
        assert!(report.over_limit);
        assert_eq!(LengthReport::new(10).remaining(), 2990);
    }
}
