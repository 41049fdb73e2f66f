//! Unicode-styled plain text for the platform's paste target.
//!
//! A recursive fold over the document: each element folds its children to a
//! string, then applies its own character transform and structural wrapper.
//! The result is one-way. Nothing parses it back into a [`Document`].

use crate::dom::{Document, Element, Node, Tag, fold_line_breaks, is_html_space, is_insignificant};

use super::glyphs::{to_bold, to_italic, to_underline};

/// Fold a document to Unicode-styled text.
///
/// # Examples
///
/// ```
/// use postglyph::Document;
/// use postglyph::export::to_styled_text;
///
/// let doc = Document::parse(r#"<a href="https://x.example">Site</a>"#);
/// assert_eq!(to_styled_text(&doc), "Site (https://x.example)");
/// ```
pub fn to_styled_text(doc: &Document) -> String {
    let folded = fold_children(&doc.children, true, false);
    collapse_blank_lines(&folded).trim().to_string()
}

/// Fold a run of siblings. `verbatim` text (inside a code block) keeps its
/// whitespace as written.
fn fold_children(nodes: &[Node], in_block: bool, verbatim: bool) -> String {
    let mut out = String::new();
    for (idx, node) in nodes.iter().enumerate() {
        match node {
            Node::Text(text) if verbatim => out.push_str(text),
            Node::Text(text) => {
                if is_insignificant(nodes, idx) {
                    continue;
                }
                let text = fold_line_breaks(text);
                let at_line_start = out.ends_with('\n') || (out.is_empty() && in_block);
                if at_line_start {
                    out.push_str(text.trim_start_matches(is_html_space));
                } else {
                    out.push_str(&text);
                }
            }
            Node::Element(el) => out.push_str(&fold_element(el, verbatim)),
        }
    }
    out
}

fn fold_element(el: &Element, verbatim: bool) -> String {
    let verbatim = verbatim || el.tag == Tag::Pre;
    let folded = || fold_children(&el.children, el.tag.is_block(), verbatim);
    match el.tag {
        Tag::Strong | Tag::B => to_bold(&folded()),
        Tag::Em | Tag::I => to_italic(&folded()),
        Tag::U => to_underline(&folded()),
        Tag::S | Tag::Del | Tag::Strike => format!("~{}~", folded()),
        Tag::H1 => format!("\n\n{}\n\n", to_bold(&folded().to_uppercase())),
        Tag::H2 => format!("\n\n{}\n\n", to_bold(&folded())),
        // The platform has no deeper levels; h4-h6 read like h3.
        Tag::H3 | Tag::H4 | Tag::H5 | Tag::H6 => format!("\n\n{}\n", to_bold(&folded())),
        Tag::P => format!("{}\n\n", folded()),
        Tag::Br => "\n".to_string(),
        // Ordered and unordered items share the bullet.
        Tag::Li => format!("• {}\n", folded().trim_end_matches([' ', '\n'])),
        Tag::Ul | Tag::Ol => format!("\n{}\n", folded()),
        Tag::Blockquote => format!("\n❝ {} ❞\n\n", folded().trim()),
        Tag::Code => format!("`{}`", folded()),
        Tag::Pre => {
            let code = folded();
            let code = code.strip_suffix('\n').unwrap_or(code.as_str());
            format!("\n```\n{code}\n```\n\n")
        }
        Tag::A => match el.href() {
            Some(href) => format!("{} ({href})", folded()),
            None => folded(),
        },
    }
}

/// Cap runs of line breaks at two.
///
/// Spaces and tabs in front of every line break are stripped as well, not
/// only on blank lines, so trailing indentation inside code blocks goes too.
fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newlines = 0;
    for c in text.chars() {
        if c == '\n' {
            let trimmed = out.trim_end_matches([' ', '\t']).len();
            out.truncate(trimmed);
            newlines += 1;
            if newlines <= 2 {
                out.push(c);
            }
        } else {
            // Spaces between line breaks are trimmed at the next break.
            if !matches!(c, ' ' | '\t') {
                newlines = 0;
            }
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::export::glyphs::{bold, italic};

    fn styled(html: &str) -> String {
        to_styled_text(&Document::parse(html))
    }

    #[test]
    fn test_bold_and_italic_paragraph() {
        assert_eq!(
            styled("<p><strong>Hello</strong> <em>world</em></p>"),
            "𝗛𝗲𝗹𝗹𝗼 𝘸𝘰𝘳𝘭𝘥"
        );
    }

    #[test]
    fn test_link_appends_href() {
        assert_eq!(
            styled(r#"<a href="https://x.example">Site</a>"#),
            "Site (https://x.example)"
        );
        assert_eq!(styled("<p><a>bare</a></p>"), "bare");
    }

    #[test]
    fn test_empty_paragraphs_collapse() {
        assert_eq!(styled("<p>a</p><p></p><p></p><p></p><p>b</p>"), "a\n\nb");
    }

    #[test]
    fn test_headings() {
        assert_eq!(styled("<h1>Big news</h1><p>x</p>"), "𝗕𝗜𝗚 𝗡𝗘𝗪𝗦\n\nx");
        assert_eq!(styled("<h2>Sub</h2><p>x</p>"), "𝗦𝘂𝗯\n\nx");
        assert_eq!(styled("<h3>Small</h3><p>x</p>"), "𝗦𝗺𝗮𝗹𝗹\nx");
        assert_eq!(styled("<h5>Small</h5><p>x</p>"), "𝗦𝗺𝗮𝗹𝗹\nx");
    }

    #[test]
    fn test_lists_use_bullets() {
        assert_eq!(styled("<ul><li>One</li><li>Two</li></ul>"), "• One\n• Two");
        assert_eq!(styled("<ol><li>One</li><li>Two</li></ol>"), "• One\n• Two");
        assert_eq!(
            styled("<p>Intro</p><ul><li>a</li></ul><p>Outro</p>"),
            "Intro\n\n• a\n\nOutro"
        );
    }

    #[test]
    fn test_blockquote() {
        assert_eq!(styled("<blockquote>wise words</blockquote>"), "❝ wise words ❞");
        assert_eq!(
            styled("<blockquote><p>wise</p></blockquote><p>x</p>"),
            "❝ wise ❞\n\nx"
        );
    }

    #[test]
    fn test_strikethrough_and_underline() {
        assert_eq!(styled("<p><s>old</s> <del>x</del> <strike>y</strike></p>"), "~old~ ~x~ ~y~");
        assert_eq!(styled("<p><u>ab</u></p>"), "a\u{332}b\u{332}");
        assert_eq!(styled("<p><u>a<br>b</u></p>"), "a\u{332}\nb\u{332}");
    }

    #[test]
    fn test_code() {
        assert_eq!(styled("<p>run <code>ls</code></p>"), "run `ls`");
        assert_eq!(
            styled("<p>x</p><pre>let a = 1;\n  b</pre><p>y</p>"),
            "x\n\n```\nlet a = 1;\n  b\n```\n\ny"
        );
    }

    #[test]
    fn test_code_block_folds_inline_markup() {
        assert_eq!(styled("<pre><code>x = 1</code></pre>"), "```\n`x = 1`\n```");
        assert_eq!(
            styled("<pre><strong>ab</strong></pre>"),
            format!("```\n{}{}\n```", bold('a'), bold('b'))
        );
        assert_eq!(styled("<pre>  a\n\n  <em>b</em></pre>"), "```\n  a\n\n  𝘣\n```");
    }

    #[test]
    fn test_nested_styles() {
        assert_eq!(styled("<p><strong>a <em>b</em></strong></p>"), "𝗮 𝘣");
        assert_eq!(styled("<h1><em>x</em></h1>"), "𝘹");
    }

    #[test]
    fn test_line_breaks() {
        assert_eq!(styled("<p>a<br>b</p>"), "a\nb");
        assert_eq!(styled("<p>a<br><br><br><br>b</p>"), "a\n\nb");
    }

    #[test]
    fn test_source_whitespace_ignored() {
        assert_eq!(styled("<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>"), "• a\n• b");
        assert_eq!(styled("<p>\n  a\n  b\n</p>"), "a b");
    }

    #[test]
    fn test_non_latin_passes_through() {
        assert_eq!(styled("<p><strong>Grüße 中文!</strong></p>"), "𝗚𝗿üß𝗲 中文!");
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(styled(""), "");
        assert_eq!(styled("<p></p><p> </p>"), "");
    }

    #[test]
    fn test_collapse_blank_lines() {
        assert_eq!(collapse_blank_lines("a\n\n\n\nb"), "a\n\nb");
        assert_eq!(collapse_blank_lines("a  \n \n\t\nb"), "a\n\nb");
        assert_eq!(collapse_blank_lines("a  \nb\t\nc"), "a\nb\nc");
        assert_eq!(styled("<pre>let a = 1;  \nb</pre>"), "```\nlet a = 1;\nb\n```");
    }

    proptest! {
        #[test]
        fn prop_bold_glyph_coverage(c in "[A-Za-z0-9]") {
            let ch = c.chars().next().unwrap();
            prop_assert_eq!(styled(&format!("<strong>{c}</strong>")), bold(ch).to_string());
            prop_assert_ne!(bold(ch), ch);
        }

        #[test]
        fn prop_italic_glyph_coverage(c in "[A-Za-z]") {
            let ch = c.chars().next().unwrap();
            prop_assert_eq!(styled(&format!("<em>{c}</em>")), italic(ch).to_string());
            prop_assert_ne!(italic(ch), ch);
        }

        #[test]
        fn prop_punctuation_unchanged(c in "[!#$%()*+,./:;=?@^_{|}~-]") {
            prop_assert_eq!(styled(&format!("<strong>{c}</strong>")), c.clone());
            prop_assert_eq!(styled(&format!("<em>{c}</em>")), c);
        }

        #[test]
        fn prop_no_three_line_breaks(parts in prop::collection::vec(
            prop_oneof![
                Just("<p>"), Just("</p>"), Just("<br>"), Just("<h1>"), Just("</h1>"),
                Just("<h3>"), Just("</h3>"), Just("<ul><li>"), Just("</li></ul>"),
                Just("<blockquote>"), Just("</blockquote>"), Just("<pre>\n\n"),
                Just("</pre>"), Just("\n\n\n"), Just("a"), Just(" "),
            ],
            0..24,
        )) {
            let out = styled(&parts.concat());
            prop_assert!(!out.contains("\n\n\n"), "got {:?}", out);
        }
    }
}
