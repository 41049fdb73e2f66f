//! Structured document → Markdown rendering.
//!
//! Pure string accumulation over a sanitized [`Document`]; no I/O. The
//! rendering keeps block structure with a pending-newline state machine and a
//! line prefix stack (list indentation, `> ` for quotes), so nested content
//! lines up without a second formatting pass.
//!
//! Lossy steps: `h4`-`h6` render as `###`, `u` keeps only its text, a line
//! break at the end of a block or inside a heading is dropped (Markdown
//! cannot express it).
//!
//! Emphasis only gets `*`/`~~` delimiters where CommonMark's flanking rules
//! read them back as the same span; elsewhere (`a<strong>!</strong>`,
//! `<em>a</em><em>b</em>`) the element is written as inline HTML, which the
//! Markdown side passes through.

use std::borrow::Cow;
use std::fmt::{self, Write};

use crate::dom::{Document, Element, Node, Tag, fold_line_breaks, is_html_space, is_insignificant};
use crate::error::Result;

use super::escape::{calculate_fence_length, calculate_inline_code_ticks, escape_markdown};

/// Configuration for Markdown rendering.
#[derive(Debug, Clone)]
pub struct MarkdownConfig {
    /// Marker for unordered list items.
    pub bullet_marker: char,
    /// Deepest heading level emitted; deeper headings are clamped to it.
    pub max_heading_level: u8,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            bullet_marker: '-',
            max_heading_level: 3,
        }
    }
}

/// Tracks list context for numbering.
#[derive(Debug, Clone)]
struct ListContext {
    is_ordered: bool,
    counter: usize,
    is_tight: bool,
}

/// Rendering state.
pub struct RenderContext<'a> {
    config: &'a MarkdownConfig,
    output: String,
    line_prefix: String,
    list_stack: Vec<ListContext>,
    at_line_start: bool,
    /// Only the line prefix or a list marker has been written on this line.
    fresh_line: bool,
    pending_newline: bool,
    pending_breaks: usize,
    in_heading: bool,
    last_block: Option<Tag>,
}

impl<'a> RenderContext<'a> {
    pub fn new(config: &'a MarkdownConfig) -> Self {
        Self {
            config,
            output: String::new(),
            line_prefix: String::new(),
            list_stack: Vec::new(),
            at_line_start: true,
            fresh_line: true,
            pending_newline: false,
            pending_breaks: 0,
            in_heading: false,
            last_block: None,
        }
    }

    /// Render the document, consuming the context.
    pub fn render(mut self, doc: &Document) -> Result<String> {
        self.walk_nodes(&doc.children, ' ')?;
        if !self.at_line_start {
            self.output.push('\n');
        }
        Ok(self.output)
    }

    fn write_prefix_if_needed(&mut self) {
        if self.at_line_start {
            self.output.push_str(&self.line_prefix);
            self.at_line_start = false;
            self.fresh_line = true;
        }
    }

    /// Flush pending paragraph breaks and hard breaks, then write the line
    /// prefix if we are at the start of a line.
    fn ensure_line_started(&mut self) {
        if self.pending_newline {
            self.pending_newline = false;
            self.pending_breaks = 0;
            if !self.at_line_start {
                self.write_newline();
            }
            self.write_blank_line();
        }
        while self.pending_breaks > 0 {
            self.pending_breaks -= 1;
            self.write_prefix_if_needed();
            self.output.push('\\');
            self.write_newline();
        }
        self.write_prefix_if_needed();
    }

    fn write_newline(&mut self) {
        self.output.push('\n');
        self.at_line_start = true;
        self.fresh_line = true;
    }

    /// A blank line that stays inside the current quote.
    fn write_blank_line(&mut self) {
        self.output.push_str(self.line_prefix.trim_end());
        self.write_newline();
    }

    fn start_block(&mut self, tag: Tag) {
        self.pending_breaks = 0;
        let mid_line = !self.at_line_start && !self.fresh_line;
        let is_list = matches!(tag, Tag::Ul | Tag::Ol);
        if self.pending_newline || (mid_line && !is_list) {
            self.pending_newline = false;
            if !self.at_line_start {
                self.write_newline();
            }
            self.write_blank_line();
        }
    }

    fn end_block(&mut self, tag: Tag) {
        self.pending_newline = true;
        self.pending_breaks = 0;
        self.last_block = Some(tag);
    }

    /// Adjacent lists of the same kind would merge into one.
    fn needs_list_separator(&self, tag: Tag) -> bool {
        matches!(
            (self.last_block, tag),
            (Some(Tag::Ul), Tag::Ul) | (Some(Tag::Ol), Tag::Ol)
        ) && self.pending_newline
    }

    fn write_list_separator(&mut self) {
        self.ensure_line_started();
        self.output.push_str("<!-- -->");
        self.fresh_line = false;
        self.pending_newline = true;
    }

    /// Render a run of siblings. `after` is the first character written
    /// once the run is done.
    fn walk_nodes(&mut self, nodes: &[Node], after: char) -> fmt::Result {
        let nodes = splice_transparent(nodes);
        for (idx, node) in nodes.iter().enumerate() {
            match node {
                Node::Text(text) => {
                    if !is_insignificant(&nodes, idx) {
                        self.write_text(text);
                    }
                }
                Node::Element(el) => {
                    let next = lead_char(&nodes, idx + 1).unwrap_or(after);
                    self.walk_element(el, next)?;
                }
            }
        }
        Ok(())
    }

    fn walk_element(&mut self, el: &Element, after: char) -> fmt::Result {
        let tag = el.tag;
        match tag {
            Tag::P => {
                self.start_block(tag);
                if let Some(breaks) = break_only(el) {
                    // A blank line typed in the rich editor. Raw <br> keeps it.
                    self.ensure_line_started();
                    for _ in 0..breaks {
                        self.output.push_str("<br>");
                    }
                    self.fresh_line = false;
                } else {
                    self.walk_nodes(&el.children, ' ')?;
                }
                self.end_block(tag);
            }

            Tag::H1 | Tag::H2 | Tag::H3 | Tag::H4 | Tag::H5 | Tag::H6 => {
                self.start_block(tag);
                self.ensure_line_started();
                let level = tag
                    .heading_level()
                    .unwrap_or(1)
                    .min(self.config.max_heading_level.max(1));
                for _ in 0..level {
                    self.output.push('#');
                }
                self.output.push(' ');
                self.fresh_line = false;
                self.in_heading = true;
                self.walk_nodes(&el.children, ' ')?;
                self.in_heading = false;
                self.end_block(tag);
            }

            Tag::Ul | Tag::Ol => {
                if self.needs_list_separator(tag) {
                    self.write_list_separator();
                }
                self.start_block(tag);
                self.list_stack.push(ListContext {
                    is_ordered: tag == Tag::Ol,
                    counter: 0,
                    is_tight: is_tight_list(el),
                });
                self.walk_nodes(&el.children, ' ')?;
                self.list_stack.pop();
                self.end_block(tag);
            }

            Tag::Li => self.write_list_item(el)?,

            Tag::Blockquote => {
                self.start_block(tag);
                if !self.at_line_start {
                    self.output.push_str("> ");
                }
                let old_prefix = self.line_prefix.clone();
                self.line_prefix.push_str("> ");
                self.walk_nodes(&el.children, ' ')?;
                self.line_prefix = old_prefix;
                self.end_block(tag);
            }

            Tag::Pre => self.write_code_block(el),

            Tag::Code => self.write_inline_code(el),

            Tag::Strong | Tag::B => self.write_delimited(el, "**", after)?,
            Tag::Em | Tag::I => self.write_delimited(el, "*", after)?,
            Tag::S | Tag::Del | Tag::Strike => self.write_delimited(el, "~~", after)?,

            // No Markdown equivalent; keep the text.
            Tag::U => self.walk_nodes(&el.children, after)?,

            Tag::A => match el.href() {
                Some(href) => {
                    self.ensure_line_started();
                    self.escape_trailing_bang();
                    self.output.push('[');
                    self.fresh_line = false;
                    self.walk_nodes(&el.children, ']')?;
                    write!(self.output, "]({})", link_destination(href))?;
                }
                None => self.walk_nodes(&el.children, after)?,
            },

            Tag::Br => {
                if self.in_heading {
                    self.ensure_line_started();
                    self.output.push(' ');
                    self.fresh_line = false;
                } else {
                    self.pending_breaks += 1;
                }
            }
        }
        Ok(())
    }

    fn write_list_item(&mut self, el: &Element) -> fmt::Result {
        let (is_tight, counter) = self
            .list_stack
            .last()
            .map(|ctx| (ctx.is_tight, ctx.counter))
            .unwrap_or((true, 0));

        self.pending_newline = false;
        self.pending_breaks = 0;
        if !is_tight && counter > 0 {
            if !self.at_line_start {
                self.write_newline();
            }
            self.write_blank_line();
        } else if !self.at_line_start {
            self.write_newline();
        }
        self.ensure_line_started();

        let bullet = match self.list_stack.last_mut() {
            Some(ctx) if ctx.is_ordered => {
                ctx.counter += 1;
                format!("{}. ", ctx.counter)
            }
            Some(ctx) => {
                ctx.counter += 1;
                format!("{} ", self.config.bullet_marker)
            }
            None => format!("{} ", self.config.bullet_marker),
        };
        self.output.push_str(&bullet);
        self.fresh_line = true;

        let old_prefix = self.line_prefix.clone();
        self.line_prefix.push_str(&" ".repeat(bullet.len()));

        self.walk_nodes(&el.children, ' ')?;

        self.line_prefix = old_prefix;
        self.pending_newline = false;
        self.pending_breaks = 0;
        Ok(())
    }

    fn write_code_block(&mut self, el: &Element) {
        self.start_block(Tag::Pre);
        let text = el.text_content();
        let fence = "`".repeat(calculate_fence_length(&text, '`'));

        self.ensure_line_started();
        self.output.push_str(&fence);
        self.write_newline();
        for line in text.lines() {
            self.ensure_line_started();
            self.output.push_str(line);
            self.write_newline();
        }
        self.ensure_line_started();
        self.output.push_str(&fence);
        self.fresh_line = false;
        self.end_block(Tag::Pre);
    }

    fn write_inline_code(&mut self, el: &Element) {
        let content = el.text_content();
        let content = fold_line_breaks(&content);
        if content.is_empty() {
            return;
        }
        self.ensure_line_started();
        self.fresh_line = false;

        // A backtick right before the opening run would lengthen it.
        if self.output.ends_with('`') {
            self.output.push_str("<code>");
            self.output.push_str(&escape_markdown(&content, false));
            self.output.push_str("</code>");
            return;
        }

        let ticks = "`".repeat(calculate_inline_code_ticks(&content));
        let padded = content.starts_with(' ')
            && content.ends_with(' ')
            && !content.chars().all(|c| c == ' ');
        let spacer = if content.starts_with('`') || content.ends_with('`') || padded {
            " "
        } else {
            ""
        };
        self.output.push_str(&ticks);
        self.output.push_str(spacer);
        self.output.push_str(&content);
        self.output.push_str(spacer);
        self.output.push_str(&ticks);
    }

    /// Wrap inline content in emphasis delimiters.
    ///
    /// Whitespace at either edge moves outside the delimiters (`** a **` is
    /// not emphasis), and content without visible text gets none. When the
    /// characters around the span would stop the delimiters from opening or
    /// closing, the element is written as inline HTML instead.
    fn write_delimited(&mut self, el: &Element, delim: &str, after: char) -> fmt::Result {
        if el.text_content().chars().all(is_html_space) {
            return self.walk_nodes(&el.children, after);
        }

        self.ensure_line_started();
        let before = if self.fresh_line {
            ' '
        } else {
            self.output.chars().next_back().unwrap_or(' ')
        };
        let outer = std::mem::take(&mut self.output);
        self.walk_nodes(&el.children, after)?;
        let inner = std::mem::replace(&mut self.output, outer);

        let edge = |c: char| c == ' ' || c == '\n';
        let body = inner.trim_start_matches(edge);
        let lead = &inner[..inner.len() - body.len()];
        let core = body.trim_end_matches(edge);
        let trail = &body[core.len()..];
        let before = if lead.is_empty() { before } else { ' ' };
        let after = if trail.is_empty() { after } else { ' ' };

        self.output.push_str(lead);
        if delimiters_hold(delim, before, core, after) {
            self.output.push_str(delim);
            self.output.push_str(core);
            self.output.push_str(delim);
        } else if !core.is_empty() {
            write!(self.output, "<{0}>{core}</{0}>", el.tag.as_str())?;
        }
        self.output.push_str(trail);
        self.fresh_line = false;
        Ok(())
    }

    /// `![` opens an image; a `!` already written before a link must not
    /// join it.
    fn escape_trailing_bang(&mut self) {
        let Some(head) = self.output.strip_suffix('!') else {
            return;
        };
        let slashes = head.chars().rev().take_while(|&c| c == '\\').count();
        if slashes % 2 == 0 {
            let at = head.len();
            self.output.insert(at, '\\');
        }
    }

    fn write_text(&mut self, text: &str) {
        let text = fold_line_breaks(text);
        if text.is_empty() {
            return;
        }
        self.ensure_line_started();
        let text = if self.fresh_line {
            text.trim_start_matches(is_html_space)
        } else {
            &text[..]
        };
        if text.is_empty() {
            return;
        }
        let mut escaped = escape_markdown(text, self.fresh_line);
        if self.in_heading {
            // A trailing `#` run would read as a closing sequence.
            escaped = escaped.replace('#', "\\#");
        }
        self.output.push_str(&escaped);
        self.fresh_line = false;
    }
}

/// Elements that render as their bare text.
fn is_transparent(node: &Node) -> bool {
    matches!(node, Node::Element(el) if el.tag == Tag::U || (el.tag == Tag::A && el.href().is_none()))
}

/// Splice the children of transparent elements into the surrounding run, so
/// text on both sides of them escapes as one piece (`1<u>.</u>` is still a
/// list marker once the tags are gone).
fn splice_transparent(nodes: &[Node]) -> Cow<'_, [Node]> {
    if !nodes.iter().any(is_transparent) {
        return Cow::Borrowed(nodes);
    }
    let mut out = Vec::with_capacity(nodes.len());
    splice_into(nodes, &mut out);
    Cow::Owned(out)
}

fn splice_into(nodes: &[Node], out: &mut Vec<Node>) {
    for (idx, node) in nodes.iter().enumerate() {
        match node {
            Node::Text(_) if is_insignificant(nodes, idx) => {}
            Node::Text(text) => {
                let text = fold_line_breaks(text);
                match out.last_mut() {
                    Some(Node::Text(last)) => last.push_str(&text),
                    _ => out.push(Node::Text(text.into_owned())),
                }
            }
            Node::Element(el) if is_transparent(node) => splice_into(&el.children, out),
            Node::Element(_) => out.push(node.clone()),
        }
    }
}

/// First character the renderer will write for `nodes[from..]`, or `None`
/// when they write nothing.
///
/// Emphasis answers with its delimiter character, a block with a line
/// break. Text answers with its first character as escaped.
fn lead_char(nodes: &[Node], from: usize) -> Option<char> {
    for (idx, node) in nodes.iter().enumerate().skip(from) {
        match node {
            Node::Text(_) if is_insignificant(nodes, idx) => {}
            Node::Text(text) => {
                if let Some(c) = fold_line_breaks(text).chars().next() {
                    return Some(if needs_escape(c) { '\\' } else { c });
                }
            }
            Node::Element(el) => {
                let found = match el.tag {
                    tag if tag.is_block() => Some('\n'),
                    Tag::Br => Some('\\'),
                    Tag::Code => (!el.text_content().is_empty()).then_some('`'),
                    Tag::A if el.href().is_some() => Some('['),
                    Tag::Strong | Tag::B | Tag::Em | Tag::I => emphasis_lead(el, '*'),
                    Tag::S | Tag::Del | Tag::Strike => emphasis_lead(el, '~'),
                    _ => lead_char(&el.children, 0),
                };
                if found.is_some() {
                    return found;
                }
            }
        }
    }
    None
}

fn emphasis_lead(el: &Element, mark: char) -> Option<char> {
    if el.text_content().chars().all(is_html_space) {
        return lead_char(&el.children, 0);
    }
    match lead_char(&el.children, 0) {
        Some(c) if c.is_whitespace() => Some(' '),
        _ => Some(mark),
    }
}

/// Characters `escape_markdown` always prefixes with a backslash.
fn needs_escape(c: char) -> bool {
    matches!(c, '\\' | '*' | '_' | '~' | '[' | ']' | '`' | '|' | '<' | '>')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flank {
    Space,
    Punct,
    Word,
}

fn flank(c: char) -> Flank {
    if c.is_whitespace() {
        Flank::Space
    } else if c.is_ascii_punctuation() || !(c.is_ascii() || c.is_alphanumeric()) {
        Flank::Punct
    } else {
        Flank::Word
    }
}

/// Whether `delim` around `core`, between `before` and `after`, parses
/// back as one emphasis span.
fn delimiters_hold(delim: &str, before: char, core: &str, after: char) -> bool {
    let (Some(mark), Some(first), Some(last)) =
        (delim.chars().next(), core.chars().next(), core.chars().next_back())
    else {
        return false;
    };
    // Same-character neighbours would merge into one longer run, and a run
    // inside the span could pair with either delimiter.
    if [before, first, last, after].contains(&mark) || has_bare(core, mark) {
        return false;
    }
    let opens = flank(first) != Flank::Space
        && (flank(first) != Flank::Punct || flank(before) != Flank::Word);
    let closes = flank(last) != Flank::Space
        && (flank(last) != Flank::Punct || flank(after) != Flank::Word);
    opens && closes
}

/// Whether `text` holds `mark` without a backslash in front of it.
fn has_bare(text: &str, mark: char) -> bool {
    let mut escaped = false;
    for c in text.chars() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == mark {
            return true;
        }
    }
    false
}

/// Number of line breaks in a paragraph that holds nothing else.
fn break_only(el: &Element) -> Option<usize> {
    let mut breaks = 0;
    for (idx, child) in el.children.iter().enumerate() {
        match child {
            Node::Element(e) if e.tag == Tag::Br => breaks += 1,
            Node::Text(_) if is_insignificant(&el.children, idx) => {}
            _ => return None,
        }
    }
    (breaks > 0).then_some(breaks)
}

/// A list is tight when no item holds more than one paragraph-like block.
fn is_tight_list(list: &Element) -> bool {
    for item in list.children.iter().filter_map(Node::as_element) {
        if item.tag != Tag::Li {
            continue;
        }
        let mut block_count = 0;
        for child in item.children.iter().filter_map(Node::as_element) {
            match child.tag {
                Tag::P | Tag::H1 | Tag::H2 | Tag::H3 | Tag::H4 | Tag::H5 | Tag::H6 => {
                    block_count += 1;
                }
                Tag::Blockquote | Tag::Pre => return false,
                _ => {}
            }
        }
        if block_count > 1 {
            return false;
        }
    }
    true
}

/// Format a link destination, using the `<...>` form when the bare form
/// would end early.
fn link_destination(href: &str) -> String {
    let needs_brackets = href.contains(|c: char| c.is_whitespace() || matches!(c, '(' | ')' | '<' | '>'));
    if needs_brackets {
        format!("<{}>", href.replace('<', "%3C").replace('>', "%3E"))
    } else {
        href.to_string()
    }
}

/// Render a sanitized document to Markdown.
///
/// # Examples
///
/// ```
/// use postglyph::Document;
/// use postglyph::markdown::{MarkdownConfig, render_markdown};
///
/// let doc = Document::parse("<ul><li>One</li><li>Two</li></ul>");
/// let md = render_markdown(&doc, &MarkdownConfig::default()).unwrap();
/// assert_eq!(md, "- One\n- Two\n");
/// ```
pub fn render_markdown(doc: &Document, config: &MarkdownConfig) -> Result<String> {
    RenderContext::new(config).render(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(html: &str) -> String {
        render_markdown(&Document::parse(html), &MarkdownConfig::default()).unwrap()
    }

    #[test]
    fn test_simple_paragraph() {
        assert_eq!(render("<p>Hello, World!</p>"), "Hello, World!\n");
    }

    #[test]
    fn test_paragraphs_separated_by_blank_line() {
        assert_eq!(render("<p>one</p><p>two</p>"), "one\n\ntwo\n");
    }

    #[test]
    fn test_headings() {
        assert_eq!(render("<h1>Title</h1>"), "# Title\n");
        assert_eq!(render("<h2>Sub</h2>"), "## Sub\n");
        assert_eq!(render("<h3>Three</h3>"), "### Three\n");
    }

    #[test]
    fn test_deep_headings_clamp_to_three() {
        assert_eq!(render("<h4>a</h4>"), "### a\n");
        assert_eq!(render("<h6>b</h6>"), "### b\n");
    }

    #[test]
    fn test_emphasis() {
        assert_eq!(
            render("<p><strong>b</strong> <em>i</em> <s>s</s> <del>d</del></p>"),
            "**b** *i* ~~s~~ ~~d~~\n"
        );
        assert_eq!(render("<p>a<strong>b</strong>c</p>"), "a**b**c\n");
        assert_eq!(render("<p>(<em>x</em>)</p>"), "(*x*)\n");
    }

    #[test]
    fn test_adjacent_emphasis_does_not_merge_runs() {
        assert_eq!(render("<p><b>x</b><i>y</i></p>"), "<b>x</b>*y*\n");
        assert_eq!(render("<p><em>a</em><em>b</em></p>"), "<em>a</em>*b*\n");
        assert_eq!(render("<p><s>a</s><del>b</del></p>"), "<s>a</s>~~b~~\n");
    }

    #[test]
    fn test_emphasis_that_cannot_flank_becomes_html() {
        assert_eq!(
            render("<p><strong>Note:</strong>text</p>"),
            "<strong>Note:</strong>text\n"
        );
        assert_eq!(render("<p>a<strong>!</strong></p>"), "a<strong>!</strong>\n");
        assert_eq!(
            render("<p>Price<strong>($5)</strong>now</p>"),
            "Price<strong>($5)</strong>now\n"
        );
        assert_eq!(
            render("<p><strong><em>a</em></strong></p>"),
            "<strong>*a*</strong>\n"
        );
    }

    #[test]
    fn test_emphasis_whitespace_moves_outside() {
        assert_eq!(render("<p>a<strong> b </strong>c</p>"), "a **b** c\n");
    }

    #[test]
    fn test_empty_emphasis_has_no_delimiters() {
        assert_eq!(render("<p>a<strong> </strong>b</p>"), "ab\n");
        assert_eq!(render("<p>a <strong> </strong>b</p>"), "a b\n");
        assert_eq!(render("<p><em></em>x</p>"), "x\n");
    }

    #[test]
    fn test_underline_dropped() {
        assert_eq!(render("<p><u>under</u></p>"), "under\n");
    }

    #[test]
    fn test_unordered_list() {
        assert_eq!(render("<ul><li>One</li><li>Two</li></ul>"), "- One\n- Two\n");
    }

    #[test]
    fn test_ordered_list() {
        assert_eq!(
            render("<ol><li>a</li><li>b</li><li>c</li></ol>"),
            "1. a\n2. b\n3. c\n"
        );
    }

    #[test]
    fn test_nested_list() {
        assert_eq!(
            render("<ul><li>a<ul><li>b</li></ul></li><li>c</li></ul>"),
            "- a\n  - b\n- c\n"
        );
    }

    #[test]
    fn test_loose_list() {
        assert_eq!(
            render("<ul><li><p>a</p><p>b</p></li><li><p>c</p></li></ul>"),
            "- a\n\n  b\n\n- c\n"
        );
    }

    #[test]
    fn test_adjacent_lists_separated() {
        assert_eq!(
            render("<ul><li>a</li></ul><ul><li>b</li></ul>"),
            "- a\n\n<!-- -->\n\n- b\n"
        );
    }

    #[test]
    fn test_list_after_paragraph() {
        assert_eq!(render("<p>x</p><ul><li>a</li></ul>"), "x\n\n- a\n");
    }

    #[test]
    fn test_links() {
        assert_eq!(
            render(r#"<p><a href="https://x.example">Site</a></p>"#),
            "[Site](https://x.example)\n"
        );
        assert_eq!(render("<p><a>bare</a></p>"), "bare\n");
        assert_eq!(
            render(r#"<a href="https://x.example/a b">s</a>"#),
            "[s](<https://x.example/a b>)\n"
        );
    }

    #[test]
    fn test_inline_code() {
        assert_eq!(render("<p>run <code>ls -la</code></p>"), "run `ls -la`\n");
        assert_eq!(render("<p><code>a`b</code></p>"), "``a`b``\n");
    }

    #[test]
    fn test_adjacent_code_spans_stay_apart() {
        assert_eq!(
            render("<p><code>a</code><code>b*</code></p>"),
            "`a`<code>b\\*</code>\n"
        );
    }

    #[test]
    fn test_code_block() {
        assert_eq!(
            render("<pre>fn main() {}\nlet x = 1;</pre>"),
            "```\nfn main() {}\nlet x = 1;\n```\n"
        );
    }

    #[test]
    fn test_code_block_content_not_escaped() {
        assert_eq!(render("<pre>*x*</pre>"), "```\n*x*\n```\n");
    }

    #[test]
    fn test_blockquote() {
        assert_eq!(render("<blockquote>quoted</blockquote>"), "> quoted\n");
        assert_eq!(
            render("<blockquote><p>a</p><p>b</p></blockquote>"),
            "> a\n>\n> b\n"
        );
    }

    #[test]
    fn test_line_breaks() {
        assert_eq!(render("<p>a<br>b</p>"), "a\\\nb\n");
        assert_eq!(render("<p>a<br><br>b</p>"), "a\\\n\\\nb\n");
    }

    #[test]
    fn test_trailing_break_dropped() {
        assert_eq!(render("<p>a<br></p><p>b</p>"), "a\n\nb\n");
    }

    #[test]
    fn test_empty_paragraph_keeps_blank_line() {
        assert_eq!(render("<p>a</p><p><br></p><p>b</p>"), "a\n\n<br>\n\nb\n");
    }

    #[test]
    fn test_break_in_heading_becomes_space() {
        assert_eq!(render("<h2>a<br>b</h2>"), "## a b\n");
    }

    #[test]
    fn test_text_escaped() {
        assert_eq!(render("<p>*not bold*</p>"), "\\*not bold\\*\n");
        assert_eq!(render("<p># not a heading</p>"), "\\# not a heading\n");
        assert_eq!(render("<p>1. not a list</p>"), "1\\. not a list\n");
    }

    #[test]
    fn test_heading_hashes_escaped() {
        assert_eq!(render("<h2>C#</h2>"), "## C\\#\n");
        assert_eq!(render("<h1>a # b</h1>"), "# a \\# b\n");
    }

    #[test]
    fn test_bang_before_link_is_not_an_image() {
        assert_eq!(
            render(r#"<p>!<a href="https://x.example">a</a></p>"#),
            "\\![a](https://x.example)\n"
        );
        assert_eq!(
            render(r#"<p>\!<a href="https://x.example">a</a></p>"#),
            "\\\\\\![a](https://x.example)\n"
        );
    }

    #[test]
    fn test_markers_split_by_underline_still_escaped() {
        assert_eq!(render("<p>1<u>.</u> x</p>"), "1\\. x\n");
        assert_eq!(render("<p><u>-</u> x</p>"), "\\- x\n");
        assert_eq!(render("<p>&amp;<a>amp;</a></p>"), "\\&amp;\n");
    }

    #[test]
    fn test_source_newlines_fold_to_spaces() {
        assert_eq!(render("<p>a\n  b</p>"), "a b\n");
    }

    #[test]
    fn test_list_item_continuation_after_break() {
        assert_eq!(render("<ul><li>a<br>b</li></ul>"), "- a\\\n  b\n");
    }

    #[test]
    fn test_custom_bullet() {
        let config = MarkdownConfig {
            bullet_marker: '*',
            ..MarkdownConfig::default()
        };
        let doc = Document::parse("<ul><li>a</li></ul>");
        assert_eq!(render_markdown(&doc, &config).unwrap(), "* a\n");
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(render(""), "");
    }
}
