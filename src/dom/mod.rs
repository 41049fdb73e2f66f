//! Structured documents.
//!
//! A [`Document`] is the sanitized, allow-listed form of rich-editor HTML: a
//! tree of text leaves and elements drawn from the closed [`Tag`] set. It is
//! built by parsing untrusted HTML with html5ever into a raw arena
//! ([`arena`]) and cleaning that arena ([`crate::sanitize`]), so any value of
//! this type already satisfies the allow-list.
//!
//! All walkers in the crate share the whitespace rules defined here:
//!
//! - a whitespace-only text node at the edge of its parent or next to a
//!   block element is insignificant (source formatting, not content)
//! - outside `pre`, a whitespace run that contains a line break reads as
//!   a single space

pub(crate) mod arena;
mod tag;
pub(crate) mod tree_sink;

pub use tag::{Attr, Disposition, Tag, disposition};

use std::borrow::Cow;

use crate::sanitize;

/// A node of a structured document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Element(Element),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    pub fn is_block(&self) -> bool {
        self.as_element().is_some_and(|el| el.tag.is_block())
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(t),
            Node::Element(el) => el.children.iter().for_each(|c| c.collect_text(out)),
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

/// An allow-listed element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: Tag,
    attrs: Vec<(Attr, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute, subject to the sanitizer's rules.
    ///
    /// Only anchors carry attributes, and an `href` with a disallowed scheme
    /// is not set at all.
    pub fn with_attr(mut self, attr: Attr, value: impl Into<String>) -> Self {
        self.set_attr(attr, value.into());
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        let child = child.into();
        if !self.tag.is_void() {
            self.children.push(child);
        }
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(Node::Text(text.into()))
    }

    pub fn attr(&self, attr: Attr) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(a, _)| *a == attr)
            .map(|(_, v)| v.as_str())
    }

    pub fn attrs(&self) -> impl Iterator<Item = (Attr, &str)> {
        self.attrs.iter().map(|(a, v)| (*a, v.as_str()))
    }

    pub fn href(&self) -> Option<&str> {
        self.attr(Attr::Href)
    }

    /// Concatenated text of all descendant text leaves.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.children.iter().for_each(|c| c.collect_text(&mut out));
        out
    }

    pub(crate) fn set_attr(&mut self, attr: Attr, value: String) {
        if self.tag != Tag::A || self.attr(attr).is_some() {
            return;
        }
        let value = match attr {
            Attr::Href => match sanitize::safe_href(&value) {
                Some(v) => v,
                None => return,
            },
            Attr::Target | Attr::Rel => value,
        };
        self.attrs.push((attr, value));
    }
}

impl From<Tag> for Element {
    fn from(tag: Tag) -> Self {
        Element::new(tag)
    }
}

impl From<Tag> for Node {
    fn from(tag: Tag) -> Self {
        Node::Element(Element::new(tag))
    }
}

/// A sanitized structured document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub children: Vec<Node>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse untrusted HTML and reduce it to the allow-list.
    pub fn parse(html: &str) -> Self {
        if html.trim().is_empty() {
            return Self::new();
        }
        let raw = tree_sink::parse_raw(html);
        sanitize::clean(&raw)
    }

    /// A document holding `text` as one unstyled paragraph.
    pub fn plain_paragraph(text: &str) -> Self {
        let mut doc = Self::new();
        if !text.is_empty() {
            doc.children.push(Element::new(Tag::P).with_text(text).into());
        }
        doc
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Concatenated text of all text leaves, with no separators.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.children.iter().for_each(|c| c.collect_text(&mut out));
        out
    }

    /// Serialize to canonical HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            write_node(child, &mut out);
        }
        out
    }

    /// Depth-first iterator over every element.
    pub fn elements(&self) -> Elements<'_> {
        Elements {
            stack: self.children.iter().rev().collect(),
        }
    }
}

/// Depth-first element iterator, document order.
pub struct Elements<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Elements<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            if let Node::Element(el) = node {
                self.stack.extend(el.children.iter().rev());
                return Some(el);
            }
        }
        None
    }
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Text(t) => out.push_str(&escape_html(t, false)),
        Node::Element(el) => {
            out.push('<');
            out.push_str(el.tag.as_str());
            for (attr, value) in el.attrs() {
                out.push(' ');
                out.push_str(attr.as_str());
                out.push_str("=\"");
                out.push_str(&escape_html(value, true));
                out.push('"');
            }
            out.push('>');
            if el.tag.is_void() {
                return;
            }
            // The parser swallows one newline right after <pre>.
            if el.tag == Tag::Pre
                && let Some(Node::Text(t)) = el.children.first()
                && t.starts_with('\n')
            {
                out.push('\n');
            }
            for child in &el.children {
                write_node(child, out);
            }
            out.push_str("</");
            out.push_str(el.tag.as_str());
            out.push('>');
        }
    }
}

/// Escape text for HTML content or a double-quoted attribute value.
pub fn escape_html(s: &str, attribute: bool) -> Cow<'_, str> {
    let needs = |c: char| matches!(c, '&' | '<' | '>') || (attribute && c == '"');
    if !s.contains(needs) {
        return Cow::Borrowed(s);
    }
    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' if attribute => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// HTML's notion of whitespace (not Unicode's: U+00A0 is content).
pub(crate) fn is_html_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C')
}

/// Whether `children[idx]` is whitespace-only text that carries no content.
pub(crate) fn is_insignificant(children: &[Node], idx: usize) -> bool {
    let Some(Node::Text(t)) = children.get(idx) else {
        return false;
    };
    if !t.chars().all(is_html_space) {
        return false;
    }
    let prev_breaks = idx == 0 || children[idx - 1].is_block();
    let next_breaks = children.get(idx + 1).is_none_or(Node::is_block);
    prev_breaks || next_breaks
}

/// Fold every whitespace run containing a line break into one space.
pub(crate) fn fold_line_breaks(text: &str) -> Cow<'_, str> {
    if !text.contains(['\n', '\r']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut run = String::new();
    for c in text.chars() {
        if is_html_space(c) {
            run.push(c);
            continue;
        }
        flush_run(&mut run, &mut out);
        out.push(c);
    }
    flush_run(&mut run, &mut out);
    Cow::Owned(out)
}

fn flush_run(run: &mut String, out: &mut String) {
    if run.contains(['\n', '\r']) {
        out.push(' ');
    } else {
        out.push_str(run);
    }
    run.clear();
}
