//! Allow-list sanitization of untrusted HTML.
//!
//! Every element is looked up in the policy table ([`disposition`]): allowed
//! tags are kept, executable and embedded content is dropped with its
//! subtree, and every other tag is unwrapped so its text survives.
//! Attributes survive only on anchors, and only `href`, `target` and `rel`;
//! an `href` whose scheme is not allow-listed is removed.
//!
//! [`sanitize`] is idempotent: it re-runs the pass until the serialization
//! is stable, since unwrapping can produce nesting that the HTML tree
//! builder rearranges on the next parse (`<h1><div><h2>` becomes
//! `<h1><h2>`, which reparses as two sibling headings).

mod url;

pub use url::safe_href;

use html5ever::ns;

use crate::dom::arena::{RawDom, RawNodeData, RawNodeId};
use crate::dom::{Attr, Disposition, Document, Element, Node, disposition, tree_sink};

/// Upper bound on clean/serialize passes; real input settles in one or two.
const MAX_PASSES: usize = 4;

/// Sanitize untrusted HTML, returning allow-listed HTML.
///
/// # Examples
///
/// ```
/// use postglyph::sanitize;
///
/// assert_eq!(sanitize("<script>alert(1)</script><p>ok</p>"), "<p>ok</p>");
/// assert_eq!(sanitize("<div><b onclick=\"x()\">hi</b></div>"), "<b>hi</b>");
/// ```
pub fn sanitize(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }

    let mut current = sanitize_once(html);
    for pass in 1..MAX_PASSES {
        let next = sanitize_once(&current);
        if next == current {
            break;
        }
        tracing::debug!(pass, "sanitized markup changed on reparse");
        current = next;
    }
    current
}

fn sanitize_once(html: &str) -> String {
    clean(&tree_sink::parse_raw(html)).to_html()
}

/// Reduce a raw parse tree to an allow-listed [`Document`].
pub(crate) fn clean(dom: &RawDom) -> Document {
    let mut children = Vec::new();
    clean_children(dom, dom.document(), &mut children);
    Document { children }
}

fn clean_children(dom: &RawDom, parent: RawNodeId, out: &mut Vec<Node>) {
    for child in dom.children(parent) {
        let Some(node) = dom.get(child) else {
            continue;
        };
        match &node.data {
            RawNodeData::Text(text) => push_text(out, text),
            RawNodeData::Element { name, attrs } => {
                if name.ns != ns!(html) {
                    continue;
                }
                match disposition(name.local.as_ref()) {
                    Disposition::Keep(tag) => {
                        let mut el = Element::new(tag);
                        for attr in attrs {
                            if attr.name.ns != ns!() {
                                continue;
                            }
                            if let Some(a) = Attr::from_name(attr.name.local.as_ref()) {
                                el.set_attr(a, attr.value.clone());
                            }
                        }
                        if !tag.is_void() {
                            clean_children(dom, child, &mut el.children);
                        }
                        out.push(Node::Element(el));
                    }
                    Disposition::Unwrap => clean_children(dom, child, out),
                    Disposition::DropSubtree => {}
                }
            }
            RawNodeData::Document | RawNodeData::Other => {}
        }
    }
}

/// Append text, merging with a preceding text node so unwrapping never
/// leaves two adjacent leaves (a reparse would merge them).
fn push_text(out: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Node::Text(last)) = out.last_mut() {
        last.push_str(text);
    } else {
        out.push(Node::Text(text.to_string()));
    }
}
