//! html5ever `TreeSink` that builds a [`RawDom`].

use std::borrow::Cow;
use std::cell::RefCell;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute, QualName};

use super::arena::{RawAttribute, RawDom, RawNodeData, RawNodeId};

/// Parse an HTML string (fragment or full document) into a raw arena.
///
/// Parse errors are ignored; the tree builder recovers the way browsers do.
pub fn parse_raw(html: &str) -> RawDom {
    parse_document(RawSink::new(), ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
        .into_dom()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeHandle(pub RawNodeId);

impl Default for NodeHandle {
    fn default() -> Self {
        NodeHandle(RawNodeId::NONE)
    }
}

/// Tree sink over a [`RawDom`].
///
/// html5ever's `TreeSink` methods take `&self`, hence the `RefCell`.
pub struct RawSink {
    dom: RefCell<RawDom>,
}

impl Default for RawSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RawSink {
    pub fn new() -> Self {
        Self {
            dom: RefCell::new(RawDom::new()),
        }
    }

    pub fn into_dom(self) -> RawDom {
        self.dom.into_inner()
    }

    fn append_to(dom: &mut RawDom, parent: RawNodeId, child: NodeOrText<NodeHandle>) {
        match child {
            NodeOrText::AppendNode(node) => dom.append(parent, node.0),
            NodeOrText::AppendText(text) => dom.append_text(parent, &text),
        }
    }
}

impl TreeSink for RawSink {
    type Handle = NodeHandle;
    type Output = Self;
    type ElemName<'a>
        = &'a QualName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        self
    }

    fn parse_error(&self, _msg: Cow<'static, str>) {}

    fn get_document(&self) -> Self::Handle {
        NodeHandle(self.dom.borrow().document())
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        static EMPTY: QualName = QualName {
            prefix: None,
            ns: html5ever::ns!(),
            local: html5ever::local_name!(""),
        };

        let dom = self.dom.borrow();
        match dom.get(target.0).map(|n| &n.data) {
            Some(RawNodeData::Element { name, .. }) => {
                // SAFETY: the name is boxed and never freed or replaced while
                // the sink is alive, so its address outlives the RefCell guard.
                let name: &QualName = name;
                unsafe { std::mem::transmute::<&QualName, &'a QualName>(name) }
            }
            _ => &EMPTY,
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let attrs = attrs
            .into_iter()
            .map(|a| RawAttribute {
                name: a.name,
                value: a.value.to_string(),
            })
            .collect();
        NodeHandle(self.dom.borrow_mut().create_element(name, attrs))
    }

    fn create_comment(&self, _text: StrTendril) -> Self::Handle {
        NodeHandle(self.dom.borrow_mut().create_other())
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> Self::Handle {
        NodeHandle(self.dom.borrow_mut().create_other())
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        Self::append_to(&mut self.dom.borrow_mut(), parent.0, child);
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let parent = self
            .dom
            .borrow()
            .get(element.0)
            .map(|n| n.parent)
            .unwrap_or(RawNodeId::NONE);
        let target = if parent.is_some() {
            parent
        } else {
            prev_element.0
        };
        Self::append_to(&mut self.dom.borrow_mut(), target, child);
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        let mut dom = self.dom.borrow_mut();
        let doc = dom.document();
        let doctype = dom.create_other();
        dom.append(doc, doctype);
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        // Templates are dropped wholesale by the sanitizer, so their content
        // can live directly under the template element.
        *target
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x.0 == y.0
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        let mut dom = self.dom.borrow_mut();
        match new_node {
            NodeOrText::AppendNode(node) => dom.insert_before(sibling.0, node.0),
            NodeOrText::AppendText(text) => {
                let text_node = dom.create_text(text.to_string());
                dom.insert_before(sibling.0, text_node);
            }
        }
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Attribute>) {
        let mut dom = self.dom.borrow_mut();
        if let Some(node) = dom.get_mut(target.0)
            && let RawNodeData::Element {
                attrs: existing, ..
            } = &mut node.data
        {
            for attr in attrs {
                if !existing.iter().any(|a| a.name == attr.name) {
                    existing.push(RawAttribute {
                        name: attr.name,
                        value: attr.value.to_string(),
                    });
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        self.dom.borrow_mut().detach(target.0);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let children: Vec<_> = self.dom.borrow().children(node.0).collect();
        let mut dom = self.dom.borrow_mut();
        for child in children {
            dom.detach(child);
            dom.append(new_parent.0, child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find_element(dom: &RawDom, tag: &str) -> Option<RawNodeId> {
        let mut stack = vec![dom.document()];
        while let Some(id) = stack.pop() {
            if let Some(RawNodeData::Element { name, .. }) = dom.get(id).map(|n| &n.data)
                && name.local.as_ref() == tag
            {
                return Some(id);
            }
            let mut children: Vec<_> = dom.children(id).collect();
            children.reverse();
            stack.extend(children);
        }
        None
    }

    #[test]
    fn test_fragment_lands_in_body() {
        let dom = parse_raw("<p>Hello</p>");
        let body = find_element(&dom, "body").expect("body");
        let p = find_element(&dom, "p").expect("p");
        assert_eq!(dom.get(p).unwrap().parent, body);

        let text = dom.children(p).next().expect("text child");
        match &dom.get(text).unwrap().data {
            RawNodeData::Text(t) => assert_eq!(t, "Hello"),
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn test_attributes_are_kept_raw() {
        let dom = parse_raw(r#"<a href="https://x.example" onclick="evil()">x</a>"#);
        let a = find_element(&dom, "a").expect("a");
        match &dom.get(a).unwrap().data {
            RawNodeData::Element { attrs, .. } => {
                let names: Vec<_> = attrs.iter().map(|a| a.name.local.as_ref()).collect();
                assert_eq!(names, vec!["href", "onclick"]);
            }
            other => panic!("expected element, got {other:?}"),
        }
    }

    #[test]
    fn test_misnested_formatting_is_repaired() {
        let dom = parse_raw("<p><b>bold <i>both</b> italic</i></p>");
        assert!(find_element(&dom, "b").is_some());
        assert!(find_element(&dom, "i").is_some());
    }
}
