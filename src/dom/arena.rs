//! Arena DOM for untrusted HTML.
//!
//! html5ever builds into this tree before anything is checked against the
//! allow-list, so it holds whatever the input contained: arbitrary tags,
//! foreign namespaces, comments. The sanitizer walks it once to produce a
//! [`Document`](super::Document) and then drops it.

use html5ever::QualName;

/// Index of a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawNodeId(pub u32);

impl RawNodeId {
    /// Sentinel for "no node".
    pub const NONE: RawNodeId = RawNodeId(u32::MAX);

    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

/// Payload of a raw node.
#[derive(Debug, Clone)]
pub enum RawNodeData {
    Document,
    Element {
        /// Boxed so the name's address survives arena growth; the tree sink
        /// hands out references to it.
        name: Box<QualName>,
        attrs: Vec<RawAttribute>,
    },
    Text(String),
    /// Comments, doctypes and processing instructions. Never survive cleaning.
    Other,
}

/// Attribute exactly as the parser saw it.
#[derive(Debug, Clone)]
pub struct RawAttribute {
    pub name: QualName,
    pub value: String,
}

#[derive(Debug)]
pub struct RawNode {
    pub data: RawNodeData,
    pub parent: RawNodeId,
    pub first_child: RawNodeId,
    pub last_child: RawNodeId,
    pub prev_sibling: RawNodeId,
    pub next_sibling: RawNodeId,
}

impl RawNode {
    fn new(data: RawNodeData) -> Self {
        Self {
            data,
            parent: RawNodeId::NONE,
            first_child: RawNodeId::NONE,
            last_child: RawNodeId::NONE,
            prev_sibling: RawNodeId::NONE,
            next_sibling: RawNodeId::NONE,
        }
    }
}

/// Contiguous node storage with index links.
#[derive(Debug)]
pub struct RawDom {
    nodes: Vec<RawNode>,
    document: RawNodeId,
}

impl RawDom {
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            document: RawNodeId::NONE,
        };
        dom.document = dom.alloc(RawNode::new(RawNodeData::Document));
        dom
    }

    fn alloc(&mut self, node: RawNode) -> RawNodeId {
        let id = RawNodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn document(&self) -> RawNodeId {
        self.document
    }

    pub fn get(&self, id: RawNodeId) -> Option<&RawNode> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: RawNodeId) -> Option<&mut RawNode> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    pub fn create_element(&mut self, name: QualName, attrs: Vec<RawAttribute>) -> RawNodeId {
        self.alloc(RawNode::new(RawNodeData::Element {
            name: Box::new(name),
            attrs,
        }))
    }

    pub fn create_text(&mut self, text: String) -> RawNodeId {
        self.alloc(RawNode::new(RawNodeData::Text(text)))
    }

    pub fn create_other(&mut self) -> RawNodeId {
        self.alloc(RawNode::new(RawNodeData::Other))
    }

    /// Append `child` as the last child of `parent`.
    pub fn append(&mut self, parent: RawNodeId, child: RawNodeId) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(RawNodeId::NONE);

        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = parent;
            child_node.prev_sibling = last_child;
            child_node.next_sibling = RawNodeId::NONE;
        }

        if let Some(last_node) = self.get_mut(last_child) {
            last_node.next_sibling = child;
        }

        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }
    }

    /// Insert `new_node` immediately before `sibling`.
    pub fn insert_before(&mut self, sibling: RawNodeId, new_node: RawNodeId) {
        let (parent, prev) = match self.get(sibling) {
            Some(n) => (n.parent, n.prev_sibling),
            None => return,
        };

        if let Some(new) = self.get_mut(new_node) {
            new.parent = parent;
            new.prev_sibling = prev;
            new.next_sibling = sibling;
        }

        if let Some(sib) = self.get_mut(sibling) {
            sib.prev_sibling = new_node;
        }

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = new_node;
            }
        } else if let Some(par) = self.get_mut(parent) {
            par.first_child = new_node;
        }
    }

    /// Append text, merging into the last child when it is already text.
    pub fn append_text(&mut self, parent: RawNodeId, text: &str) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(RawNodeId::NONE);

        if let Some(last) = self.get_mut(last_child)
            && let RawNodeData::Text(existing) = &mut last.data
        {
            existing.push_str(text);
            return;
        }

        let text_node = self.create_text(text.to_string());
        self.append(parent, text_node);
    }

    /// Unlink a node from its parent and siblings.
    pub fn detach(&mut self, id: RawNodeId) {
        let (parent, prev, next) = match self.get(id) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = next;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.first_child = next;
        }

        if next.is_some() {
            if let Some(n) = self.get_mut(next) {
                n.prev_sibling = prev;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.last_child = prev;
        }

        if let Some(node) = self.get_mut(id) {
            node.parent = RawNodeId::NONE;
            node.prev_sibling = RawNodeId::NONE;
            node.next_sibling = RawNodeId::NONE;
        }
    }

    pub fn children(&self, parent: RawNodeId) -> Children<'_> {
        let first = self
            .get(parent)
            .map(|n| n.first_child)
            .unwrap_or(RawNodeId::NONE);
        Children {
            dom: self,
            current: first,
        }
    }
}

impl Default for RawDom {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the children of a raw node.
pub struct Children<'a> {
    dom: &'a RawDom,
    current: RawNodeId,
}

impl Iterator for Children<'_> {
    type Item = RawNodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self
            .dom
            .get(id)
            .map(|n| n.next_sibling)
            .unwrap_or(RawNodeId::NONE);
        Some(id)
    }
}
