//! DOM Tree (arena-based allocation)
//!
//! All nodes of a document live in one `Vec`; node 0 is always the
//! document node. The builder methods are used while parsing, after which
//! the tree is only read.

use std::sync::OnceLock;

use crate::{Attribute, ElementData, InternedString, Node, NodeData, NodeId, QualName, StringInterner};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    interner: StringInterner,
    /// Pre-order ordinal per node, built on first use
    order: OnceLock<Vec<u32>>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            interner: StringInterner::new(),
            order: OnceLock::new(),
        }
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Interner holding tag and attribute names
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn interner_mut(&mut self) -> &mut StringInterner {
        &mut self.interner
    }

    /// Resolve an interned name
    #[inline]
    pub fn resolve(&self, id: InternedString) -> &str {
        self.interner.get(id)
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    fn push(&mut self, node: Node) -> NodeId {
        self.order.take();
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let local = self.interner.intern(tag);
        self.push(Node::element(QualName::local(local)))
    }

    /// Create a detached element with attributes in the given order
    pub fn create_element_with_attrs(&mut self, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let local = self.interner.intern(tag);
        let mut elem = ElementData::new(QualName::local(local));
        for (name, value) in attrs {
            let name = QualName::local(self.interner.intern(name));
            elem.set_attr(name, (*value).to_string());
        }
        self.push(Node::new(NodeData::Element(elem)))
    }

    /// Add an already-built element
    pub fn create_element_data(&mut self, elem: ElementData) -> NodeId {
        self.push(Node::new(NodeData::Element(elem)))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content.to_string()))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::new(NodeData::Comment(content.to_string())))
    }

    /// Create a detached doctype node
    pub fn create_doctype(&mut self, name: &str, public_id: &str, system_id: &str) -> NodeId {
        let name = self.interner.intern(name);
        self.push(Node::new(NodeData::Doctype {
            name,
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        }))
    }

    /// Create a detached processing instruction
    pub fn create_processing_instruction(&mut self, target: &str, data: &str) -> NodeId {
        let target = self.interner.intern(target);
        self.push(Node::new(NodeData::ProcessingInstruction {
            target,
            data: data.to_string(),
        }))
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// Ignored if either id is unknown, if `child` is already attached, or
    /// if `child` is an ancestor of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.get(parent).is_none() || self.get(child).is_none() {
            return;
        }
        if self.nodes[child.index()].parent.is_valid() || self.is_ancestor_or_self(child, parent) {
            tracing::trace!("refusing to append {:?} under {:?}", child, parent);
            return;
        }
        self.order.take();

        let prev_last = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = prev_last;
            node.next_sibling = NodeId::NONE;
        }

        if prev_last.is_valid() {
            self.nodes[prev_last.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, mut id: NodeId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.parent(id) {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    // ------------------------------------------------------------------
    // Relations
    // ------------------------------------------------------------------

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent.to_option())
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.first_child.to_option())
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.last_child.to_option())
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling.to_option())
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling.to_option())
    }

    /// Iterate the direct children of `id`
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.first_child(id),
        }
    }

    /// Iterate the subtree rooted at `id` in document order, `id` included
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            root: id,
            next: self.get(id).map(|_| id),
        }
    }

    /// Ordinal of `id` in document order.
    ///
    /// The attached tree is numbered first, then each detached subtree in
    /// id order. Unknown ids sort last.
    pub fn document_position(&self, id: NodeId) -> usize {
        let order = self.order.get_or_init(|| self.number_nodes());
        order.get(id.index()).map_or(usize::MAX, |&n| n as usize)
    }

    fn number_nodes(&self) -> Vec<u32> {
        let mut order = vec![u32::MAX; self.nodes.len()];
        let mut next = 0u32;
        let roots = std::iter::once(self.root()).chain(
            (1..self.nodes.len())
                .map(|i| NodeId(i as u32))
                .filter(|&id| !self.nodes[id.index()].parent.is_valid()),
        );
        for top in roots {
            for (id, _) in self.descendants(top) {
                order[id.index()] = next;
                next += 1;
            }
        }
        tracing::trace!("numbered {} nodes", next);
        order
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        let elem = self.get(id)?.as_element()?;
        Some(self.resolve(elem.name.local))
    }

    /// Attributes of a node (empty unless it is an element)
    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        self.get(id).map(Node::attrs).unwrap_or(&[])
    }

    /// Resolved name of an attribute
    #[inline]
    pub fn attr_name(&self, attr: &Attribute) -> &str {
        self.resolve(attr.name.local)
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the children of a node
pub struct Children<'a> {
    tree: &'a DomTree,
    next: Option<NodeId>,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling.to_option();
        Some((id, node))
    }
}

/// Pre-order iterator over a subtree
pub struct Descendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    next: Option<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = self.tree.get(id)?;

        self.next = if let Some(child) = node.first_child.to_option() {
            Some(child)
        } else {
            // Climb until a next sibling is found, never leaving the subtree
            let mut cursor = id;
            loop {
                if cursor == self.root {
                    break None;
                }
                if let Some(sibling) = self.tree.next_sibling(cursor) {
                    break Some(sibling);
                }
                match self.tree.parent(cursor) {
                    Some(parent) => cursor = parent,
                    None => break None,
                }
            }
        };

        Some((id, node))
    }
}
