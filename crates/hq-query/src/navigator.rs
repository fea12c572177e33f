//! Tree navigator
//!
//! A cursor over a [`DomTree`] implementing the [`NodeNavigator`] contract.
//! The tree stores attributes inside their element, so an attribute
//! position is the owning element plus an index into its attribute list.

use std::fmt;

use hq_dom::{DomTree, Node, NodeData, NodeId};
use hq_xpath::{NodeNavigator, NodeType};

use crate::project::inner_text;

/// Cursor over a DOM tree
#[derive(Debug, Clone, Copy)]
pub struct Navigator<'a> {
    tree: &'a DomTree,
    /// Node the cursor was created on; `move_to_root` returns here
    root: NodeId,
    current: NodeId,
    /// Selected attribute of `current`, if any
    attr: Option<usize>,
}

impl<'a> Navigator<'a> {
    /// Create a cursor positioned on `node`, which also becomes its root
    pub fn new(tree: &'a DomTree, node: NodeId) -> Self {
        Self {
            tree,
            root: node,
            current: node,
            attr: None,
        }
    }

    /// The node denoted; the owning element while on an attribute
    #[inline]
    pub fn current(&self) -> NodeId {
        self.current
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Index of the selected attribute, `None` when on the node itself
    #[inline]
    pub fn attribute_index(&self) -> Option<usize> {
        self.attr
    }

    pub fn tree(&self) -> &'a DomTree {
        self.tree
    }

    fn node(&self) -> Option<&'a Node> {
        self.tree.get(self.current)
    }

    fn jump(&mut self, target: Option<NodeId>) -> bool {
        match target {
            Some(id) => {
                self.current = id;
                true
            }
            None => false,
        }
    }
}

impl NodeNavigator for Navigator<'_> {
    fn node_type(&self) -> NodeType {
        match self.node().map(|n| &n.data) {
            Some(NodeData::Comment(_)) => NodeType::Comment,
            Some(NodeData::Text(_)) => NodeType::Text,
            // doctypes carry nothing queryable
            Some(NodeData::Document | NodeData::Doctype { .. }) => NodeType::Root,
            Some(NodeData::Element(_)) => {
                if self.attr.is_some() {
                    NodeType::Attribute
                } else {
                    NodeType::Element
                }
            }
            other => panic!("unknown HTML node kind at {:?}: {:?}", self.current, other),
        }
    }

    fn local_name(&self) -> &str {
        let tree = self.tree;
        if let Some(index) = self.attr {
            return tree
                .attributes(self.current)
                .get(index)
                .map(|a| tree.attr_name(a))
                .unwrap_or("");
        }
        match self.node().map(|n| &n.data) {
            Some(NodeData::Element(elem)) => tree.resolve(elem.name.local),
            Some(NodeData::Text(text)) => &text.content,
            Some(NodeData::Comment(data)) => data,
            Some(NodeData::Doctype { name, .. }) => tree.resolve(*name),
            _ => "",
        }
    }

    fn prefix(&self) -> &str {
        ""
    }

    fn value(&self) -> String {
        match self.node().map(|n| &n.data) {
            Some(NodeData::Comment(data)) => data.clone(),
            Some(NodeData::Text(text)) => text.content.clone(),
            Some(NodeData::Element(elem)) => match self.attr {
                Some(index) => elem
                    .attrs
                    .get(index)
                    .map(|a| a.value.clone())
                    .unwrap_or_default(),
                None => inner_text(self.tree, self.current),
            },
            _ => String::new(),
        }
    }

    fn move_to_root(&mut self) {
        self.current = self.root;
        self.attr = None;
    }

    fn move_to_parent(&mut self) -> bool {
        if self.attr.take().is_some() {
            return true;
        }
        self.jump(self.tree.parent(self.current))
    }

    fn move_to_next_attribute(&mut self) -> bool {
        let next = self.attr.map_or(0, |i| i + 1);
        if next < self.tree.attributes(self.current).len() {
            self.attr = Some(next);
            true
        } else {
            false
        }
    }

    fn move_to_child(&mut self) -> bool {
        if self.attr.is_some() {
            return false;
        }
        self.jump(self.tree.first_child(self.current))
    }

    fn move_to_first(&mut self) -> bool {
        if self.attr.is_some() || self.tree.prev_sibling(self.current).is_none() {
            return false;
        }
        while let Some(prev) = self.tree.prev_sibling(self.current) {
            self.current = prev;
        }
        true
    }

    fn move_to_next(&mut self) -> bool {
        if self.attr.is_some() {
            return false;
        }
        self.jump(self.tree.next_sibling(self.current))
    }

    fn move_to_previous(&mut self) -> bool {
        if self.attr.is_some() {
            return false;
        }
        self.jump(self.tree.prev_sibling(self.current))
    }

    fn move_to(&mut self, other: &Self) -> bool {
        if !std::ptr::eq(self.tree, other.tree) || self.root != other.root {
            return false;
        }
        self.current = other.current;
        self.attr = other.attr;
        true
    }

    fn is_same_position(&self, other: &Self) -> bool {
        self == other
    }

    fn document_position(&self) -> Option<(usize, usize)> {
        let slot = self.attr.map_or(0, |i| i + 1);
        Some((self.tree.document_position(self.current), slot))
    }
}

impl PartialEq for Navigator<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree)
            && self.root == other.root
            && self.current == other.current
            && self.attr == other.attr
    }
}

impl Eq for Navigator<'_> {}

impl fmt::Display for Navigator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// <html lang="en"><body id="b" class="c">hi<!--x--></body></html>
    fn build() -> (DomTree, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let html = tree.create_element_with_attrs("html", &[("lang", "en")]);
        let body = tree.create_element_with_attrs("body", &[("id", "b"), ("class", "c")]);
        let text = tree.create_text("hi");
        let comment = tree.create_comment("x");
        tree.append_child(tree.root(), html);
        tree.append_child(html, body);
        tree.append_child(body, text);
        tree.append_child(body, comment);
        (tree, html, body)
    }

    #[test]
    fn test_node_types() {
        let (tree, html, _) = build();
        let mut nav = Navigator::new(&tree, tree.root());
        assert_eq!(nav.node_type(), NodeType::Root);
        assert!(nav.move_to_child());
        assert_eq!(nav.current(), html);
        assert_eq!(nav.node_type(), NodeType::Element);
        assert!(nav.move_to_next_attribute());
        assert_eq!(nav.node_type(), NodeType::Attribute);
    }

    #[test]
    fn test_document_position_orders_attributes() {
        let (tree, html, body) = build();
        let element = Navigator::new(&tree, body);
        let mut id = element;
        id.move_to_next_attribute();
        let mut class = id;
        class.move_to_next_attribute();
        let mut text = element;
        text.move_to_child();

        let keys: Vec<_> = [Navigator::new(&tree, html), element, id, class, text]
            .iter()
            .map(|n| n.document_position().unwrap())
            .collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]), "{keys:?}");
    }

    #[test]
    fn test_names_and_values() {
        let (tree, _, body) = build();
        let mut nav = Navigator::new(&tree, body);
        assert_eq!(nav.local_name(), "body");
        assert_eq!(nav.value(), "hi");
        assert_eq!(nav.prefix(), "");

        nav.move_to_next_attribute();
        nav.move_to_next_attribute();
        assert_eq!(nav.local_name(), "class");
        assert_eq!(nav.value(), "c");
        assert_eq!(nav.to_string(), "c");

        nav.move_to_parent();
        nav.move_to_child();
        assert_eq!(nav.local_name(), "hi");
        nav.move_to_next();
        assert_eq!(nav.node_type(), NodeType::Comment);
        assert_eq!(nav.value(), "x");
    }

    #[test]
    fn test_move_to_root_clears_attribute() {
        let (tree, html, body) = build();
        let mut nav = Navigator::new(&tree, html);
        nav.move_to_child();
        nav.move_to_next_attribute();
        assert_eq!(nav.current(), body);

        nav.move_to_root();
        assert_eq!(nav.current(), html);
        assert_eq!(nav.attribute_index(), None);
    }

    #[test]
    fn test_attribute_has_no_relatives() {
        let (tree, _, body) = build();
        let mut nav = Navigator::new(&tree, body);
        nav.move_to_next_attribute();
        let before = nav;
        assert!(!nav.move_to_child());
        assert!(!nav.move_to_next());
        assert!(!nav.move_to_previous());
        assert!(!nav.move_to_first());
        assert_eq!(nav, before);
    }

    #[test]
    fn test_text_has_no_attributes() {
        let (tree, _, body) = build();
        let mut nav = Navigator::new(&tree, body);
        nav.move_to_child();
        assert!(!nav.move_to_next_attribute());
        assert_eq!(nav.attribute_index(), None);
    }

    #[test]
    fn test_parent_of_document_fails() {
        let (tree, _, _) = build();
        let mut nav = Navigator::new(&tree, tree.root());
        assert!(!nav.move_to_parent());
        assert_eq!(nav.current(), tree.root());
    }

    #[test]
    #[should_panic(expected = "unknown HTML node kind")]
    fn test_processing_instruction_is_fatal() {
        let mut tree = DomTree::new();
        let pi = tree.create_processing_instruction("xml", "version=\"1.0\"");
        tree.append_child(tree.root(), pi);
        let nav = Navigator::new(&tree, pi);
        let _ = nav.node_type();
    }
}
