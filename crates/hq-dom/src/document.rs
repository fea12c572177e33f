//! Document - High-level document API

use crate::{DomTree, NodeId};

/// HTML Document
#[derive(Debug)]
pub struct Document {
    tree: DomTree,
    /// Document URL
    url: String,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
}

impl Document {
    /// Wrap a fully built tree. The tree is read-only from here on.
    pub fn from_tree(tree: DomTree, url: &str) -> Self {
        let mut document = Self {
            tree,
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        };
        document.finalize();
        document
    }

    /// Create an empty document (document node only)
    pub fn empty(url: &str) -> Self {
        Self::from_tree(DomTree::new(), url)
    }

    /// Locate `<html>`, `<head>` and `<body>`
    fn finalize(&mut self) {
        self.html_element = self
            .find_child_element(self.tree.root(), "html")
            .unwrap_or(NodeId::NONE);
        if self.html_element.is_valid() {
            self.head_element = self
                .find_child_element(self.html_element, "head")
                .unwrap_or(NodeId::NONE);
            self.body_element = self
                .find_child_element(self.html_element, "body")
                .unwrap_or(NodeId::NONE);
        }
        tracing::trace!(
            html = self.html_element.is_valid(),
            head = self.head_element.is_valid(),
            body = self.body_element.is_valid(),
            "document finalized"
        );
    }

    fn find_child_element(&self, parent: NodeId, tag: &str) -> Option<NodeId> {
        self.tree
            .children(parent)
            .find(|(id, _)| self.tree.tag_name(*id) == Some(tag))
            .map(|(id, _)| id)
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The document node
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// Text of the first `<title>` in `<head>`
    pub fn title(&self) -> String {
        let Some(title) = self.head().and_then(|head| self.find_child_element(head, "title")) else {
            return String::new();
        };
        self.tree
            .children(title)
            .filter_map(|(_, child)| child.as_text())
            .collect()
    }

    /// Get `<html>` element
    pub fn document_element(&self) -> Option<NodeId> {
        self.html_element.to_option()
    }

    /// Get `<head>` element
    pub fn head(&self) -> Option<NodeId> {
        self.head_element.to_option()
    }

    /// Get `<body>` element
    pub fn body(&self) -> Option<NodeId> {
        self.body_element.to_option()
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::empty("about:blank")
    }
}
