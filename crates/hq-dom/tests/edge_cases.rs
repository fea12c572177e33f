//! Edge case tests for hq-dom
//!
//! Boundary conditions of the arena: empty trees, deep nesting, wide
//! sibling lists and unusual names.

use hq_dom::{Document, DomTree, NodeId};

#[test]
fn test_empty_tree_has_only_document() {
    let tree = DomTree::new();
    assert_eq!(tree.len(), 1);
    assert!(tree.first_child(tree.root()).is_none());
    assert_eq!(tree.children(tree.root()).count(), 0);
    assert_eq!(tree.descendants(tree.root()).count(), 1);
}

#[test]
fn test_deep_nesting() {
    let mut tree = DomTree::new();
    let mut parent = tree.root();
    for _ in 0..10_000 {
        let div = tree.create_element("div");
        tree.append_child(parent, div);
        parent = div;
    }

    // Iterative traversal must not overflow the stack
    assert_eq!(tree.descendants(tree.root()).count(), 10_001);

    let mut depth = 0;
    let mut cursor = parent;
    while let Some(up) = tree.parent(cursor) {
        cursor = up;
        depth += 1;
    }
    assert_eq!(depth, 10_000);
}

#[test]
fn test_wide_sibling_list() {
    let mut tree = DomTree::new();
    let ul = tree.create_element("ul");
    tree.append_child(tree.root(), ul);
    let ids: Vec<NodeId> = (0..1_000)
        .map(|_| {
            let li = tree.create_element("li");
            tree.append_child(ul, li);
            li
        })
        .collect();

    let walked: Vec<NodeId> = tree.children(ul).map(|(id, _)| id).collect();
    assert_eq!(walked, ids);

    // Backwards through prev links
    let mut cursor = *ids.last().unwrap();
    let mut count = 1;
    while let Some(prev) = tree.prev_sibling(cursor) {
        cursor = prev;
        count += 1;
    }
    assert_eq!(count, 1_000);
    assert_eq!(cursor, ids[0]);
}

#[test]
fn test_unicode_names_and_text() {
    let mut tree = DomTree::new();
    let el = tree.create_element_with_attrs("x-élément", &[("data-名前", "値")]);
    let text = tree.create_text("こんにちは 🚀");
    tree.append_child(tree.root(), el);
    tree.append_child(el, text);

    assert_eq!(tree.tag_name(el), Some("x-élément"));
    let attr = &tree.attributes(el)[0];
    assert_eq!(tree.attr_name(attr), "data-名前");
    assert_eq!(attr.value, "値");
    assert_eq!(tree.get(text).unwrap().as_text(), Some("こんにちは 🚀"));
}

#[test]
fn test_duplicate_attribute_names_collapse() {
    let mut tree = DomTree::new();
    let el = tree.create_element_with_attrs("a", &[("href", "1"), ("href", "2")]);
    let attrs = tree.attributes(el);
    assert_eq!(attrs.len(), 1);
    assert_eq!(attrs[0].value, "2");
}

#[test]
fn test_self_append_is_ignored() {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");
    tree.append_child(div, div);
    assert!(tree.parent(div).is_none());
    assert!(tree.first_child(div).is_none());
}

#[test]
fn test_document_without_html() {
    let mut tree = DomTree::new();
    let text = tree.create_text("bare");
    tree.append_child(tree.root(), text);
    let doc = Document::from_tree(tree, "about:blank");

    assert!(doc.document_element().is_none());
    assert!(doc.head().is_none());
    assert_eq!(doc.title(), "");
}
