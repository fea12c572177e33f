//! Projections of a subtree: text, attribute lookup and markup

use hq_dom::{DomTree, NodeData, NodeId};
use hq_html::{get_inner_html, get_outer_html};

/// Concatenated text of the subtree at `node`, in document order.
///
/// Comments and everything below them contribute nothing; element markup
/// is never emitted.
pub fn inner_text(tree: &DomTree, node: NodeId) -> String {
    let mut out = String::new();
    let mut stack = vec![node];

    while let Some(id) = stack.pop() {
        let Some(n) = tree.get(id) else {
            continue;
        };
        match &n.data {
            NodeData::Text(text) => out.push_str(&text.content),
            NodeData::Comment(_) => {}
            _ => {
                let start = stack.len();
                stack.extend(tree.children(id).map(|(child, _)| child));
                stack[start..].reverse();
            }
        }
    }

    out
}

/// Value of the first attribute of `node` called `name`
pub fn select_attr<'t>(tree: &'t DomTree, node: NodeId, name: &str) -> Option<&'t str> {
    tree.attributes(node)
        .iter()
        .find(|attr| tree.attr_name(attr) == name)
        .map(|attr| attr.value.as_str())
}

/// Render `node` as HTML. With `include_self` the node's own tags are
/// emitted, otherwise only its children are.
pub fn output_html(tree: &DomTree, node: NodeId, include_self: bool) -> String {
    if include_self {
        get_outer_html(tree, node)
    } else {
        get_inner_html(tree, node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_text_order() {
        let mut tree = DomTree::new();
        let p = tree.create_element("p");
        let a = tree.create_text("a");
        let b = tree.create_element("b");
        let bt = tree.create_text("b");
        let c = tree.create_text("c");
        tree.append_child(tree.root(), p);
        tree.append_child(p, a);
        tree.append_child(p, b);
        tree.append_child(b, bt);
        tree.append_child(p, c);

        assert_eq!(inner_text(&tree, p), "abc");
        assert_eq!(inner_text(&tree, bt), "b");
    }

    #[test]
    fn test_inner_text_skips_comment_subtrees() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let comment = tree.create_comment("hidden");
        let nested = tree.create_text("also hidden");
        let shown = tree.create_text("shown");
        tree.append_child(tree.root(), div);
        tree.append_child(div, comment);
        // only reachable by building the tree by hand
        tree.append_child(comment, nested);
        tree.append_child(div, shown);

        assert_eq!(inner_text(&tree, div), "shown");
    }

    #[test]
    fn test_select_attr() {
        let mut tree = DomTree::new();
        let a = tree.create_element_with_attrs("a", &[("href", "#"), ("title", "t")]);
        assert_eq!(select_attr(&tree, a, "title"), Some("t"));
        assert_eq!(select_attr(&tree, a, "rel"), None);
        assert_eq!(select_attr(&tree, NodeId::NONE, "href"), None);
    }

    #[test]
    fn test_output_html_self_flag() {
        let mut tree = DomTree::new();
        let p = tree.create_element_with_attrs("p", &[("class", "x")]);
        let t = tree.create_text("hi");
        tree.append_child(tree.root(), p);
        tree.append_child(p, t);

        assert_eq!(output_html(&tree, p, true), "<p class=\"x\">hi</p>");
        assert_eq!(output_html(&tree, p, false), "hi");
    }
}
