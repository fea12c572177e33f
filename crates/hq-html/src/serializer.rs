//! HTML Serialization (innerHTML/outerHTML)
//!
//! Renders arena nodes back to markup following the HTML fragment
//! serialization rules: void elements have no end tag, raw text elements
//! are not escaped, comments are written verbatim.

use hq_dom::{DomTree, NodeData, NodeId};

/// Void elements (no end tag)
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img",
    "input", "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Elements whose text children are written unescaped
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "style", "script", "xmp", "iframe", "noembed", "noframes", "plaintext", "noscript",
];

/// HTML serializer
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlSerializer;

impl HtmlSerializer {
    pub fn new() -> Self {
        Self
    }

    /// Serialize innerHTML of a node (children only)
    pub fn serialize_inner(&self, tree: &DomTree, node_id: NodeId) -> String {
        let mut output = String::new();
        self.serialize_children(tree, node_id, &mut output);
        output
    }

    /// Serialize outerHTML of a node (including the node itself)
    pub fn serialize_outer(&self, tree: &DomTree, node_id: NodeId) -> String {
        let mut output = String::new();
        self.serialize_node(tree, node_id, &mut output);
        output
    }

    fn serialize_node(&self, tree: &DomTree, node_id: NodeId, output: &mut String) {
        let Some(node) = tree.get(node_id) else {
            return;
        };

        match &node.data {
            NodeData::Document => {
                self.serialize_children(tree, node_id, output);
            }
            NodeData::Element(elem) => {
                let tag = tree.resolve(elem.name.local);

                output.push('<');
                output.push_str(tag);
                for attr in elem.attrs.iter() {
                    output.push(' ');
                    output.push_str(tree.resolve(attr.name.local));
                    output.push_str("=\"");
                    escape_attribute(&attr.value, output);
                    output.push('"');
                }
                output.push('>');

                if VOID_ELEMENTS.contains(&tag) {
                    return;
                }

                if RAW_TEXT_ELEMENTS.contains(&tag) {
                    self.serialize_children_raw(tree, node_id, output);
                } else {
                    self.serialize_children(tree, node_id, output);
                }

                output.push_str("</");
                output.push_str(tag);
                output.push('>');
            }
            NodeData::Text(text) => {
                escape_text(&text.content, output);
            }
            NodeData::Comment(text) => {
                output.push_str("<!--");
                output.push_str(text);
                output.push_str("-->");
            }
            NodeData::Doctype { name, .. } => {
                output.push_str("<!DOCTYPE ");
                output.push_str(tree.resolve(*name));
                output.push('>');
            }
            NodeData::ProcessingInstruction { target, data } => {
                output.push_str("<?");
                output.push_str(tree.resolve(*target));
                if !data.is_empty() {
                    output.push(' ');
                    output.push_str(data);
                }
                output.push('>');
            }
        }
    }

    fn serialize_children(&self, tree: &DomTree, parent_id: NodeId, output: &mut String) {
        for (child_id, _) in tree.children(parent_id) {
            self.serialize_node(tree, child_id, output);
        }
    }

    fn serialize_children_raw(&self, tree: &DomTree, parent_id: NodeId, output: &mut String) {
        for (child_id, child) in tree.children(parent_id) {
            match &child.data {
                NodeData::Text(text) => output.push_str(&text.content),
                _ => self.serialize_node(tree, child_id, output),
            }
        }
    }
}

/// Escape text content
fn escape_text(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '\u{00A0}' => output.push_str("&nbsp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            _ => output.push(c),
        }
    }
}

/// Escape attribute value
fn escape_attribute(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '\u{00A0}' => output.push_str("&nbsp;"),
            '"' => output.push_str("&quot;"),
            _ => output.push(c),
        }
    }
}

/// Get innerHTML of a node
pub fn get_inner_html(tree: &DomTree, node_id: NodeId) -> String {
    HtmlSerializer::new().serialize_inner(tree, node_id)
}

/// Get outerHTML of a node
pub fn get_outer_html(tree: &DomTree, node_id: NodeId) -> String {
    HtmlSerializer::new().serialize_outer(tree, node_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text() {
        let mut output = String::new();
        escape_text("Hello <world> & \"friends\"\u{00A0}", &mut output);
        assert_eq!(output, "Hello &lt;world&gt; &amp; \"friends\"&nbsp;");
    }

    #[test]
    fn test_escape_attribute() {
        let mut output = String::new();
        escape_attribute("a<b & \"c\"", &mut output);
        assert_eq!(output, "a<b &amp; &quot;c&quot;");
    }

    #[test]
    fn test_void_element_has_no_end_tag() {
        let mut tree = DomTree::new();
        let img = tree.create_element_with_attrs("img", &[("src", "a.png"), ("alt", "")]);
        tree.append_child(tree.root(), img);
        assert_eq!(get_outer_html(&tree, img), r#"<img src="a.png" alt="">"#);
        assert_eq!(get_inner_html(&tree, img), "");
    }

    #[test]
    fn test_script_is_raw() {
        let mut tree = DomTree::new();
        let script = tree.create_element("script");
        let code = tree.create_text("if (a < b && c) {}");
        tree.append_child(tree.root(), script);
        tree.append_child(script, code);
        assert_eq!(
            get_outer_html(&tree, script),
            "<script>if (a < b && c) {}</script>"
        );
    }

    #[test]
    fn test_inner_versus_outer() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let comment = tree.create_comment(" Logo ");
        let text = tree.create_text("x");
        tree.append_child(tree.root(), div);
        tree.append_child(div, comment);
        tree.append_child(div, text);

        assert_eq!(get_outer_html(&tree, div), "<div><!-- Logo -->x</div>");
        assert_eq!(get_inner_html(&tree, div), "<!-- Logo -->x");
    }

    #[test]
    fn test_doctype() {
        let mut tree = DomTree::new();
        let doctype = tree.create_doctype("html", "", "");
        tree.append_child(tree.root(), doctype);
        assert_eq!(get_outer_html(&tree, tree.root()), "<!DOCTYPE html>");
    }
}
