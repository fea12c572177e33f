//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts it into the arena DOM. The
//! conversion walks with an explicit stack so deeply nested markup cannot
//! exhaust the call stack.

use std::io::Read;

use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{ParseOpts, parse_document};
use hq_dom::{Document, DomTree, ElementData, NodeId, QualName};
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::ParseError;

/// Parser options
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Keep text nodes that contain only whitespace
    pub keep_whitespace_text: bool,
    /// Parse as if scripting were enabled (`<noscript>` content is raw text)
    pub scripting_enabled: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            keep_whitespace_text: true,
            scripting_enabled: true,
        }
    }
}

/// HTML5 parser
#[derive(Debug, Clone, Default)]
pub struct HtmlParser {
    options: ParseOptions,
}

impl HtmlParser {
    /// Create a new HTML parser with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with explicit options
    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, ParseError> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a base URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<Document, ParseError> {
        tracing::debug!("Parsing HTML document: {}", url);
        let dom = parse_document(RcDom::default(), self.parse_opts()).one(html);
        Ok(self.build(&dom, url))
    }

    /// Parse UTF-8 encoded HTML from a reader
    pub fn parse_reader<R: Read>(&self, mut reader: R, url: &str) -> Result<Document, ParseError> {
        tracing::debug!("Parsing HTML stream: {}", url);
        let dom = parse_document(RcDom::default(), self.parse_opts())
            .from_utf8()
            .read_from(&mut reader)?;
        Ok(self.build(&dom, url))
    }

    fn parse_opts(&self) -> ParseOpts {
        ParseOpts {
            tree_builder: TreeBuilderOpts {
                scripting_enabled: self.options.scripting_enabled,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn build(&self, dom: &RcDom, url: &str) -> Document {
        let mut tree = DomTree::new();
        self.convert(&dom.document, &mut tree);
        let document = Document::from_tree(tree, url);
        tracing::debug!("Parsed {} nodes", document.tree().len());
        document
    }

    /// Convert the RcDom rooted at `document` into `tree`
    fn convert(&self, document: &Handle, tree: &mut DomTree) {
        let mut stack: Vec<(Handle, NodeId)> = Vec::new();
        push_children(&mut stack, document, tree.root());

        while let Some((handle, parent)) = stack.pop() {
            match &handle.data {
                RcNodeData::Document => push_children(&mut stack, &handle, parent),
                RcNodeData::Doctype {
                    name,
                    public_id,
                    system_id,
                } => {
                    let id = tree.create_doctype(name, public_id, system_id);
                    tree.append_child(parent, id);
                }
                RcNodeData::Text { contents } => {
                    let text = contents.borrow();
                    if self.options.keep_whitespace_text || !text.trim().is_empty() {
                        let id = tree.create_text(&text);
                        tree.append_child(parent, id);
                    }
                }
                RcNodeData::Comment { contents } => {
                    let id = tree.create_comment(contents);
                    tree.append_child(parent, id);
                }
                RcNodeData::Element {
                    name,
                    attrs,
                    template_contents,
                    ..
                } => {
                    let ns = tree.interner_mut().intern(&name.ns);
                    let local = tree.interner_mut().intern(&name.local);
                    let mut elem = ElementData::new(QualName::new(ns, local));

                    for attr in attrs.borrow().iter() {
                        let attr_ns = tree.interner_mut().intern(&attr.name.ns);
                        let attr_local = tree.interner_mut().intern(&attr.name.local);
                        elem.set_attr(QualName::new(attr_ns, attr_local), attr.value.to_string());
                    }

                    let id = tree.create_element_data(elem);
                    tree.append_child(parent, id);

                    // Template content hangs off a separate fragment in
                    // html5ever; expose it as ordinary children.
                    if let Some(content) = template_contents.borrow().as_ref() {
                        push_children(&mut stack, content, id);
                    }
                    push_children(&mut stack, &handle, id);
                }
                RcNodeData::ProcessingInstruction { .. } => {
                    // Not part of HTML; the tokenizer treats `<?` as a bogus comment
                }
            }
        }
    }
}

/// Queue children so they pop off the stack in document order
fn push_children(stack: &mut Vec<(Handle, NodeId)>, handle: &Handle, parent: NodeId) {
    for child in handle.children.borrow().iter().rev() {
        stack.push((child.clone(), parent));
    }
}
