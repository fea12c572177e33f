//! Query facade
//!
//! Compile an expression, run it with a fresh [`Navigator`] rooted at the
//! given node and hand back the DOM nodes it selects, in the order the
//! engine produced them.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use hq_dom::{Document, DomTree, NodeId};
use hq_xpath::{XPath, XPathError};

use crate::Navigator;

/// Query errors
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The expression failed to compile, or is not a node-set expression
    #[error("invalid expression: {0}")]
    Expression(#[from] XPathError),

    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] hq_html::ParseError),
}

/// Create a navigator rooted at `top`
pub fn create_navigator(tree: &DomTree, top: NodeId) -> Navigator<'_> {
    Navigator::new(tree, top)
}

/// All nodes selected by a compiled expression
pub fn query_all(tree: &DomTree, top: NodeId, expr: &XPath) -> Result<Vec<NodeId>, QueryError> {
    let nav = create_navigator(tree, top);
    let nodes: Vec<NodeId> = expr.select(&nav)?.map(|n| n.current()).collect();
    tracing::trace!("{} matched {} nodes", expr.as_str(), nodes.len());
    Ok(nodes)
}

/// First node selected by a compiled expression
pub fn query(tree: &DomTree, top: NodeId, expr: &XPath) -> Result<Option<NodeId>, QueryError> {
    let nav = create_navigator(tree, top);
    Ok(expr.select(&nav)?.next().map(|n| n.current()))
}

/// Call `cb` with the index and node of every match of a compiled expression
pub fn query_each<F>(tree: &DomTree, top: NodeId, expr: &XPath, mut cb: F) -> Result<(), QueryError>
where
    F: FnMut(usize, NodeId),
{
    let nav = create_navigator(tree, top);
    for (i, n) in expr.select(&nav)?.enumerate() {
        cb(i, n.current());
    }
    Ok(())
}

/// Find every node matching `expr` under `top`
pub fn find(tree: &DomTree, top: NodeId, expr: &str) -> Result<Vec<NodeId>, QueryError> {
    query_all(tree, top, &XPath::compile(expr)?)
}

/// Find the first node matching `expr`, or `None`
pub fn find_one(tree: &DomTree, top: NodeId, expr: &str) -> Result<Option<NodeId>, QueryError> {
    query(tree, top, &XPath::compile(expr)?)
}

/// Visit each node matching `expr` with its zero-based index
pub fn find_each<F>(tree: &DomTree, top: NodeId, expr: &str, cb: F) -> Result<(), QueryError>
where
    F: FnMut(usize, NodeId),
{
    query_each(tree, top, &XPath::compile(expr)?, cb)
}

/// Read and parse an HTML file
pub fn load_doc(path: impl AsRef<Path>) -> Result<Document, QueryError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| QueryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("Loading HTML file: {}", path.display());
    Ok(hq_html::parse_reader(BufReader::new(file))?)
}
