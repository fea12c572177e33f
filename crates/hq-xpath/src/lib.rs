//! htmlquery XPath
//!
//! XPath 1.0 over any tree exposed through [`NodeNavigator`]. Expressions
//! are compiled once and can be run against many context nodes.

mod ast;
mod error;
mod eval;
mod functions;
mod lexer;
mod navigator;
mod parser;
mod value;

pub use error::XPathError;
pub use navigator::{NodeNavigator, NodeType};
pub use value::Value;

use eval::Context;

/// A compiled XPath expression
#[derive(Debug, Clone)]
pub struct XPath {
    source: String,
    expr: ast::Expr,
}

impl XPath {
    /// Compile an expression
    pub fn compile(source: &str) -> Result<Self, XPathError> {
        let expr = parser::parse(source)?;
        tracing::debug!("Compiled XPath expression: {}", source);
        Ok(Self {
            source: source.to_string(),
            expr,
        })
    }

    /// The expression text this was compiled from
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Select the nodes the expression denotes, with `nav` as context node.
    ///
    /// Fails with [`XPathError::NotANodeSet`] before touching the tree when
    /// the expression produces some other type.
    pub fn select<N: NodeNavigator>(&self, nav: &N) -> Result<NodeIter<N>, XPathError> {
        if !self.expr.yields_node_set() {
            return Err(XPathError::NotANodeSet);
        }
        let nodes = eval::evaluate(&self.expr, &Context::new(nav.clone()))?
            .into_node_set()
            .ok_or(XPathError::NotANodeSet)?;
        tracing::trace!("{} selected {} nodes", self.source, nodes.len());
        Ok(NodeIter {
            inner: nodes.into_iter(),
        })
    }

    /// Evaluate to a value of any type
    pub fn evaluate<N: NodeNavigator>(&self, nav: &N) -> Result<Value<N>, XPathError> {
        eval::evaluate(&self.expr, &Context::new(nav.clone()))
    }
}

impl std::str::FromStr for XPath {
    type Err = XPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

/// Navigators positioned on each selected node, in document order
#[derive(Debug)]
pub struct NodeIter<N> {
    inner: std::vec::IntoIter<N>,
}

impl<N> Iterator for NodeIter<N> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<N> ExactSizeIterator for NodeIter<N> {}
