//! XPath errors

/// Errors raised while compiling or evaluating an expression
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum XPathError {
    /// The expression is not well formed
    #[error("syntax error at position {position}: {message}")]
    Syntax { message: String, position: usize },

    #[error("unknown function: {0}()")]
    UnknownFunction(String),

    #[error("function {name}() expects {expected} argument(s), got {found}")]
    Arity {
        name: String,
        expected: String,
        found: usize,
    },

    /// A node-set was required but the expression yields another type
    #[error("expression does not evaluate to a node-set")]
    NotANodeSet,

    /// Runtime type mismatch (e.g. `count("a")`)
    #[error("type error: {0}")]
    Type(String),
}

impl XPathError {
    pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            message: message.into(),
            position,
        }
    }
}
