//! Compiled expression tree

use crate::functions::Function;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Axis {
    Ancestor,
    AncestorOrSelf,
    Attribute,
    Child,
    Descendant,
    DescendantOrSelf,
    Following,
    FollowingSibling,
    Namespace,
    Parent,
    Preceding,
    PrecedingSibling,
    SelfAxis,
}

impl Axis {
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "ancestor" => Axis::Ancestor,
            "ancestor-or-self" => Axis::AncestorOrSelf,
            "attribute" => Axis::Attribute,
            "child" => Axis::Child,
            "descendant" => Axis::Descendant,
            "descendant-or-self" => Axis::DescendantOrSelf,
            "following" => Axis::Following,
            "following-sibling" => Axis::FollowingSibling,
            "namespace" => Axis::Namespace,
            "parent" => Axis::Parent,
            "preceding" => Axis::Preceding,
            "preceding-sibling" => Axis::PrecedingSibling,
            "self" => Axis::SelfAxis,
            _ => return None,
        })
    }

    /// Reverse axes number their predicate positions from the context outwards
    pub(crate) fn is_reverse(self) -> bool {
        matches!(
            self,
            Axis::Ancestor | Axis::AncestorOrSelf | Axis::Preceding | Axis::PrecedingSibling
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum NodeTest {
    /// `local` or `prefix:local`
    Name { prefix: String, local: String },
    /// `*`
    Wildcard,
    /// `prefix:*`
    PrefixWildcard(String),
    /// `node()`
    Node,
    /// `text()`
    Text,
    /// `comment()`
    Comment,
    /// `processing-instruction()`; never matches since navigators expose no PIs
    ProcessingInstruction,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Step {
    pub axis: Axis,
    pub test: NodeTest,
    pub predicates: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Or,
    And,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

/// Where a location path begins
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PathStart {
    /// `/...`
    Root,
    /// relative path
    Context,
    /// `filter-expr/...`
    Filter(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    Path { start: PathStart, steps: Vec<Step> },
    Filter { primary: Box<Expr>, predicates: Vec<Expr> },
    Union(Box<Expr>, Box<Expr>),
    Negate(Box<Expr>),
    Binary { op: BinaryOp, left: Box<Expr>, right: Box<Expr> },
    Call { function: Function, args: Vec<Expr> },
    Number(f64),
    Literal(String),
}

impl Expr {
    /// Whether evaluation yields a node-set. No library function returns
    /// one, so this is decided from the expression shape alone.
    pub(crate) fn yields_node_set(&self) -> bool {
        match self {
            Expr::Path { .. } | Expr::Union(..) => true,
            Expr::Filter { primary, .. } => primary.yields_node_set(),
            Expr::Negate(_)
            | Expr::Binary { .. }
            | Expr::Call { .. }
            | Expr::Number(_)
            | Expr::Literal(_) => false,
        }
    }
}
