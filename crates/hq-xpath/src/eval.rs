//! Expression evaluation over a [`NodeNavigator`]

use crate::ast::{Axis, BinaryOp, Expr, NodeTest, PathStart, Step};
use crate::functions;
use crate::value::Value;
use crate::{NodeNavigator, NodeType, XPathError};

/// Evaluation context: the node plus its position within the current set
pub(crate) struct Context<N> {
    pub node: N,
    pub position: usize,
    pub size: usize,
}

impl<N: NodeNavigator> Context<N> {
    pub(crate) fn new(node: N) -> Self {
        Self {
            node,
            position: 1,
            size: 1,
        }
    }
}

pub(crate) fn evaluate<N: NodeNavigator>(
    expr: &Expr,
    ctx: &Context<N>,
) -> Result<Value<N>, XPathError> {
    match expr {
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::Literal(s) => Ok(Value::String(s.clone())),
        Expr::Negate(inner) => Ok(Value::Number(-evaluate(inner, ctx)?.number())),
        Expr::Call { function, args } => functions::call(*function, args, ctx),
        Expr::Binary { op, left, right } => eval_binary(*op, left, right, ctx),
        Expr::Union(left, right) => {
            let mut nodes = node_set(evaluate(left, ctx)?, "|")?;
            nodes.extend(node_set(evaluate(right, ctx)?, "|")?);
            Ok(Value::NodeSet(document_order(nodes)))
        }
        Expr::Filter { primary, predicates } => {
            let nodes = node_set(evaluate(primary, ctx)?, "a predicate")?;
            Ok(Value::NodeSet(apply_predicates(nodes, predicates)?))
        }
        Expr::Path { start, steps } => {
            let initial = match start {
                PathStart::Root => {
                    let mut root = ctx.node.clone();
                    root.move_to_root();
                    vec![root]
                }
                PathStart::Context => vec![ctx.node.clone()],
                PathStart::Filter(filter) => node_set(evaluate(filter, ctx)?, "'/'")?,
            };
            let mut nodes = initial;
            for step in steps {
                nodes = eval_step(step, nodes)?;
            }
            Ok(Value::NodeSet(nodes))
        }
    }
}

fn node_set<N>(value: Value<N>, operator: &str) -> Result<Vec<N>, XPathError> {
    match value {
        Value::NodeSet(nodes) => Ok(nodes),
        _ => Err(XPathError::Type(format!("{operator} requires a node-set operand"))),
    }
}

/// Apply one location step to every node of the input set
fn eval_step<N: NodeNavigator>(step: &Step, input: Vec<N>) -> Result<Vec<N>, XPathError> {
    let single_input = input.len() == 1;
    let mut out = Vec::new();

    for node in &input {
        let candidates: Vec<N> = axis_nodes(node, step.axis)
            .into_iter()
            .filter(|n| matches_test(n, &step.test, step.axis))
            .collect();
        out.extend(apply_predicates(candidates, &step.predicates)?);
    }

    if single_input {
        // one context node: the axis never repeats a node
        if step.axis.is_reverse() {
            out.reverse();
        }
        Ok(out)
    } else {
        Ok(document_order(out))
    }
}

/// Filter `nodes` through each predicate in turn, numbering positions in
/// the order the nodes are given.
fn apply_predicates<N: NodeNavigator>(
    mut nodes: Vec<N>,
    predicates: &[Expr],
) -> Result<Vec<N>, XPathError> {
    for predicate in predicates {
        let size = nodes.len();
        let mut kept = Vec::with_capacity(size);
        for (index, node) in nodes.into_iter().enumerate() {
            let ctx = Context {
                node,
                position: index + 1,
                size,
            };
            let keep = match evaluate(predicate, &ctx)? {
                Value::Number(n) => n == ctx.position as f64,
                other => other.boolean(),
            };
            if keep {
                kept.push(ctx.node);
            }
        }
        nodes = kept;
    }
    Ok(nodes)
}

fn matches_test<N: NodeNavigator>(node: &N, test: &NodeTest, axis: Axis) -> bool {
    let principal = if axis == Axis::Attribute {
        NodeType::Attribute
    } else {
        NodeType::Element
    };

    match test {
        NodeTest::Node => true,
        NodeTest::Text => node.node_type() == NodeType::Text,
        NodeTest::Comment => node.node_type() == NodeType::Comment,
        NodeTest::ProcessingInstruction => false,
        NodeTest::Wildcard => node.node_type() == principal,
        NodeTest::PrefixWildcard(prefix) => {
            node.node_type() == principal && node.prefix() == prefix
        }
        NodeTest::Name { prefix, local } => {
            node.node_type() == principal && node.local_name() == local && node.prefix() == prefix
        }
    }
}

/// Nodes along `axis` from `start`, in proximity order
fn axis_nodes<N: NodeNavigator>(start: &N, axis: Axis) -> Vec<N> {
    let mut out = Vec::new();
    let on_attribute = start.node_type() == NodeType::Attribute;

    match axis {
        Axis::SelfAxis => out.push(start.clone()),
        Axis::Child => {
            let mut n = start.clone();
            if n.move_to_child() {
                out.push(n.clone());
                while n.move_to_next() {
                    out.push(n.clone());
                }
            }
        }
        Axis::Attribute => {
            if start.node_type() == NodeType::Element {
                let mut n = start.clone();
                while n.move_to_next_attribute() {
                    out.push(n.clone());
                }
            }
        }
        Axis::Parent => {
            let mut n = start.clone();
            if n.move_to_parent() {
                out.push(n);
            }
        }
        Axis::Descendant => push_descendants(start, &mut out),
        Axis::DescendantOrSelf => {
            out.push(start.clone());
            push_descendants(start, &mut out);
        }
        Axis::Ancestor | Axis::AncestorOrSelf => {
            if axis == Axis::AncestorOrSelf {
                out.push(start.clone());
            }
            let mut n = start.clone();
            while n.move_to_parent() {
                out.push(n.clone());
            }
        }
        Axis::FollowingSibling => {
            if !on_attribute {
                let mut n = start.clone();
                while n.move_to_next() {
                    out.push(n.clone());
                }
            }
        }
        Axis::PrecedingSibling => {
            if !on_attribute {
                let mut n = start.clone();
                while n.move_to_previous() {
                    out.push(n.clone());
                }
            }
        }
        Axis::Following => {
            let mut n = start.clone();
            if on_attribute {
                // the owner's content follows its attributes
                n.move_to_parent();
                push_descendants(&n, &mut out);
            }
            loop {
                let mut sibling = n.clone();
                while sibling.move_to_next() {
                    out.push(sibling.clone());
                    push_descendants(&sibling, &mut out);
                }
                if !n.move_to_parent() {
                    break;
                }
            }
        }
        Axis::Preceding => {
            let mut n = start.clone();
            if on_attribute {
                n.move_to_parent();
            }
            loop {
                let mut sibling = n.clone();
                while sibling.move_to_previous() {
                    let mut subtree = Vec::new();
                    push_descendants(&sibling, &mut subtree);
                    out.extend(subtree.into_iter().rev());
                    out.push(sibling.clone());
                }
                if !n.move_to_parent() {
                    break;
                }
            }
        }
        Axis::Namespace => {}
    }

    out
}

/// Depth-first pre-order walk of the subtree below `start`, iterative so
/// deep documents cannot exhaust the stack.
fn push_descendants<N: NodeNavigator>(start: &N, out: &mut Vec<N>) {
    let mut n = start.clone();
    if !n.move_to_child() {
        return;
    }
    'walk: loop {
        out.push(n.clone());
        if n.move_to_child() {
            continue;
        }
        loop {
            if n.move_to_next() {
                continue 'walk;
            }
            if !n.move_to_parent() || n.is_same_position(start) {
                break 'walk;
            }
        }
    }
}

/// Position of a node relative to the top of its tree, found by walking.
/// Attributes sort before the children of their element.
fn path_key<N: NodeNavigator>(node: &N) -> Vec<(u8, usize)> {
    let mut key = Vec::new();
    let mut n = node.clone();

    loop {
        if n.node_type() == NodeType::Attribute {
            let mut owner = n.clone();
            owner.move_to_parent();
            let mut probe = owner.clone();
            let mut index = 0;
            while probe.move_to_next_attribute() && !probe.is_same_position(&n) {
                index += 1;
            }
            key.push((0, index));
            n = owner;
            continue;
        }

        let mut sibling = n.clone();
        let mut index = 0;
        while sibling.move_to_previous() {
            index += 1;
        }
        key.push((1, index));
        if !n.move_to_parent() {
            break;
        }
    }

    key.reverse();
    key
}

/// Sort into document order and drop duplicates
pub(crate) fn document_order<N: NodeNavigator>(nodes: Vec<N>) -> Vec<N> {
    if nodes.len() < 2 {
        return nodes;
    }
    let positions: Option<Vec<(usize, usize)>> =
        nodes.iter().map(N::document_position).collect();
    match positions {
        Some(keys) => sort_unique(keys.into_iter().zip(nodes).collect()),
        None => sort_unique(nodes.into_iter().map(|n| (path_key(&n), n)).collect()),
    }
}

fn sort_unique<K: Ord, N>(mut keyed: Vec<(K, N)>) -> Vec<N> {
    // already strictly ascending means sorted and free of duplicates
    if !keyed.windows(2).all(|w| w[0].0 < w[1].0) {
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        keyed.dedup_by(|a, b| a.0 == b.0);
    }
    keyed.into_iter().map(|(_, n)| n).collect()
}

fn eval_binary<N: NodeNavigator>(
    op: BinaryOp,
    left: &Expr,
    right: &Expr,
    ctx: &Context<N>,
) -> Result<Value<N>, XPathError> {
    match op {
        BinaryOp::Or => Ok(Value::Boolean(
            evaluate(left, ctx)?.boolean() || evaluate(right, ctx)?.boolean(),
        )),
        BinaryOp::And => Ok(Value::Boolean(
            evaluate(left, ctx)?.boolean() && evaluate(right, ctx)?.boolean(),
        )),
        BinaryOp::Equal
        | BinaryOp::NotEqual
        | BinaryOp::Less
        | BinaryOp::LessEqual
        | BinaryOp::Greater
        | BinaryOp::GreaterEqual => {
            let l = evaluate(left, ctx)?;
            let r = evaluate(right, ctx)?;
            Ok(Value::Boolean(compare(op, l, r)))
        }
        BinaryOp::Add
        | BinaryOp::Subtract
        | BinaryOp::Multiply
        | BinaryOp::Divide
        | BinaryOp::Modulo => {
            let l = evaluate(left, ctx)?.number();
            let r = evaluate(right, ctx)?.number();
            Ok(Value::Number(match op {
                BinaryOp::Add => l + r,
                BinaryOp::Subtract => l - r,
                BinaryOp::Multiply => l * r,
                BinaryOp::Divide => l / r,
                _ => l % r,
            }))
        }
    }
}

/// Scalar operand of a comparison
#[derive(Debug, Clone)]
enum Atom {
    Str(String),
    Num(f64),
    Bool(bool),
}

fn atom<N: NodeNavigator>(value: &Value<N>) -> Atom {
    match value {
        Value::Boolean(b) => Atom::Bool(*b),
        Value::Number(n) => Atom::Num(*n),
        other => Atom::Str(other.string()),
    }
}

/// Comparison with the XPath 1.0 node-set semantics: a node-set compares
/// true if any of its members does.
fn compare<N: NodeNavigator>(op: BinaryOp, left: Value<N>, right: Value<N>) -> bool {
    match (left, right) {
        (Value::NodeSet(a), Value::NodeSet(b)) => {
            let right_values: Vec<String> = b.iter().map(|n| n.value()).collect();
            a.iter().any(|x| {
                let xv = x.value();
                right_values
                    .iter()
                    .any(|y| compare_atoms(op, &Atom::Str(xv.clone()), &Atom::Str(y.clone())))
            })
        }
        (Value::NodeSet(a), Value::Boolean(b)) => {
            compare_atoms(op, &Atom::Bool(!a.is_empty()), &Atom::Bool(b))
        }
        (Value::Boolean(a), Value::NodeSet(b)) => {
            compare_atoms(op, &Atom::Bool(a), &Atom::Bool(!b.is_empty()))
        }
        (Value::NodeSet(a), other) => {
            let other = atom(&other);
            a.iter()
                .any(|x| compare_atoms(op, &Atom::Str(x.value()), &other))
        }
        (other, Value::NodeSet(b)) => {
            let other = atom(&other);
            b.iter()
                .any(|y| compare_atoms(op, &other, &Atom::Str(y.value())))
        }
        (l, r) => compare_atoms(op, &atom(&l), &atom(&r)),
    }
}

fn compare_atoms(op: BinaryOp, left: &Atom, right: &Atom) -> bool {
    match op {
        BinaryOp::Equal | BinaryOp::NotEqual => {
            let equal = match (left, right) {
                (Atom::Bool(_), _) | (_, Atom::Bool(_)) => atom_bool(left) == atom_bool(right),
                (Atom::Num(_), _) | (_, Atom::Num(_)) => atom_num(left) == atom_num(right),
                (Atom::Str(a), Atom::Str(b)) => a == b,
            };
            if op == BinaryOp::Equal { equal } else { !equal }
        }
        _ => {
            let (l, r) = (atom_num(left), atom_num(right));
            match op {
                BinaryOp::Less => l < r,
                BinaryOp::LessEqual => l <= r,
                BinaryOp::Greater => l > r,
                _ => l >= r,
            }
        }
    }
}

fn atom_bool(atom: &Atom) -> bool {
    match atom {
        Atom::Bool(b) => *b,
        Atom::Num(n) => *n != 0.0 && !n.is_nan(),
        Atom::Str(s) => !s.is_empty(),
    }
}

fn atom_num(atom: &Atom) -> f64 {
    match atom {
        Atom::Bool(b) => f64::from(u8::from(*b)),
        Atom::Num(n) => *n,
        Atom::Str(s) => crate::value::string_to_number(s),
    }
}
