//! Core function library

use crate::ast::Expr;
use crate::eval::{Context, evaluate};
use crate::value::{Value, string_to_number};
use crate::{NodeNavigator, NodeType, XPathError};

/// Built-in functions, resolved when the expression is compiled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Function {
    Last,
    Position,
    Count,
    LocalName,
    NamespaceUri,
    Name,
    String,
    Concat,
    StartsWith,
    EndsWith,
    Contains,
    SubstringBefore,
    SubstringAfter,
    Substring,
    StringLength,
    NormalizeSpace,
    Translate,
    Boolean,
    Not,
    True,
    False,
    Number,
    Sum,
    Floor,
    Ceiling,
    Round,
}

/// Name, function, minimum and maximum argument count
const LIBRARY: &[(&str, Function, usize, Option<usize>)] = &[
    ("last", Function::Last, 0, Some(0)),
    ("position", Function::Position, 0, Some(0)),
    ("count", Function::Count, 1, Some(1)),
    ("local-name", Function::LocalName, 0, Some(1)),
    ("namespace-uri", Function::NamespaceUri, 0, Some(1)),
    ("name", Function::Name, 0, Some(1)),
    ("string", Function::String, 0, Some(1)),
    ("concat", Function::Concat, 2, None),
    ("starts-with", Function::StartsWith, 2, Some(2)),
    ("ends-with", Function::EndsWith, 2, Some(2)),
    ("contains", Function::Contains, 2, Some(2)),
    ("substring-before", Function::SubstringBefore, 2, Some(2)),
    ("substring-after", Function::SubstringAfter, 2, Some(2)),
    ("substring", Function::Substring, 2, Some(3)),
    ("string-length", Function::StringLength, 0, Some(1)),
    ("normalize-space", Function::NormalizeSpace, 0, Some(1)),
    ("translate", Function::Translate, 3, Some(3)),
    ("boolean", Function::Boolean, 1, Some(1)),
    ("not", Function::Not, 1, Some(1)),
    ("true", Function::True, 0, Some(0)),
    ("false", Function::False, 0, Some(0)),
    ("number", Function::Number, 0, Some(1)),
    ("sum", Function::Sum, 1, Some(1)),
    ("floor", Function::Floor, 1, Some(1)),
    ("ceiling", Function::Ceiling, 1, Some(1)),
    ("round", Function::Round, 1, Some(1)),
];

impl Function {
    /// Look up `name` and check the argument count
    pub(crate) fn resolve(name: &str, argc: usize) -> Result<Function, XPathError> {
        let &(_, function, min, max) = LIBRARY
            .iter()
            .find(|(n, ..)| *n == name)
            .ok_or_else(|| XPathError::UnknownFunction(name.to_string()))?;

        if argc < min || max.is_some_and(|max| argc > max) {
            let expected = match max {
                Some(max) if max == min => min.to_string(),
                Some(max) => format!("{min} to {max}"),
                None => format!("at least {min}"),
            };
            return Err(XPathError::Arity {
                name: name.to_string(),
                expected,
                found: argc,
            });
        }
        Ok(function)
    }
}

pub(crate) fn call<N: NodeNavigator>(
    function: Function,
    args: &[Expr],
    ctx: &Context<N>,
) -> Result<Value<N>, XPathError> {
    let arg = |i: usize| evaluate(&args[i], ctx);
    let string_arg = |i: usize| -> Result<String, XPathError> { Ok(arg(i)?.string()) };
    // optional argument defaulting to the context node
    let string_or_context = || -> Result<String, XPathError> {
        match args.first() {
            Some(expr) => Ok(evaluate(expr, ctx)?.string()),
            None => Ok(ctx.node.value()),
        }
    };

    let value = match function {
        Function::Last => Value::Number(ctx.size as f64),
        Function::Position => Value::Number(ctx.position as f64),
        Function::Count => Value::Number(node_set_arg(arg(0)?, "count")?.len() as f64),
        Function::LocalName | Function::Name | Function::NamespaceUri => {
            let node = match args.first() {
                Some(expr) => node_set_arg(evaluate(expr, ctx)?, "name")?.into_iter().next(),
                None => Some(ctx.node.clone()),
            };
            let name = node.map(|n| qualified_name(&n, function)).unwrap_or_default();
            Value::String(name)
        }
        Function::String => Value::String(string_or_context()?),
        Function::Concat => {
            let mut out = String::new();
            for expr in args {
                out.push_str(&evaluate(expr, ctx)?.string());
            }
            Value::String(out)
        }
        Function::StartsWith => Value::Boolean(string_arg(0)?.starts_with(&string_arg(1)?)),
        Function::EndsWith => Value::Boolean(string_arg(0)?.ends_with(&string_arg(1)?)),
        Function::Contains => Value::Boolean(string_arg(0)?.contains(&string_arg(1)?)),
        Function::SubstringBefore => {
            let (s, pat) = (string_arg(0)?, string_arg(1)?);
            Value::String(
                s.split_once(pat.as_str())
                    .map(|(before, _)| before.to_string())
                    .unwrap_or_default(),
            )
        }
        Function::SubstringAfter => {
            let (s, pat) = (string_arg(0)?, string_arg(1)?);
            Value::String(
                s.split_once(pat.as_str())
                    .map(|(_, after)| after.to_string())
                    .unwrap_or_default(),
            )
        }
        Function::Substring => {
            let s = string_arg(0)?;
            let start = round(arg(1)?.number());
            let length = match args.get(2) {
                Some(expr) => Some(round(evaluate(expr, ctx)?.number())),
                None => None,
            };
            Value::String(substring(&s, start, length))
        }
        Function::StringLength => Value::Number(string_or_context()?.chars().count() as f64),
        Function::NormalizeSpace => Value::String(normalize_space(&string_or_context()?)),
        Function::Translate => {
            Value::String(translate(&string_arg(0)?, &string_arg(1)?, &string_arg(2)?))
        }
        Function::Boolean => Value::Boolean(arg(0)?.boolean()),
        Function::Not => Value::Boolean(!arg(0)?.boolean()),
        Function::True => Value::Boolean(true),
        Function::False => Value::Boolean(false),
        Function::Number => match args.first() {
            Some(expr) => Value::Number(evaluate(expr, ctx)?.number()),
            None => Value::Number(string_to_number(&ctx.node.value())),
        },
        Function::Sum => {
            let nodes = node_set_arg(arg(0)?, "sum")?;
            Value::Number(nodes.iter().map(|n| string_to_number(&n.value())).sum())
        }
        Function::Floor => Value::Number(arg(0)?.number().floor()),
        Function::Ceiling => Value::Number(arg(0)?.number().ceil()),
        Function::Round => Value::Number(round(arg(0)?.number())),
    };
    Ok(value)
}

fn node_set_arg<N>(value: Value<N>, function: &str) -> Result<Vec<N>, XPathError> {
    match value {
        Value::NodeSet(nodes) => Ok(nodes),
        _ => Err(XPathError::Type(format!(
            "{function}() requires a node-set argument"
        ))),
    }
}

/// Only elements and attributes carry names
fn qualified_name<N: NodeNavigator>(node: &N, function: Function) -> String {
    if !matches!(node.node_type(), NodeType::Element | NodeType::Attribute) {
        return String::new();
    }
    match function {
        Function::NamespaceUri => String::new(),
        Function::Name if !node.prefix().is_empty() => {
            format!("{}:{}", node.prefix(), node.local_name())
        }
        _ => node.local_name().to_string(),
    }
}

/// Round half up, keeping NaN, infinities and negative zero
fn round(n: f64) -> f64 {
    if n.is_nan() || n.is_infinite() {
        return n;
    }
    if (-0.5..0.0).contains(&n) {
        return -0.0;
    }
    (n + 0.5).floor()
}

/// Characters at 1-based positions `p` with `start <= p < start + length`
fn substring(s: &str, start: f64, length: Option<f64>) -> String {
    let end = length.map(|len| start + len);
    s.chars()
        .enumerate()
        .filter(|(i, _)| {
            let p = (*i + 1) as f64;
            p >= start && end.is_none_or(|end| p < end)
        })
        .map(|(_, c)| c)
        .collect()
}

fn normalize_space(s: &str) -> String {
    s.split(|c| matches!(c, ' ' | '\t' | '\r' | '\n'))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn translate(s: &str, from: &str, to: &str) -> String {
    let from: Vec<char> = from.chars().collect();
    let to: Vec<char> = to.chars().collect();
    s.chars()
        .filter_map(|c| match from.iter().position(|&f| f == c) {
            Some(i) => to.get(i).copied(),
            None => Some(c),
        })
        .collect()
}
