//! Recursive descent parser for XPath 1.0.
//!
//! Precedence from loosest to tightest: `or`, `and`, equality, relational,
//! additive, multiplicative, unary minus, union, path and filter expressions.

use crate::XPathError;
use crate::ast::{Axis, BinaryOp, Expr, NodeTest, PathStart, Step};
use crate::functions::Function;
use crate::lexer::{Spanned, Token, tokenize};

/// Parse an expression into its compiled form
pub(crate) fn parse(input: &str) -> Result<Expr, XPathError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(XPathError::syntax(0, "empty expression"));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        end: input.len(),
    };
    let expr = parser.parse_or()?;
    if let Some(extra) = parser.tokens.get(parser.pos) {
        return Err(XPathError::syntax(
            extra.pos,
            format!("unexpected {:?} after expression", extra.token),
        ));
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    /// Byte length of the input, reported for errors at end of input
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|s| &s.token)
    }

    fn check(&self, token: &Token) -> bool {
        self.peek() == Some(token)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token, what: &str) -> Result<(), XPathError> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(format!("expected {what}")))
        }
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|s| s.token.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn current_pos(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |s| s.pos)
    }

    fn error(&self, message: impl Into<String>) -> XPathError {
        let message = message.into();
        match self.peek() {
            Some(token) => {
                XPathError::syntax(self.current_pos(), format!("{message}, found {token:?}"))
            }
            None => XPathError::syntax(self.end, format!("{message}, found end of expression")),
        }
    }

    fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn parse_or(&mut self) -> Result<Expr, XPathError> {
        let mut left = self.parse_and()?;
        while self.eat(&Token::Or) {
            let right = self.parse_and()?;
            left = Self::binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, XPathError> {
        let mut left = self.parse_equality()?;
        while self.eat(&Token::And) {
            let right = self.parse_equality()?;
            left = Self::binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, XPathError> {
        let mut left = self.parse_relational()?;
        loop {
            let op = match self.peek() {
                Some(Token::Equal) => BinaryOp::Equal,
                Some(Token::NotEqual) => BinaryOp::NotEqual,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.parse_relational()?;
            left = Self::binary(op, left, right);
        }
    }

    fn parse_relational(&mut self) -> Result<Expr, XPathError> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek() {
                Some(Token::Less) => BinaryOp::Less,
                Some(Token::LessEqual) => BinaryOp::LessEqual,
                Some(Token::Greater) => BinaryOp::Greater,
                Some(Token::GreaterEqual) => BinaryOp::GreaterEqual,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.parse_additive()?;
            left = Self::binary(op, left, right);
        }
    }

    fn parse_additive(&mut self) -> Result<Expr, XPathError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Subtract,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.parse_multiplicative()?;
            left = Self::binary(op, left, right);
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, XPathError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Multiply) => BinaryOp::Multiply,
                Some(Token::Div) => BinaryOp::Divide,
                Some(Token::Mod) => BinaryOp::Modulo,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.parse_unary()?;
            left = Self::binary(op, left, right);
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, XPathError> {
        let mut negations = 0usize;
        while self.eat(&Token::Minus) {
            negations += 1;
        }
        let mut expr = self.parse_union()?;
        for _ in 0..negations {
            expr = Expr::Negate(Box::new(expr));
        }
        Ok(expr)
    }

    fn parse_union(&mut self) -> Result<Expr, XPathError> {
        let mut left = self.parse_path()?;
        while self.eat(&Token::Pipe) {
            let right = self.parse_path()?;
            left = Expr::Union(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_path(&mut self) -> Result<Expr, XPathError> {
        match self.peek() {
            Some(Token::Slash) => {
                self.pos += 1;
                let steps = if self.starts_step() {
                    self.parse_relative_steps()?
                } else {
                    Vec::new()
                };
                Ok(Expr::Path {
                    start: PathStart::Root,
                    steps,
                })
            }
            Some(Token::DoubleSlash) => {
                self.pos += 1;
                let mut steps = vec![descendant_or_self()];
                steps.extend(self.parse_relative_steps()?);
                Ok(Expr::Path {
                    start: PathStart::Root,
                    steps,
                })
            }
            Some(
                Token::LeftParen
                | Token::Literal(_)
                | Token::Number(_)
                | Token::FunctionName(_)
                | Token::Variable(_),
            ) => self.parse_filter_path(),
            _ if self.starts_step() => Ok(Expr::Path {
                start: PathStart::Context,
                steps: self.parse_relative_steps()?,
            }),
            _ => Err(self.error("expected an expression")),
        }
    }

    /// `FilterExpr (('/' | '//') RelativeLocationPath)?`
    fn parse_filter_path(&mut self) -> Result<Expr, XPathError> {
        let primary = self.parse_primary()?;
        let predicates = self.parse_predicates()?;
        let filter = if predicates.is_empty() {
            primary
        } else {
            Expr::Filter {
                primary: Box::new(primary),
                predicates,
            }
        };

        let mut steps = Vec::new();
        if self.eat(&Token::DoubleSlash) {
            steps.push(descendant_or_self());
        } else if !self.eat(&Token::Slash) {
            return Ok(filter);
        }
        steps.extend(self.parse_relative_steps()?);
        Ok(Expr::Path {
            start: PathStart::Filter(Box::new(filter)),
            steps,
        })
    }

    fn parse_primary(&mut self) -> Result<Expr, XPathError> {
        let pos = self.current_pos();
        match self.advance() {
            Some(Token::LeftParen) => {
                let expr = self.parse_or()?;
                self.expect(&Token::RightParen, "')'")?;
                Ok(expr)
            }
            Some(Token::Literal(s)) => Ok(Expr::Literal(s)),
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::FunctionName(name)) => self.parse_call(name),
            Some(Token::Variable(name)) => Err(XPathError::syntax(
                pos,
                format!("variable references are not supported (${name})"),
            )),
            _ => Err(XPathError::syntax(pos, "expected a primary expression")),
        }
    }

    fn parse_call(&mut self, name: String) -> Result<Expr, XPathError> {
        self.expect(&Token::LeftParen, "'('")?;
        let mut args = Vec::new();
        if !self.eat(&Token::RightParen) {
            loop {
                args.push(self.parse_or()?);
                if self.eat(&Token::RightParen) {
                    break;
                }
                self.expect(&Token::Comma, "',' or ')'")?;
            }
        }

        let function = Function::resolve(&name, args.len())?;
        Ok(Expr::Call { function, args })
    }

    fn parse_predicates(&mut self) -> Result<Vec<Expr>, XPathError> {
        let mut predicates = Vec::new();
        while self.eat(&Token::LeftBracket) {
            predicates.push(self.parse_or()?);
            self.expect(&Token::RightBracket, "']'")?;
        }
        Ok(predicates)
    }

    fn starts_step(&self) -> bool {
        matches!(
            self.peek(),
            Some(
                Token::Dot
                    | Token::DotDot
                    | Token::At
                    | Token::AxisName(_)
                    | Token::NameTest(_)
                    | Token::NodeType(_)
            )
        )
    }

    fn parse_relative_steps(&mut self) -> Result<Vec<Step>, XPathError> {
        let mut steps = vec![self.parse_step()?];
        loop {
            if self.eat(&Token::Slash) {
                steps.push(self.parse_step()?);
            } else if self.eat(&Token::DoubleSlash) {
                steps.push(descendant_or_self());
                steps.push(self.parse_step()?);
            } else {
                return Ok(steps);
            }
        }
    }

    fn parse_step(&mut self) -> Result<Step, XPathError> {
        if self.eat(&Token::Dot) {
            return Ok(Step {
                axis: Axis::SelfAxis,
                test: NodeTest::Node,
                predicates: Vec::new(),
            });
        }
        if self.eat(&Token::DotDot) {
            return Ok(Step {
                axis: Axis::Parent,
                test: NodeTest::Node,
                predicates: Vec::new(),
            });
        }

        let axis = match self.peek() {
            Some(Token::At) => {
                self.pos += 1;
                Axis::Attribute
            }
            Some(Token::AxisName(name)) => {
                let pos = self.current_pos();
                let axis = Axis::from_name(name)
                    .ok_or_else(|| XPathError::syntax(pos, format!("unknown axis '{name}'")))?;
                self.pos += 1;
                self.expect(&Token::ColonColon, "'::'")?;
                axis
            }
            _ => Axis::Child,
        };

        let test = self.parse_node_test()?;
        let predicates = self.parse_predicates()?;
        Ok(Step {
            axis,
            test,
            predicates,
        })
    }

    fn parse_node_test(&mut self) -> Result<NodeTest, XPathError> {
        match self.peek().cloned() {
            Some(Token::NameTest(name)) => {
                self.pos += 1;
                Ok(name_test(&name))
            }
            Some(Token::NodeType(kind)) => {
                self.pos += 1;
                self.expect(&Token::LeftParen, "'('")?;
                let test = match kind.as_str() {
                    "node" => NodeTest::Node,
                    "text" => NodeTest::Text,
                    "comment" => NodeTest::Comment,
                    _ => {
                        // processing-instruction('target') may name a target
                        if matches!(self.peek(), Some(Token::Literal(_))) {
                            self.pos += 1;
                        }
                        NodeTest::ProcessingInstruction
                    }
                };
                self.expect(&Token::RightParen, "')'")?;
                Ok(test)
            }
            _ => Err(self.error("expected a node test")),
        }
    }
}

fn descendant_or_self() -> Step {
    Step {
        axis: Axis::DescendantOrSelf,
        test: NodeTest::Node,
        predicates: Vec::new(),
    }
}

fn name_test(name: &str) -> NodeTest {
    if name == "*" {
        return NodeTest::Wildcard;
    }
    match name.split_once(':') {
        Some((prefix, "*")) => NodeTest::PrefixWildcard(prefix.to_string()),
        Some((prefix, local)) => NodeTest::Name {
            prefix: prefix.to_string(),
            local: local.to_string(),
        },
        None => NodeTest::Name {
            prefix: String::new(),
            local: name.to_string(),
        },
    }
}
