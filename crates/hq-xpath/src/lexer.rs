//! XPath 1.0 tokenizer.
//!
//! Tokens are classified while lexing using the disambiguation rules of
//! XPath 1.0 section 3.7: whether the previous token can end an operand
//! decides if `*` multiplies and if a name is an operator keyword; the next
//! non-blank character decides between function names, node type tests,
//! axis names and name tests.

use crate::XPathError;

/// Names that form node type tests when followed by `(`
const NODE_TYPE_NAMES: &[&str] = &["comment", "text", "processing-instruction", "node"];

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Dot,
    DotDot,
    At,
    Comma,
    ColonColon,
    Slash,
    DoubleSlash,
    Pipe,
    Plus,
    Minus,
    /// `*` in operator position
    Multiply,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
    Mod,
    Div,
    Number(f64),
    Literal(String),
    /// `name`, `prefix:name`, `*` or `prefix:*`
    NameTest(String),
    FunctionName(String),
    NodeType(String),
    AxisName(String),
    Variable(String),
}

impl Token {
    /// Whether an expression operand can end with this token
    fn ends_operand(&self) -> bool {
        matches!(
            self,
            Token::RightParen
                | Token::RightBracket
                | Token::Dot
                | Token::DotDot
                | Token::Number(_)
                | Token::Literal(_)
                | Token::NameTest(_)
                | Token::Variable(_)
        )
    }
}

/// A token with the byte offset it started at
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Spanned {
    pub token: Token,
    pub pos: usize,
}

/// Tokenize a full expression
pub(crate) fn tokenize(input: &str) -> Result<Vec<Spanned>, XPathError> {
    let mut lexer = Lexer {
        input,
        pos: 0,
        tokens: Vec::new(),
    };
    lexer.run()?;
    Ok(lexer.tokens)
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    tokens: Vec<Spanned>,
}

impl<'a> Lexer<'a> {
    fn run(&mut self) -> Result<(), XPathError> {
        loop {
            self.skip_whitespace();
            let start = self.pos;
            let Some(ch) = self.peek() else {
                return Ok(());
            };

            let token = match ch {
                '(' => self.single(Token::LeftParen),
                ')' => self.single(Token::RightParen),
                '[' => self.single(Token::LeftBracket),
                ']' => self.single(Token::RightBracket),
                '@' => self.single(Token::At),
                ',' => self.single(Token::Comma),
                '|' => self.single(Token::Pipe),
                '+' => self.single(Token::Plus),
                '-' => self.single(Token::Minus),
                '=' => self.single(Token::Equal),
                '*' => {
                    self.bump();
                    if self.prev_ends_operand() {
                        Token::Multiply
                    } else {
                        Token::NameTest("*".to_string())
                    }
                }
                '/' => {
                    self.bump();
                    if self.eat('/') { Token::DoubleSlash } else { Token::Slash }
                }
                '<' => {
                    self.bump();
                    if self.eat('=') { Token::LessEqual } else { Token::Less }
                }
                '>' => {
                    self.bump();
                    if self.eat('=') { Token::GreaterEqual } else { Token::Greater }
                }
                '!' => {
                    self.bump();
                    if !self.eat('=') {
                        return Err(XPathError::syntax(start, "expected '=' after '!'"));
                    }
                    Token::NotEqual
                }
                ':' => {
                    self.bump();
                    if !self.eat(':') {
                        return Err(XPathError::syntax(start, "expected '::'"));
                    }
                    Token::ColonColon
                }
                '.' => self.read_dot()?,
                '"' | '\'' => self.read_literal(ch)?,
                '$' => {
                    self.bump();
                    let name = self.read_qname();
                    if name.is_empty() {
                        return Err(XPathError::syntax(start, "expected variable name after '$'"));
                    }
                    Token::Variable(name)
                }
                c if c.is_ascii_digit() => self.read_number(start)?,
                c if is_name_start(c) => self.read_name(start)?,
                other => {
                    return Err(XPathError::syntax(
                        start,
                        format!("unexpected character '{other}'"),
                    ));
                }
            };

            self.tokens.push(Spanned { token, pos: start });
        }
    }

    fn single(&mut self, token: Token) -> Token {
        self.bump();
        token
    }

    fn read_dot(&mut self) -> Result<Token, XPathError> {
        let start = self.pos;
        self.bump();
        if self.eat('.') {
            return Ok(Token::DotDot);
        }
        if self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump_while(|c| c.is_ascii_digit());
            return self.number_from(start);
        }
        Ok(Token::Dot)
    }

    fn read_number(&mut self, start: usize) -> Result<Token, XPathError> {
        self.bump_while(|c| c.is_ascii_digit());
        if self.eat('.') {
            self.bump_while(|c| c.is_ascii_digit());
        }
        self.number_from(start)
    }

    fn number_from(&self, start: usize) -> Result<Token, XPathError> {
        let text = &self.input[start..self.pos];
        text.parse::<f64>()
            .map(Token::Number)
            .map_err(|_| XPathError::syntax(start, format!("invalid number '{text}'")))
    }

    fn read_literal(&mut self, quote: char) -> Result<Token, XPathError> {
        let start = self.pos;
        self.bump();
        let content_start = self.pos;
        self.bump_while(|c| c != quote);
        if self.peek().is_none() {
            return Err(XPathError::syntax(start, "unterminated string literal"));
        }
        let content = self.input[content_start..self.pos].to_string();
        self.bump();
        Ok(Token::Literal(content))
    }

    /// Read `NCName` or `prefix:local`; `prefix:*` is also accepted
    fn read_qname(&mut self) -> String {
        let start = self.pos;
        if !self.peek().is_some_and(is_name_start) {
            return String::new();
        }
        self.bump_while(is_name_char);

        let mut rest = self.input[self.pos..].chars();
        if rest.next() == Some(':') {
            match rest.next() {
                Some('*') => {
                    self.pos += 2;
                }
                Some(c) if is_name_start(c) => {
                    self.bump();
                    self.bump_while(is_name_char);
                }
                _ => {}
            }
        }
        self.input[start..self.pos].to_string()
    }

    fn read_name(&mut self, start: usize) -> Result<Token, XPathError> {
        let name = self.read_qname();

        if self.prev_ends_operand() {
            return match name.as_str() {
                "and" => Ok(Token::And),
                "or" => Ok(Token::Or),
                "mod" => Ok(Token::Mod),
                "div" => Ok(Token::Div),
                _ => Err(XPathError::syntax(
                    start,
                    format!("expected an operator, found '{name}'"),
                )),
            };
        }

        let lookahead = self.input[self.pos..].trim_start();
        if lookahead.starts_with('(') {
            if NODE_TYPE_NAMES.contains(&name.as_str()) {
                return Ok(Token::NodeType(name));
            }
            return Ok(Token::FunctionName(name));
        }
        if lookahead.starts_with("::") && !name.contains(':') {
            return Ok(Token::AxisName(name));
        }
        Ok(Token::NameTest(name))
    }

    fn prev_ends_operand(&self) -> bool {
        self.tokens.last().is_some_and(|t| t.token.ends_operand())
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        self.bump_while(|c| matches!(c, ' ' | '\t' | '\r' | '\n'));
    }
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '\u{B7}')
}
