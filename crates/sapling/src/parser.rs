//! Recursive-descent parser from tokens to an expression tree
//!
//! Precedence, lowest first:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | '%') unary | power)*     -- bare `power` is implicit `*`
//! unary   := ('-' | '+') unary | power
//! power   := primary ('^' unary)?                         -- right-associative
//! primary := NUMBER | IDENT | IDENT '(' args ')' | '(' expr ')'
//! ```

use tracing::debug;

use crate::definitions::Definitions;
use crate::error::{ParseError, Span};
use crate::lexer::{tokenize, Token, TokenKind};
use crate::tree::constant::builtin_constant;
use crate::tree::{BinaryOperator, Function, Node};
use crate::Axis;

/// Parser configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum nesting of parentheses, prefix operators and exponents
    pub max_depth: usize,

    /// Accept juxtaposition as multiplication (`2x`, `3(x + 1)`)
    pub implicit_multiplication: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: 256,
            implicit_multiplication: true,
        }
    }
}

/// Parse `source` into a tree, resolving user constants from `definitions`.
pub fn parse(
    source: &str,
    options: &ParseOptions,
    definitions: &Definitions,
) -> Result<Node, ParseError> {
    let tokens = tokenize(source)?;
    debug!(source, tokens = tokens.len(), "parsing expression");

    let mut parser = Parser {
        tokens,
        pos: 0,
        end: source.len(),
        depth: 0,
        options,
        definitions,
    };
    let root = parser.parse_expr()?;

    if let Some(token) = parser.peek() {
        return Err(ParseError::UnexpectedToken {
            expected: "operator or end of input".to_string(),
            found: token.kind.to_string(),
            span: token.span,
        });
    }
    Ok(root)
}

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    end: usize,
    depth: usize,
    options: &'a ParseOptions,
    definitions: &'a Definitions,
}

impl Parser<'_> {
    // ═══════════════════════════════════════════════════════════════════
    // Token Cursor
    // ═══════════════════════════════════════════════════════════════════

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn current_span(&self) -> Span {
        self.peek().map(|t| t.span).unwrap_or(Span::at(self.end))
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, ParseError> {
        match self.advance() {
            Some(token) if token.kind == kind => Ok(token),
            Some(token) => Err(ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: token.kind.to_string(),
                span: token.span,
            }),
            None => Err(self.unexpected_end(expected)),
        }
    }

    fn unexpected_end(&self, expected: &str) -> ParseError {
        ParseError::UnexpectedEnd {
            expected: expected.to_string(),
            span: Span::at(self.end),
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Grammar
    // ═══════════════════════════════════════════════════════════════════

    fn parse_expr(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Plus) => BinaryOperator::Add,
                Some(TokenKind::Minus) => BinaryOperator::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_term()?;
            left = Node::binary(op, left, right);
        }
    }

    fn parse_term(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Star) => BinaryOperator::Mul,
                Some(TokenKind::Slash) => BinaryOperator::Div,
                Some(TokenKind::Percent) => BinaryOperator::Rem,
                Some(TokenKind::Ident(_) | TokenKind::LParen)
                    if self.options.implicit_multiplication =>
                {
                    // `x(x(...))` recurses without passing through `parse_unary`
                    self.enter()?;
                    let right = self.parse_power();
                    self.depth -= 1;
                    left = Node::mul(left, right?);
                    continue;
                }
                _ => return Ok(left),
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Node::binary(op, left, right);
        }
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(ParseError::NestingTooDeep {
                max: self.options.max_depth,
                span: self.current_span(),
            });
        }
        Ok(())
    }

    fn parse_unary(&mut self) -> Result<Node, ParseError> {
        self.enter()?;
        let result = match self.peek_kind() {
            Some(TokenKind::Minus) => {
                self.advance();
                self.parse_unary().map(Node::neg)
            }
            Some(TokenKind::Plus) => {
                self.advance();
                self.parse_unary()
            }
            _ => self.parse_power(),
        };

        self.depth -= 1;
        result
    }

    fn parse_power(&mut self) -> Result<Node, ParseError> {
        let base = self.parse_primary()?;
        if self.peek_kind() == Some(&TokenKind::Caret) {
            self.advance();
            let exponent = self.parse_unary()?;
            return Ok(Node::pow(base, exponent));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Node, ParseError> {
        let token = match self.advance() {
            Some(token) => token,
            None => return Err(self.unexpected_end("expression")),
        };

        match token.kind {
            TokenKind::Number(value) => Ok(Node::constant(value)),

            TokenKind::LParen => {
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen, "`)`")?;
                Ok(inner)
            }

            TokenKind::Ident(name) => self.resolve_ident(name, token.span),

            other => Err(ParseError::UnexpectedToken {
                expected: "expression".to_string(),
                found: other.to_string(),
                span: token.span,
            }),
        }
    }

    fn resolve_ident(&mut self, name: String, span: Span) -> Result<Node, ParseError> {
        if let Some(axis) = Axis::from_name(&name) {
            return Ok(Node::var(axis));
        }
        if let Some(value) = builtin_constant(&name) {
            return Ok(Node::named(name, value));
        }
        if let Some(value) = self.definitions.get(&name) {
            return Ok(Node::named(name, value));
        }
        if let Some(function) = Function::from_name(&name) {
            return self.parse_call(function, span);
        }
        Err(ParseError::UnknownIdentifier { name, span })
    }

    fn parse_call(&mut self, function: Function, name_span: Span) -> Result<Node, ParseError> {
        self.expect(TokenKind::LParen, &format!("`(` after `{}`", function))?;

        let mut args = Vec::new();
        if self.peek_kind() != Some(&TokenKind::RParen) {
            args.push(self.parse_expr()?);
            while self.peek_kind() == Some(&TokenKind::Comma) {
                self.advance();
                args.push(self.parse_expr()?);
            }
        }
        let close = self.expect(TokenKind::RParen, "`,` or `)`")?;

        if args.len() != function.arity() {
            return Err(ParseError::ArityMismatch {
                function: function.name().to_string(),
                expected: function.arity(),
                got: args.len(),
                span: name_span.to(close.span),
            });
        }
        Ok(Node::call(function, args))
    }
}
