//! Error types for Sapling parsing and evaluation

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A byte range into the expression source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a span covering `start..end`.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// A zero-width span at `pos`.
    pub fn at(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Errors raised while walking an expression tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// A node carried a classification tag it cannot be evaluated with.
    #[error("Invalid expression: {kind} node is not evaluable")]
    InvalidExpression {
        /// Name of the offending node kind
        kind: String,
    },

    /// Evaluation was cancelled through the context's interrupt flag.
    #[error("Evaluation interrupted")]
    Interrupted,

    /// A sampling range was rejected.
    #[error("Invalid sample range: {message}")]
    InvalidRange {
        /// Why the range is unusable
        message: String,
    },
}

/// Errors raised while turning source text into a tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A character no token starts with.
    #[error("unexpected character `{ch}` at {span}")]
    UnexpectedChar {
        /// The character
        ch: char,
        /// Where it was found
        span: Span,
    },

    /// A token that does not fit the grammar at this point.
    #[error("expected {expected}, found `{found}` at {span}")]
    UnexpectedToken {
        /// What the parser was looking for
        expected: String,
        /// The token text actually found
        found: String,
        /// Where it was found
        span: Span,
    },

    /// Input ended in the middle of an expression.
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd {
        /// What the parser was looking for
        expected: String,
        /// End-of-input position
        span: Span,
    },

    /// An identifier that is neither a variable, a constant nor a function.
    #[error("unknown identifier `{name}` at {span}")]
    UnknownIdentifier {
        /// The identifier
        name: String,
        /// Where it was found
        span: Span,
    },

    /// A function called with the wrong number of arguments.
    #[error("function `{function}` takes {expected} argument(s), got {got} at {span}")]
    ArityMismatch {
        /// Function name
        function: String,
        /// Declared arity
        expected: usize,
        /// Number of arguments supplied
        got: usize,
        /// Span of the call
        span: Span,
    },

    /// Parentheses or unary operators nested beyond the configured limit.
    #[error("expression nested deeper than {max} levels at {span}")]
    NestingTooDeep {
        /// Configured limit
        max: usize,
        /// Where the limit was hit
        span: Span,
    },
}

impl ParseError {
    /// Source span the error points at.
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedChar { span, .. }
            | ParseError::UnexpectedToken { span, .. }
            | ParseError::UnexpectedEnd { span, .. }
            | ParseError::UnknownIdentifier { span, .. }
            | ParseError::ArityMismatch { span, .. }
            | ParseError::NestingTooDeep { span, .. } => *span,
        }
    }

    /// Render the error with a caret line under the offending source.
    pub fn render(&self, source: &str) -> String {
        let span = self.span();
        let start = source[..span.start.min(source.len())].chars().count();
        let width = source
            .get(span.start..span.end)
            .map(|s| s.chars().count())
            .unwrap_or(0)
            .max(1);
        format!(
            "error: {}\n  {}\n  {}{}",
            self,
            source,
            " ".repeat(start),
            "^".repeat(width)
        )
    }
}

/// Errors raised by symbolic differentiation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeriveError {
    /// The tree contains an operation with no usable derivative.
    #[error("cannot differentiate {what}")]
    NotDifferentiable {
        /// Description of the operation
        what: String,
    },

    /// A malformed node was met while differentiating.
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Errors raised when registering a user constant.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DefinitionError {
    /// Name collides with a variable, built-in constant or function.
    #[error("`{name}` is reserved")]
    Reserved {
        /// Requested name
        name: String,
    },

    /// Name is not a valid identifier.
    #[error("`{name}` is not a valid identifier")]
    InvalidName {
        /// Requested name
        name: String,
    },

    /// The defining expression depends on `x` or `y`.
    #[error("definition of `{name}` must not depend on x or y")]
    NotConstant {
        /// Requested name
        name: String,
    },
}

/// Main error type for Sapling operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SaplingError {
    /// Parse failure
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Evaluation failure
    #[error(transparent)]
    Eval(#[from] EvalError),

    /// Differentiation failure
    #[error(transparent)]
    Derive(#[from] DeriveError),

    /// Definition failure
    #[error(transparent)]
    Definition(#[from] DefinitionError),
}

/// Result type alias for Sapling operations
pub type Result<T> = std::result::Result<T, SaplingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_to_covers_both() {
        let a = Span::new(2, 4);
        let b = Span::new(7, 9);
        assert_eq!(a.to(b), Span::new(2, 9));
        assert_eq!(b.to(a), Span::new(2, 9));
    }

    #[test]
    fn test_invalid_expression_message() {
        let err = EvalError::InvalidExpression {
            kind: "invalid".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid expression: invalid node is not evaluable"
        );
    }

    #[test]
    fn test_render_points_at_span() {
        let err = ParseError::UnknownIdentifier {
            name: "foo".to_string(),
            span: Span::new(4, 7),
        };
        let rendered = err.render("1 + foo");
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[1], "  1 + foo");
        assert_eq!(lines[2], "      ^^^");
    }

    #[test]
    fn test_render_end_of_input() {
        let err = ParseError::UnexpectedEnd {
            expected: "expression".to_string(),
            span: Span::at(3),
        };
        let rendered = err.render("1 +");
        assert!(rendered.ends_with("     ^"));
    }

    #[test]
    fn test_sapling_error_from_parse() {
        let err: SaplingError = ParseError::UnexpectedEnd {
            expected: "expression".to_string(),
            span: Span::at(0),
        }
        .into();
        assert!(matches!(err, SaplingError::Parse(_)));
    }
}
