//! Parsed expressions: source text paired with its tree

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::analysis::{self, PlotAxis};
use crate::calculus;
use crate::definitions::Definitions;
use crate::error::{DeriveError, EvalError, ParseError};
use crate::parser::{self, ParseOptions};
use crate::sample::Sampler;
use crate::tree::{ElementKind, Node, TreeElement};
use crate::{Axis, EvalContext};

/// A parsed expression.
///
/// # Example
///
/// ```
/// use sapling::{EvalContext, Expression, TreeElement};
///
/// let expr = Expression::parse("2x + y^2").unwrap();
/// let mut ctx = EvalContext::with_vars(1.0, 3.0);
/// assert_eq!(expr.evaluate(&ctx).unwrap(), 11.0);
///
/// ctx.set_y(0.0);
/// assert_eq!(expr.evaluate(&ctx).unwrap(), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    source: String,
    root: Node,
}

impl Expression {
    /// Parse with default options and no user definitions.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        Self::parse_with(source, &ParseOptions::default(), &Definitions::new())
    }

    /// Parse with explicit options and user definitions.
    pub fn parse_with(
        source: &str,
        options: &ParseOptions,
        definitions: &Definitions,
    ) -> Result<Self, ParseError> {
        let root = parser::parse(source, options, definitions)?;
        Ok(Self {
            source: source.to_string(),
            root,
        })
    }

    /// Wrap an existing tree; the source is its rendering.
    pub fn from_root(root: Node) -> Self {
        Self {
            source: root.to_string(),
            root,
        }
    }

    /// Text the expression was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Root node of the tree.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Take the tree out.
    pub fn into_root(self) -> Node {
        self.root
    }

    /// Evaluate with `x` and `y` set to the given values.
    pub fn eval_at(&self, x: f64, y: f64) -> Result<f64, EvalError> {
        self.root.evaluate(&EvalContext::with_vars(x, y))
    }

    /// Whether the expression references `axis`.
    pub fn uses(&self, axis: Axis) -> bool {
        self.root.uses(axis)
    }

    /// Which variables a plot of this expression sweeps.
    pub fn plot_axis(&self) -> PlotAxis {
        analysis::plot_axis(&self.root)
    }

    /// Constant-folded, identity-free copy.
    pub fn simplify(&self) -> Expression {
        Expression::from_root(analysis::simplify(&self.root))
    }

    /// Partial derivative with respect to `axis`.
    pub fn derive(&self, axis: Axis) -> Result<Expression, DeriveError> {
        calculus::derive(&self.root, axis).map(Expression::from_root)
    }

    /// Replace every reference to `axis` with `replacement`.
    pub fn substitute(&self, axis: Axis, replacement: &Expression) -> Expression {
        Expression::from_root(self.root.substitute(axis, &replacement.root))
    }

    /// Sampler sweeping `axis`.
    pub fn sampler(&self, axis: Axis) -> Sampler<'_> {
        Sampler::new(&self.root, axis)
    }
}

impl TreeElement for Expression {
    fn evaluate(&self, ctx: &EvalContext) -> Result<f64, EvalError> {
        self.root.evaluate(ctx)
    }

    fn is_variable(&self) -> bool {
        self.root.is_variable()
    }

    fn kind(&self) -> ElementKind {
        self.root.kind()
    }
}

impl FromStr for Expression {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Expression::parse(s)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}
