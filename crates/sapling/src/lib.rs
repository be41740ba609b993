//! # Sapling
//!
//! A tree-walking evaluator for plottable math expressions in `x` and `y`.
//!
//! Source text is parsed into a tree of nodes. Every node can be evaluated
//! against an [`EvalContext`] that holds the current `x` and `y`, and
//! reports whether it is itself a variable reference. The context is passed
//! into each evaluation, so sweeping a variable for a plot is a matter of
//! updating the context between calls.
//!
//! ## Architecture
//!
//! - **Lexer / Parser**: source text to a [`Node`] tree
//! - **Tree**: node kinds behind the [`TreeElement`] capability set
//! - **Analysis**: plot-axis detection, simplification, differentiation
//! - **Sampler**: evaluate over a range of `x` or `y`
//!
//! ```
//! use sapling::{Axis, EvalContext, Expression, SampleRange};
//!
//! let expr = Expression::parse("y^2 - 1").unwrap();
//! let mut ctx = EvalContext::new();
//! let range = SampleRange::new(-1.0, 1.0, 3).unwrap();
//! let points = expr.sampler(Axis::Y).sample(&mut ctx, &range).unwrap();
//! assert_eq!(points[1].output, Some(-1.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod calculus;
pub mod context;
pub mod definitions;
pub mod error;
pub mod expression;
pub mod lexer;
pub mod parser;
pub mod sample;
pub mod tree;

// Re-export main types
pub use analysis::PlotAxis;
pub use context::{Axis, EvalContext};
pub use definitions::Definitions;
pub use error::{
    DefinitionError, DeriveError, EvalError, ParseError, Result, SaplingError, Span,
};
pub use expression::Expression;
pub use parser::ParseOptions;
pub use sample::{Point, SampleRange, Sampler, MAX_STEPS};
pub use tree::{
    BinaryOp, BinaryOperator, Constant, ElementKind, Function, FunctionCall, Node, TreeElement,
    UnaryOp, UnaryOperator, Variable,
};

/// Sapling version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
