//! Built-in function application

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ElementKind, Node, TreeElement};
use crate::{EvalContext, EvalError};

/// Built-in functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Function {
    /// Sine (radians)
    Sin,
    /// Cosine (radians)
    Cos,
    /// Tangent (radians)
    Tan,
    /// Arcsine
    Asin,
    /// Arccosine
    Acos,
    /// Arctangent
    Atan,
    /// Hyperbolic sine
    Sinh,
    /// Hyperbolic cosine
    Cosh,
    /// Hyperbolic tangent
    Tanh,
    /// Square root
    Sqrt,
    /// Cube root
    Cbrt,
    /// Absolute value
    Abs,
    /// Natural logarithm
    Ln,
    /// Base-10 logarithm
    Log,
    /// `e^a`
    Exp,
    /// Round toward negative infinity
    Floor,
    /// Round toward positive infinity
    Ceil,
    /// Round half away from zero
    Round,
    /// `-1`, `0` or `1`
    Sign,
    /// Smaller of two values
    Min,
    /// Larger of two values
    Max,
    /// Four-quadrant arctangent `atan2(a, b)` of `a / b`
    Atan2,
    /// `pow(a, b) == a ^ b`
    Pow,
    /// `sqrt(a^2 + b^2)` without intermediate overflow
    Hypot,
}

const ALL: &[Function] = &[
    Function::Sin,
    Function::Cos,
    Function::Tan,
    Function::Asin,
    Function::Acos,
    Function::Atan,
    Function::Sinh,
    Function::Cosh,
    Function::Tanh,
    Function::Sqrt,
    Function::Cbrt,
    Function::Abs,
    Function::Ln,
    Function::Log,
    Function::Exp,
    Function::Floor,
    Function::Ceil,
    Function::Round,
    Function::Sign,
    Function::Min,
    Function::Max,
    Function::Atan2,
    Function::Pow,
    Function::Hypot,
];

impl Function {
    /// Every built-in function.
    pub fn all() -> &'static [Function] {
        ALL
    }

    /// Source-level name.
    pub fn name(self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Asin => "asin",
            Function::Acos => "acos",
            Function::Atan => "atan",
            Function::Sinh => "sinh",
            Function::Cosh => "cosh",
            Function::Tanh => "tanh",
            Function::Sqrt => "sqrt",
            Function::Cbrt => "cbrt",
            Function::Abs => "abs",
            Function::Ln => "ln",
            Function::Log => "log",
            Function::Exp => "exp",
            Function::Floor => "floor",
            Function::Ceil => "ceil",
            Function::Round => "round",
            Function::Sign => "sign",
            Function::Min => "min",
            Function::Max => "max",
            Function::Atan2 => "atan2",
            Function::Pow => "pow",
            Function::Hypot => "hypot",
        }
    }

    /// Look up a function by its source-level name.
    pub fn from_name(name: &str) -> Option<Function> {
        ALL.iter().copied().find(|f| f.name() == name)
    }

    /// Number of arguments the function takes.
    pub fn arity(self) -> usize {
        match self {
            Function::Min | Function::Max | Function::Atan2 | Function::Pow | Function::Hypot => 2,
            _ => 1,
        }
    }

    /// Apply the function to already-evaluated arguments.
    ///
    /// `args.len()` must equal [`Function::arity`]; the parser and
    /// [`FunctionCall::evaluate`] guarantee this.
    pub fn apply(self, args: &[f64]) -> f64 {
        let a = args.first().copied().unwrap_or(f64::NAN);
        let b = args.get(1).copied().unwrap_or(f64::NAN);
        match self {
            Function::Sin => a.sin(),
            Function::Cos => a.cos(),
            Function::Tan => a.tan(),
            Function::Asin => a.asin(),
            Function::Acos => a.acos(),
            Function::Atan => a.atan(),
            Function::Sinh => a.sinh(),
            Function::Cosh => a.cosh(),
            Function::Tanh => a.tanh(),
            Function::Sqrt => a.sqrt(),
            Function::Cbrt => a.cbrt(),
            Function::Abs => a.abs(),
            Function::Ln => a.ln(),
            Function::Log => a.log10(),
            Function::Exp => a.exp(),
            Function::Floor => a.floor(),
            Function::Ceil => a.ceil(),
            Function::Round => a.round(),
            Function::Sign => {
                // f64::signum maps zero to 1
                if a == 0.0 || a.is_nan() {
                    a
                } else {
                    a.signum()
                }
            }
            Function::Min => a.min(b),
            Function::Max => a.max(b),
            Function::Atan2 => a.atan2(b),
            Function::Pow => a.powf(b),
            Function::Hypot => a.hypot(b),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A built-in function applied to argument subtrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// The function
    pub function: Function,
    /// Argument subtrees, in order
    pub args: Vec<Node>,
}

impl FunctionCall {
    /// Apply `function` to `args`.
    pub fn new(function: Function, args: Vec<Node>) -> Self {
        Self { function, args }
    }
}

impl TreeElement for FunctionCall {
    fn evaluate(&self, ctx: &EvalContext) -> Result<f64, EvalError> {
        // Only reachable through a hand-built or deserialized tree
        if self.args.len() != self.function.arity() {
            return Err(EvalError::InvalidExpression {
                kind: format!(
                    "{} call with {} argument(s)",
                    self.function,
                    self.args.len()
                ),
            });
        }
        let args = self
            .args
            .iter()
            .map(|arg| arg.evaluate(ctx))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.function.apply(&args))
    }

    fn is_variable(&self) -> bool {
        false
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Function
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call1(function: Function, a: f64) -> f64 {
        FunctionCall::new(function, vec![Node::constant(a)])
            .evaluate(&EvalContext::new())
            .unwrap()
    }

    #[test]
    fn test_names_round_trip() {
        for f in Function::all() {
            assert_eq!(Function::from_name(f.name()), Some(*f));
        }
        assert_eq!(Function::from_name("cot"), None);
    }

    #[test]
    fn test_unary_functions() {
        assert_eq!(call1(Function::Sqrt, 16.0), 4.0);
        assert_eq!(call1(Function::Abs, -2.5), 2.5);
        assert!((call1(Function::Log, 1000.0) - 3.0).abs() < 1e-12);
        assert_eq!(call1(Function::Floor, -1.5), -2.0);
        assert_eq!(call1(Function::Ceil, -1.5), -1.0);
        assert_eq!(call1(Function::Round, 2.5), 3.0);
        assert!((call1(Function::Cbrt, 27.0) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_sign_of_zero_is_zero() {
        assert_eq!(call1(Function::Sign, 0.0), 0.0);
        assert_eq!(call1(Function::Sign, -3.0), -1.0);
        assert_eq!(call1(Function::Sign, 0.1), 1.0);
    }

    #[test]
    fn test_domain_errors_are_values() {
        assert!(call1(Function::Sqrt, -1.0).is_nan());
        assert_eq!(call1(Function::Ln, 0.0), f64::NEG_INFINITY);
    }

    #[test]
    fn test_binary_functions() {
        let ctx = EvalContext::with_vars(3.0, 4.0);
        let hypot = FunctionCall::new(Function::Hypot, vec![Node::x(), Node::y()]);
        assert_eq!(hypot.evaluate(&ctx).unwrap(), 5.0);
        let max = FunctionCall::new(Function::Max, vec![Node::x(), Node::y()]);
        assert_eq!(max.evaluate(&ctx).unwrap(), 4.0);
    }

    #[test]
    fn test_wrong_arity_is_invalid() {
        let call = FunctionCall::new(Function::Sin, vec![Node::x(), Node::y()]);
        assert!(matches!(
            call.evaluate(&EvalContext::new()),
            Err(EvalError::InvalidExpression { .. })
        ));
    }
}
