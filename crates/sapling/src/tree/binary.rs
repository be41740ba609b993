//! Infix operators

use serde::{Deserialize, Serialize};

use super::{ElementKind, Node, TreeElement};
use crate::{EvalContext, EvalError};

/// Infix operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinaryOperator {
    /// `a + b`
    Add,
    /// `a - b`
    Sub,
    /// `a * b`
    Mul,
    /// `a / b`
    Div,
    /// `a % b` (remainder with the sign of `a`)
    Rem,
    /// `a ^ b`
    Pow,
}

impl BinaryOperator {
    /// Source symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Rem => "%",
            BinaryOperator::Pow => "^",
        }
    }

    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Add | BinaryOperator::Sub => 1,
            BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Rem => 2,
            BinaryOperator::Pow => 4,
        }
    }

    /// Whether the operator groups right-to-left.
    pub fn is_right_associative(self) -> bool {
        matches!(self, BinaryOperator::Pow)
    }

    /// Apply the operator with IEEE-754 semantics.
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            BinaryOperator::Add => left + right,
            BinaryOperator::Sub => left - right,
            BinaryOperator::Mul => left * right,
            BinaryOperator::Div => left / right,
            BinaryOperator::Rem => left % right,
            BinaryOperator::Pow => left.powf(right),
        }
    }
}

/// An infix operator applied to two operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryOp {
    /// The operator
    pub op: BinaryOperator,
    /// Left operand
    pub left: Box<Node>,
    /// Right operand
    pub right: Box<Node>,
}

impl BinaryOp {
    /// Combine `left` and `right` with `op`.
    pub fn new(op: BinaryOperator, left: Node, right: Node) -> Self {
        Self {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

impl TreeElement for BinaryOp {
    fn evaluate(&self, ctx: &EvalContext) -> Result<f64, EvalError> {
        // Left before right, so interruption and errors surface in source order
        let left = self.left.evaluate(ctx)?;
        let right = self.right.evaluate(ctx)?;
        Ok(self.op.apply(left, right))
    }

    fn is_variable(&self) -> bool {
        false
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Operator
    }
}
