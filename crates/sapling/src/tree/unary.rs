//! Prefix operators

use serde::{Deserialize, Serialize};

use super::{ElementKind, Node, TreeElement};
use crate::{EvalContext, EvalError};

/// Prefix operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnaryOperator {
    /// Arithmetic negation `-a`
    Neg,
}

impl UnaryOperator {
    /// Source symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Neg => "-",
        }
    }
}

/// A prefix operator applied to one operand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryOp {
    /// The operator
    pub op: UnaryOperator,
    /// The operand
    pub operand: Box<Node>,
}

impl UnaryOp {
    /// Apply `op` to `operand`.
    pub fn new(op: UnaryOperator, operand: Node) -> Self {
        Self {
            op,
            operand: Box::new(operand),
        }
    }
}

impl TreeElement for UnaryOp {
    fn evaluate(&self, ctx: &EvalContext) -> Result<f64, EvalError> {
        let value = self.operand.evaluate(ctx)?;
        Ok(match self.op {
            UnaryOperator::Neg => -value,
        })
    }

    fn is_variable(&self) -> bool {
        false
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Operator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neg_variable() {
        let node = UnaryOp::new(UnaryOperator::Neg, Node::y());
        let ctx = EvalContext::with_vars(0.0, -3.0);
        assert_eq!(node.evaluate(&ctx).unwrap(), 3.0);
    }

    #[test]
    fn test_neg_propagates_errors() {
        let ctx = EvalContext::new();
        ctx.interrupt();
        let node = UnaryOp::new(UnaryOperator::Neg, Node::constant(1.0));
        assert_eq!(node.evaluate(&ctx), Err(EvalError::Interrupted));
    }
}
