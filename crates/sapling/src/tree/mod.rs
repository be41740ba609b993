//! Expression tree nodes and their evaluation

pub mod binary;
pub mod constant;
mod display;
pub mod function;
pub mod unary;
pub mod variable;

pub use binary::{BinaryOp, BinaryOperator};
pub use constant::Constant;
pub use function::{Function, FunctionCall};
pub use unary::{UnaryOp, UnaryOperator};
pub use variable::Variable;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{Axis, EvalContext, EvalError};

/// Classification tag of a tree element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// A literal or named constant
    Constant,
    /// A reference to `x` or `y`
    Variable,
    /// An arithmetic operator
    Operator,
    /// A built-in function application
    Function,
    /// A malformed element that must not be evaluated
    Invalid,
}

impl ElementKind {
    /// Lowercase name used in messages.
    pub fn name(self) -> &'static str {
        match self {
            ElementKind::Constant => "constant",
            ElementKind::Variable => "variable",
            ElementKind::Operator => "operator",
            ElementKind::Function => "function",
            ElementKind::Invalid => "invalid",
        }
    }
}

/// Capabilities shared by every node of an expression tree.
///
/// This is the core abstraction for the tree walker. The context is passed
/// explicitly on each call; nodes never hold onto it.
pub trait TreeElement {
    /// Compute the numeric value of this node under `ctx`.
    fn evaluate(&self, ctx: &EvalContext) -> Result<f64, EvalError>;

    /// Whether this node is itself a variable reference.
    ///
    /// Only reports on the node, not its descendants.
    fn is_variable(&self) -> bool;

    /// Classification tag of this node.
    fn kind(&self) -> ElementKind;
}

/// A node of an expression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Node {
    /// Literal or named constant
    Constant(Constant),
    /// `x` or `y`
    Variable(Variable),
    /// Prefix operator
    Unary(UnaryOp),
    /// Infix operator
    Binary(BinaryOp),
    /// Built-in function call
    Call(FunctionCall),
}

// ═══════════════════════════════════════════════════════════════════════
// Main Node Dispatcher
// ═══════════════════════════════════════════════════════════════════════

impl TreeElement for Node {
    fn evaluate(&self, ctx: &EvalContext) -> Result<f64, EvalError> {
        // Check for interruption before each node
        if ctx.is_interrupted() {
            return Err(EvalError::Interrupted);
        }

        let value = match self {
            Node::Constant(node) => node.evaluate(ctx),
            Node::Variable(node) => node.evaluate(ctx),
            Node::Unary(node) => node.evaluate(ctx),
            Node::Binary(node) => node.evaluate(ctx),
            Node::Call(node) => node.evaluate(ctx),
        }?;

        if ctx.trace {
            trace!(node = %self, value, "evaluated");
        }
        Ok(value)
    }

    fn is_variable(&self) -> bool {
        match self {
            Node::Constant(node) => node.is_variable(),
            Node::Variable(node) => node.is_variable(),
            Node::Unary(node) => node.is_variable(),
            Node::Binary(node) => node.is_variable(),
            Node::Call(node) => node.is_variable(),
        }
    }

    fn kind(&self) -> ElementKind {
        match self {
            Node::Constant(node) => node.kind(),
            Node::Variable(node) => node.kind(),
            Node::Unary(node) => node.kind(),
            Node::Binary(node) => node.kind(),
            Node::Call(node) => node.kind(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Construction Helpers
// ═══════════════════════════════════════════════════════════════════════

impl Node {
    /// Unnamed numeric constant.
    pub fn constant(value: f64) -> Node {
        Node::Constant(Constant::new(value))
    }

    /// Constant that displays as `name`.
    pub fn named(name: impl Into<String>, value: f64) -> Node {
        Node::Constant(Constant::named(name, value))
    }

    /// Reference to `x`.
    pub fn x() -> Node {
        Node::Variable(Variable::x())
    }

    /// Reference to `y`.
    pub fn y() -> Node {
        Node::Variable(Variable::y())
    }

    /// Reference to the given axis.
    pub fn var(axis: Axis) -> Node {
        Node::Variable(Variable::new(axis))
    }

    /// `-operand`
    pub fn neg(operand: Node) -> Node {
        Node::Unary(UnaryOp::new(UnaryOperator::Neg, operand))
    }

    /// `left op right`
    pub fn binary(op: BinaryOperator, left: Node, right: Node) -> Node {
        Node::Binary(BinaryOp::new(op, left, right))
    }

    /// `left + right`
    pub fn add(left: Node, right: Node) -> Node {
        Node::binary(BinaryOperator::Add, left, right)
    }

    /// `left - right`
    pub fn sub(left: Node, right: Node) -> Node {
        Node::binary(BinaryOperator::Sub, left, right)
    }

    /// `left * right`
    pub fn mul(left: Node, right: Node) -> Node {
        Node::binary(BinaryOperator::Mul, left, right)
    }

    /// `left / right`
    pub fn div(left: Node, right: Node) -> Node {
        Node::binary(BinaryOperator::Div, left, right)
    }

    /// `left ^ right`
    pub fn pow(left: Node, right: Node) -> Node {
        Node::binary(BinaryOperator::Pow, left, right)
    }

    /// `function(args...)`
    pub fn call(function: Function, args: Vec<Node>) -> Node {
        Node::Call(FunctionCall::new(function, args))
    }

    /// Numeric value if this node is a constant.
    pub fn as_constant(&self) -> Option<f64> {
        match self {
            Node::Constant(c) => Some(c.value),
            _ => None,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Traversal
    // ═══════════════════════════════════════════════════════════════════

    /// Direct children, left to right.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Constant(_) | Node::Variable(_) => Vec::new(),
            Node::Unary(u) => vec![u.operand.as_ref()],
            Node::Binary(b) => vec![b.left.as_ref(), b.right.as_ref()],
            Node::Call(c) => c.args.iter().collect(),
        }
    }

    /// Visit this node and all descendants, parents before children.
    pub fn walk(&self, visit: &mut impl FnMut(&Node)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Number of nodes in the subtree.
    pub fn size(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_| count += 1);
        count
    }

    /// Whether any variable atom of `axis` occurs in the subtree.
    pub fn uses(&self, axis: Axis) -> bool {
        let mut found = false;
        self.walk(&mut |node| {
            if let Node::Variable(v) = node {
                if node.is_variable() && v.axis == axis {
                    found = true;
                }
            }
        });
        found
    }

    /// Whether the subtree contains no variable atoms at all.
    pub fn is_constant(&self) -> bool {
        let mut constant = true;
        self.walk(&mut |node| {
            if node.is_variable() {
                constant = false;
            }
        });
        constant
    }

    /// Whether every variable atom in the subtree is tagged as a variable.
    pub fn is_well_formed(&self) -> bool {
        let mut well_formed = true;
        self.walk(&mut |node| {
            if let Node::Variable(v) = node {
                if v.kind != ElementKind::Variable {
                    well_formed = false;
                }
            }
        });
        well_formed
    }

    /// Replace every atom of `axis` with a copy of `replacement`.
    ///
    /// Atoms carrying a tag other than `Variable` are kept, so they still
    /// fail when evaluated.
    pub fn substitute(&self, axis: Axis, replacement: &Node) -> Node {
        match self {
            Node::Variable(v) if v.axis == axis && v.kind == ElementKind::Variable => {
                replacement.clone()
            }
            Node::Constant(_) | Node::Variable(_) => self.clone(),
            Node::Unary(u) => Node::Unary(UnaryOp::new(
                u.op,
                u.operand.substitute(axis, replacement),
            )),
            Node::Binary(b) => Node::Binary(BinaryOp::new(
                b.op,
                b.left.substitute(axis, replacement),
                b.right.substitute(axis, replacement),
            )),
            Node::Call(c) => Node::Call(FunctionCall::new(
                c.function,
                c.args
                    .iter()
                    .map(|arg| arg.substitute(axis, replacement))
                    .collect(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_keeps_invalid_atoms() {
        let invalid = Node::Variable(Variable::with_kind(Axis::Y, ElementKind::Invalid));
        let node = Node::add(Node::y(), invalid.clone());
        let replaced = node.substitute(Axis::Y, &Node::constant(2.0));
        assert_eq!(replaced, Node::add(Node::constant(2.0), invalid));
        assert!(!replaced.is_well_formed());
        assert!(replaced.evaluate(&EvalContext::new()).is_err());
    }

    #[test]
    fn test_dispatch_kind() {
        assert_eq!(Node::constant(1.0).kind(), ElementKind::Constant);
        assert_eq!(Node::y().kind(), ElementKind::Variable);
        assert_eq!(Node::neg(Node::x()).kind(), ElementKind::Operator);
        assert_eq!(
            Node::add(Node::x(), Node::y()).kind(),
            ElementKind::Operator
        );
        assert_eq!(
            Node::call(Function::Sin, vec![Node::x()]).kind(),
            ElementKind::Function
        );
    }

    #[test]
    fn test_is_variable_only_for_atoms() {
        assert!(Node::x().is_variable());
        assert!(Node::y().is_variable());
        assert!(!Node::constant(2.0).is_variable());
        assert!(!Node::add(Node::x(), Node::y()).is_variable());
    }

    #[test]
    fn test_interrupted_evaluation_fails() {
        let ctx = EvalContext::with_vars(1.0, 2.0);
        ctx.interrupt();
        let node = Node::add(Node::x(), Node::y());
        assert_eq!(node.evaluate(&ctx), Err(EvalError::Interrupted));
    }

    #[test]
    fn test_uses_and_is_constant() {
        let node = Node::mul(Node::constant(2.0), Node::y());
        assert!(node.uses(Axis::Y));
        assert!(!node.uses(Axis::X));
        assert!(!node.is_constant());
        assert!(Node::add(Node::constant(1.0), Node::named("pi", 3.0)).is_constant());
    }

    #[test]
    fn test_substitute_replaces_axis() {
        let node = Node::add(Node::x(), Node::y());
        let replaced = node.substitute(Axis::Y, &Node::mul(Node::x(), Node::x()));
        assert!(!replaced.uses(Axis::Y));

        let ctx = EvalContext::with_vars(3.0, 100.0);
        assert_eq!(replaced.evaluate(&ctx).unwrap(), 12.0);
    }

    #[test]
    fn test_size_counts_nodes() {
        let node = Node::call(
            Function::Max,
            vec![Node::x(), Node::neg(Node::constant(1.0))],
        );
        assert_eq!(node.size(), 4);
    }
}
