//! Structural queries and simplification over expression trees

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tree::{BinaryOperator, Node, UnaryOperator};
use crate::Axis;

/// Which variables an expression must be swept over when plotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotAxis {
    /// No variables: a horizontal line
    Constant,
    /// Depends on `x` only: `y = f(x)`
    X,
    /// Depends on `y` only: `x = f(y)`
    Y,
    /// Depends on both: an implicit curve or surface
    Both,
}

impl fmt::Display for PlotAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlotAxis::Constant => "constant",
            PlotAxis::X => "x",
            PlotAxis::Y => "y",
            PlotAxis::Both => "x and y",
        };
        f.write_str(name)
    }
}

/// Classify `node` by the variables it references.
pub fn plot_axis(node: &Node) -> PlotAxis {
    match (node.uses(Axis::X), node.uses(Axis::Y)) {
        (false, false) => PlotAxis::Constant,
        (true, false) => PlotAxis::X,
        (false, true) => PlotAxis::Y,
        (true, true) => PlotAxis::Both,
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Simplification
// ═══════════════════════════════════════════════════════════════════════

/// Fold constant subtrees and drop identity operations.
///
/// Only unnamed constants are folded, so `2 * pi` keeps its symbolic form.
/// A fold whose result is not finite is skipped. `0 * a` becomes `0` even
/// though IEEE-754 gives NaN for an infinite `a`. Identities that discard
/// an operand are skipped when that operand holds a malformed atom, so the
/// result fails to evaluate exactly when the input does.
pub fn simplify(node: &Node) -> Node {
    match node {
        Node::Constant(_) | Node::Variable(_) => node.clone(),

        Node::Unary(u) => match u.op {
            UnaryOperator::Neg => negate(simplify(&u.operand)),
        },

        Node::Binary(b) => simplify_binary(b.op, simplify(&b.left), simplify(&b.right)),

        Node::Call(c) => {
            let args: Vec<Node> = c.args.iter().map(simplify).collect();
            let values: Option<Vec<f64>> = args.iter().map(literal).collect();
            if let Some(values) = values {
                if values.len() == c.function.arity() {
                    let folded = c.function.apply(&values);
                    if folded.is_finite() {
                        return Node::constant(folded);
                    }
                }
            }
            Node::call(c.function, args)
        }
    }
}

/// Value of an unnamed constant.
fn literal(node: &Node) -> Option<f64> {
    match node {
        Node::Constant(c) if c.name.is_none() => Some(c.value),
        _ => None,
    }
}

fn is_literal(node: &Node, value: f64) -> bool {
    literal(node) == Some(value)
}

/// `-node`, folding literals and double negation.
pub(crate) fn negate(node: Node) -> Node {
    match node {
        Node::Constant(c) if c.name.is_none() => Node::constant(-c.value),
        Node::Unary(u) if u.op == UnaryOperator::Neg => *u.operand,
        other => Node::neg(other),
    }
}

fn simplify_binary(op: BinaryOperator, left: Node, right: Node) -> Node {
    if let (Some(a), Some(b)) = (literal(&left), literal(&right)) {
        let folded = op.apply(a, b);
        if folded.is_finite() {
            return Node::constant(folded);
        }
    }

    match op {
        BinaryOperator::Add if is_literal(&left, 0.0) => right,
        BinaryOperator::Add if is_literal(&right, 0.0) => left,

        BinaryOperator::Sub if is_literal(&right, 0.0) => left,
        BinaryOperator::Sub if is_literal(&left, 0.0) => negate(right),

        BinaryOperator::Mul
            if (is_literal(&left, 0.0) && right.is_well_formed())
                || (is_literal(&right, 0.0) && left.is_well_formed()) =>
        {
            Node::constant(0.0)
        }
        BinaryOperator::Mul if is_literal(&left, 1.0) => right,
        BinaryOperator::Mul if is_literal(&right, 1.0) => left,
        BinaryOperator::Mul if is_literal(&left, -1.0) => negate(right),
        BinaryOperator::Mul if is_literal(&right, -1.0) => negate(left),

        BinaryOperator::Div if is_literal(&right, 1.0) => left,

        BinaryOperator::Pow if is_literal(&right, 1.0) => left,
        BinaryOperator::Pow if is_literal(&right, 0.0) && left.is_well_formed() => {
            Node::constant(1.0)
        }

        _ => Node::binary(op, left, right),
    }
}
