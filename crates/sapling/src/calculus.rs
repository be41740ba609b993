//! Symbolic differentiation

use crate::analysis::{negate, simplify};
use crate::error::{DeriveError, EvalError};
use crate::tree::{BinaryOperator, ElementKind, Function, Node, UnaryOperator};
use crate::Axis;

/// Partial derivative of `node` with respect to `axis`, simplified.
///
/// The other variable is treated as a constant.
pub fn derive(node: &Node, axis: Axis) -> Result<Node, DeriveError> {
    let raw = differentiate(node, axis)?;
    Ok(simplify(&raw))
}

fn differentiate(node: &Node, axis: Axis) -> Result<Node, DeriveError> {
    match node {
        Node::Constant(_) => Ok(Node::constant(0.0)),

        Node::Variable(v) => {
            if v.kind != ElementKind::Variable {
                return Err(EvalError::InvalidExpression {
                    kind: v.kind.name().to_string(),
                }
                .into());
            }
            Ok(Node::constant(if v.axis == axis { 1.0 } else { 0.0 }))
        }

        Node::Unary(u) => match u.op {
            UnaryOperator::Neg => Ok(negate(differentiate(&u.operand, axis)?)),
        },

        Node::Binary(b) => differentiate_binary(b.op, &b.left, &b.right, axis),

        Node::Call(c) => {
            if c.args.len() != c.function.arity() {
                return Err(EvalError::InvalidExpression {
                    kind: format!("{} call with {} argument(s)", c.function, c.args.len()),
                }
                .into());
            }
            match c.function.arity() {
                1 => differentiate_unary_call(c.function, &c.args[0], axis),
                _ => differentiate_binary_call(c.function, &c.args[0], &c.args[1], axis),
            }
        }
    }
}

fn differentiate_binary(
    op: BinaryOperator,
    u: &Node,
    v: &Node,
    axis: Axis,
) -> Result<Node, DeriveError> {
    let du = differentiate(u, axis)?;
    let dv = differentiate(v, axis)?;

    Ok(match op {
        BinaryOperator::Add => Node::add(du, dv),
        BinaryOperator::Sub => Node::sub(du, dv),

        // (uv)' = u'v + uv'
        BinaryOperator::Mul => Node::add(Node::mul(du, v.clone()), Node::mul(u.clone(), dv)),

        // (u/v)' = (u'v - uv') / v^2
        BinaryOperator::Div => Node::div(
            Node::sub(Node::mul(du, v.clone()), Node::mul(u.clone(), dv)),
            Node::pow(v.clone(), Node::constant(2.0)),
        ),

        BinaryOperator::Rem => {
            return Err(DeriveError::NotDifferentiable {
                what: "`%`".to_string(),
            })
        }

        BinaryOperator::Pow => power_rule(u, v, du, dv, axis),
    })
}

fn power_rule(u: &Node, v: &Node, du: Node, dv: Node, axis: Axis) -> Node {
    if !v.uses(axis) {
        // (u^n)' = n u^(n-1) u'
        return Node::mul(
            Node::mul(
                v.clone(),
                Node::pow(u.clone(), Node::sub(v.clone(), Node::constant(1.0))),
            ),
            du,
        );
    }
    if !u.uses(axis) {
        // (a^v)' = a^v ln(a) v'
        return Node::mul(
            Node::mul(
                Node::pow(u.clone(), v.clone()),
                Node::call(Function::Ln, vec![u.clone()]),
            ),
            dv,
        );
    }
    // (u^v)' = u^v (v' ln(u) + v u' / u)
    Node::mul(
        Node::pow(u.clone(), v.clone()),
        Node::add(
            Node::mul(dv, Node::call(Function::Ln, vec![u.clone()])),
            Node::div(Node::mul(v.clone(), du), u.clone()),
        ),
    )
}

fn differentiate_unary_call(function: Function, u: &Node, axis: Axis) -> Result<Node, DeriveError> {
    let one = || Node::constant(1.0);
    let two = || Node::constant(2.0);
    let f = |g: Function| Node::call(g, vec![u.clone()]);
    let squared = |n: Node| Node::pow(n, two());

    // Outer derivative f'(u); the chain rule multiplies by u' below
    let outer = match function {
        Function::Sin => f(Function::Cos),
        Function::Cos => Node::neg(f(Function::Sin)),
        Function::Tan => Node::div(one(), squared(f(Function::Cos))),
        Function::Asin => Node::div(
            one(),
            Node::call(Function::Sqrt, vec![Node::sub(one(), squared(u.clone()))]),
        ),
        Function::Acos => Node::neg(Node::div(
            one(),
            Node::call(Function::Sqrt, vec![Node::sub(one(), squared(u.clone()))]),
        )),
        Function::Atan => Node::div(one(), Node::add(one(), squared(u.clone()))),
        Function::Sinh => f(Function::Cosh),
        Function::Cosh => f(Function::Sinh),
        Function::Tanh => Node::div(one(), squared(f(Function::Cosh))),
        Function::Sqrt => Node::div(one(), Node::mul(two(), f(Function::Sqrt))),
        Function::Cbrt => Node::div(
            one(),
            Node::mul(Node::constant(3.0), squared(f(Function::Cbrt))),
        ),
        Function::Abs => f(Function::Sign),
        Function::Ln => Node::div(one(), u.clone()),
        Function::Log => Node::div(
            one(),
            Node::mul(
                u.clone(),
                Node::call(Function::Ln, vec![Node::constant(10.0)]),
            ),
        ),
        Function::Exp => f(Function::Exp),

        // Piecewise constant: zero wherever defined
        Function::Floor | Function::Ceil | Function::Round | Function::Sign => {
            return Ok(Node::constant(0.0))
        }

        other => {
            return Err(DeriveError::NotDifferentiable {
                what: format!("`{}` with one argument", other),
            })
        }
    };

    Ok(Node::mul(outer, differentiate(u, axis)?))
}

fn differentiate_binary_call(
    function: Function,
    a: &Node,
    b: &Node,
    axis: Axis,
) -> Result<Node, DeriveError> {
    match function {
        Function::Pow => differentiate_binary(BinaryOperator::Pow, a, b, axis),

        // hypot(a, b)' = (a a' + b b') / hypot(a, b)
        Function::Hypot => {
            let da = differentiate(a, axis)?;
            let db = differentiate(b, axis)?;
            Ok(Node::div(
                Node::add(Node::mul(a.clone(), da), Node::mul(b.clone(), db)),
                Node::call(Function::Hypot, vec![a.clone(), b.clone()]),
            ))
        }

        // atan2(a, b)' = (b a' - a b') / (a^2 + b^2)
        Function::Atan2 => {
            let da = differentiate(a, axis)?;
            let db = differentiate(b, axis)?;
            Ok(Node::div(
                Node::sub(Node::mul(b.clone(), da), Node::mul(a.clone(), db)),
                Node::add(
                    Node::pow(a.clone(), Node::constant(2.0)),
                    Node::pow(b.clone(), Node::constant(2.0)),
                ),
            ))
        }

        other => Err(DeriveError::NotDifferentiable {
            what: format!("`{}`", other),
        }),
    }
}
