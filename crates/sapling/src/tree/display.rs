//! Infix rendering of expression trees

use std::fmt;

use super::*;

/// Precedence of a node as it appears in rendered source.
///
/// Atoms bind tightest. Negative constants render with a leading `-` and
/// therefore sit at the prefix-operator level.
fn precedence(node: &Node) -> u8 {
    const PREFIX: u8 = 3;
    const ATOM: u8 = 5;
    match node {
        Node::Constant(c) if c.name.is_none() && c.value.is_sign_negative() => PREFIX,
        Node::Constant(_) | Node::Variable(_) | Node::Call(_) => ATOM,
        Node::Unary(_) => PREFIX,
        Node::Binary(b) => b.op.precedence(),
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, node: &Node, parens: bool) -> fmt::Result {
    if parens {
        write!(f, "({})", node)
    } else {
        write!(f, "{}", node)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Constant(c) => match &c.name {
                Some(name) => f.write_str(name),
                None => write!(f, "{}", c.value),
            },

            Node::Variable(v) => f.write_str(v.axis.name()),

            Node::Unary(u) => {
                f.write_str(u.op.symbol())?;
                write_operand(f, &u.operand, precedence(&u.operand) < 3)
            }

            Node::Binary(b) => {
                let p = b.op.precedence();
                let right_assoc = b.op.is_right_associative();

                let lp = precedence(&b.left);
                write_operand(f, &b.left, lp < p || (lp == p && right_assoc))?;

                if b.op == BinaryOperator::Pow {
                    f.write_str("^")?;
                } else {
                    write!(f, " {} ", b.op.symbol())?;
                }

                let rp = precedence(&b.right);
                write_operand(f, &b.right, rp < p || (rp == p && !right_assoc))
            }

            Node::Call(c) => {
                write!(f, "{}(", c.function)?;
                for (i, arg) in c.args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}
