//! Variable atoms (`x` and `y`)

use serde::{Deserialize, Serialize};

use super::{ElementKind, TreeElement};
use crate::{Axis, EvalContext, EvalError};

/// A leaf that reads the current value of `x` or `y` from the context.
///
/// The classification tag is fixed to [`ElementKind::Variable`] by every
/// constructor the parser uses. A tree loaded from serialized form can carry
/// any tag, and evaluating an atom whose tag is not `Variable` fails with
/// [`EvalError::InvalidExpression`] instead of producing a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    /// Which variable this atom reads
    pub axis: Axis,

    /// Classification tag
    #[serde(default = "variable_kind")]
    pub kind: ElementKind,
}

fn variable_kind() -> ElementKind {
    ElementKind::Variable
}

impl Variable {
    /// Well-formed atom for `axis`.
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            kind: ElementKind::Variable,
        }
    }

    /// Atom for `x`.
    pub fn x() -> Self {
        Self::new(Axis::X)
    }

    /// Atom for `y`.
    pub fn y() -> Self {
        Self::new(Axis::Y)
    }

    /// Atom with an explicit tag, as produced by deserialization.
    pub fn with_kind(axis: Axis, kind: ElementKind) -> Self {
        Self { axis, kind }
    }
}

impl TreeElement for Variable {
    fn evaluate(&self, ctx: &EvalContext) -> Result<f64, EvalError> {
        if self.kind != ElementKind::Variable {
            return Err(EvalError::InvalidExpression {
                kind: self.kind.name().to_string(),
            });
        }
        Ok(ctx.get(self.axis))
    }

    fn is_variable(&self) -> bool {
        true
    }

    fn kind(&self) -> ElementKind {
        self.kind
    }
}
