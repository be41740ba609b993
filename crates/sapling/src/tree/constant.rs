//! Constant leaves

use serde::{Deserialize, Serialize};

use super::{ElementKind, TreeElement};
use crate::{EvalContext, EvalError};

/// Built-in named constants recognized by the parser.
pub const BUILTIN_CONSTANTS: &[(&str, f64)] = &[
    ("pi", std::f64::consts::PI),
    ("e", std::f64::consts::E),
    ("tau", std::f64::consts::TAU),
];

/// Look up a built-in constant by name.
pub fn builtin_constant(name: &str) -> Option<f64> {
    BUILTIN_CONSTANTS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, v)| *v)
}

/// A fixed numeric leaf, optionally carrying the name it was written as.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constant {
    /// The value
    pub value: f64,

    /// Source name (`pi`, a user definition), if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Constant {
    /// Unnamed constant.
    pub fn new(value: f64) -> Self {
        Self { value, name: None }
    }

    /// Constant that displays as `name`.
    pub fn named(name: impl Into<String>, value: f64) -> Self {
        Self {
            value,
            name: Some(name.into()),
        }
    }
}

impl TreeElement for Constant {
    fn evaluate(&self, _ctx: &EvalContext) -> Result<f64, EvalError> {
        Ok(self.value)
    }

    fn is_variable(&self) -> bool {
        false
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Constant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_ignores_context() {
        let c = Constant::new(2.5);
        assert_eq!(c.evaluate(&EvalContext::with_vars(9.0, 9.0)).unwrap(), 2.5);
        assert!(!c.is_variable());
    }

    #[test]
    fn test_builtin_lookup() {
        assert_eq!(builtin_constant("pi"), Some(std::f64::consts::PI));
        assert_eq!(builtin_constant("tau"), Some(std::f64::consts::TAU));
        assert_eq!(builtin_constant("phi"), None);
    }
}
