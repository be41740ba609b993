//! User-defined named constants

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::error::{DefinitionError, SaplingError};
use crate::parser::{parse, ParseOptions};
use crate::tree::constant::builtin_constant;
use crate::tree::{Function, TreeElement};
use crate::{Axis, EvalContext};

/// Named constants the parser resolves identifiers against.
///
/// Uses IndexMap to preserve definition order for listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Definitions {
    values: IndexMap<String, f64>,
}

impl Definitions {
    /// Create an empty set of definitions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Value bound to `name`, if any.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Check if `name` is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing is defined.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Definitions in the order they were first made.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Remove a definition, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<f64> {
        self.values.shift_remove(name)
    }

    /// Bind `name` to `value`, replacing any earlier value.
    pub fn define_value(&mut self, name: &str, value: f64) -> Result<(), DefinitionError> {
        check_name(name)?;
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    /// Bind `name` to the value of `source`, which must not use `x` or `y`.
    ///
    /// Earlier definitions are visible to `source`.
    pub fn define(&mut self, name: &str, source: &str) -> Result<f64, SaplingError> {
        check_name(name)?;
        let root = parse(source, &ParseOptions::default(), self)?;
        if !root.is_constant() {
            return Err(DefinitionError::NotConstant {
                name: name.to_string(),
            }
            .into());
        }
        let value = root.evaluate(&EvalContext::new())?;
        debug!(name, value, "defined constant");
        self.values.insert(name.to_string(), value);
        Ok(value)
    }
}

/// Whether `name` is taken by a variable, built-in constant or function.
pub fn is_reserved(name: &str) -> bool {
    Axis::from_name(name).is_some()
        || builtin_constant(name).is_some()
        || Function::from_name(name).is_some()
}

fn check_name(name: &str) -> Result<(), DefinitionError> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(DefinitionError::InvalidName {
            name: name.to_string(),
        });
    }
    if is_reserved(name) {
        return Err(DefinitionError::Reserved {
            name: name.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_evaluates_source() {
        let mut defs = Definitions::new();
        let value = defs.define("half", "1 / 2").unwrap();
        assert_eq!(value, 0.5);
        assert_eq!(defs.get("half"), Some(0.5));
    }

    #[test]
    fn test_define_sees_earlier_definitions() {
        let mut defs = Definitions::new();
        defs.define("a", "3").unwrap();
        assert_eq!(defs.define("b", "a^2").unwrap(), 9.0);
    }

    #[test]
    fn test_define_rejects_variables() {
        let mut defs = Definitions::new();
        let err = defs.define("k", "2y").unwrap_err();
        assert_eq!(
            err,
            SaplingError::Definition(DefinitionError::NotConstant {
                name: "k".to_string()
            })
        );
        assert!(!defs.contains("k"));
    }

    #[test]
    fn test_reserved_names() {
        let mut defs = Definitions::new();
        for name in ["x", "y", "pi", "e", "sin", "max"] {
            assert!(matches!(
                defs.define_value(name, 1.0),
                Err(DefinitionError::Reserved { .. })
            ));
        }
    }

    #[test]
    fn test_invalid_names() {
        let mut defs = Definitions::new();
        for name in ["", "1a", "a-b", "a b"] {
            assert!(matches!(
                defs.define_value(name, 1.0),
                Err(DefinitionError::InvalidName { .. })
            ));
        }
    }

    #[test]
    fn test_order_preserved_on_redefinition() {
        let mut defs = Definitions::new();
        defs.define_value("a", 1.0).unwrap();
        defs.define_value("b", 2.0).unwrap();
        defs.define_value("a", 3.0).unwrap();
        let listed: Vec<_> = defs.iter().collect();
        assert_eq!(listed, vec![("a", 3.0), ("b", 2.0)]);

        assert_eq!(defs.remove("a"), Some(3.0));
        assert_eq!(defs.len(), 1);
    }
}
