//! Evaluation context: the current variable values and run controls

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// One of the two free variables an expression can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// The `x` variable
    X,
    /// The `y` variable
    Y,
}

impl Axis {
    /// Source-level name of the variable.
    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
        }
    }

    /// Look up an axis by its source-level name.
    pub fn from_name(name: &str) -> Option<Axis> {
        match name {
            "x" => Some(Axis::X),
            "y" => Some(Axis::Y),
            _ => None,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Variable values and controls for evaluation.
///
/// The context is owned by the caller and passed by reference into every
/// `evaluate` call. Nodes only read from it, so the caller decides when
/// `x` and `y` change relative to a tree walk.
#[derive(Debug, Clone)]
pub struct EvalContext {
    /// Current value of `x`
    pub x: f64,

    /// Current value of `y`
    pub y: f64,

    /// Interrupt flag - set to true to abort evaluation
    pub interrupt: Arc<AtomicBool>,

    /// Whether to trace evaluation (for debugging)
    pub trace: bool,
}

impl Default for EvalContext {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            interrupt: Arc::new(AtomicBool::new(false)),
            trace: false,
        }
    }
}

impl EvalContext {
    /// Create a new context with both variables at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context with the given variable values.
    pub fn with_vars(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Default::default()
        }
    }

    /// Current value of a variable.
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Overwrite a variable.
    pub fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
        }
    }

    /// Overwrite `x`.
    pub fn set_x(&mut self, value: f64) {
        self.x = value;
    }

    /// Overwrite `y`.
    pub fn set_y(&mut self, value: f64) {
        self.y = value;
    }

    /// Check if evaluation has been interrupted.
    pub fn is_interrupted(&self) -> bool {
        self.interrupt.load(Ordering::Relaxed)
    }

    /// Request interruption of evaluation.
    pub fn interrupt(&self) {
        self.interrupt.store(true, Ordering::Relaxed);
    }

    /// Reset the interrupt flag.
    pub fn reset_interrupt(&self) {
        self.interrupt.store(false, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_origin() {
        let ctx = EvalContext::default();
        assert_eq!(ctx.x, 0.0);
        assert_eq!(ctx.y, 0.0);
        assert!(!ctx.trace);
        assert!(!ctx.is_interrupted());
    }

    #[test]
    fn test_get_set_by_axis() {
        let mut ctx = EvalContext::with_vars(1.0, 2.0);
        assert_eq!(ctx.get(Axis::X), 1.0);
        assert_eq!(ctx.get(Axis::Y), 2.0);

        ctx.set(Axis::Y, -7.5);
        assert_eq!(ctx.y, -7.5);
        ctx.set_x(4.0);
        assert_eq!(ctx.get(Axis::X), 4.0);
    }

    #[test]
    fn test_interrupt_shared_between_clones() {
        let ctx = EvalContext::new();
        let other = ctx.clone();
        other.interrupt();
        assert!(ctx.is_interrupted());
        ctx.reset_interrupt();
        assert!(!other.is_interrupted());
    }

    #[test]
    fn test_axis_names() {
        assert_eq!(Axis::from_name("x"), Some(Axis::X));
        assert_eq!(Axis::from_name("y"), Some(Axis::Y));
        assert_eq!(Axis::from_name("z"), None);
        assert_eq!(Axis::Y.to_string(), "y");
    }
}
