//! Sweeping a variable across a range to produce plot points

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EvalError;
use crate::tree::{Node, TreeElement};
use crate::{Axis, EvalContext};

/// Largest number of steps a range may ask for.
pub const MAX_STEPS: usize = 1 << 20;

/// Evenly spaced inputs from `start` to `end`, both included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleRange {
    /// First input
    pub start: f64,
    /// Last input
    pub end: f64,
    /// Number of inputs (2 to [`MAX_STEPS`])
    pub steps: usize,
}

impl SampleRange {
    /// Create a validated range.
    pub fn new(start: f64, end: f64, steps: usize) -> Result<Self, EvalError> {
        let range = Self { start, end, steps };
        range.validate()?;
        Ok(range)
    }

    /// Reject non-finite bounds and step counts outside `2..=MAX_STEPS`.
    pub fn validate(&self) -> Result<(), EvalError> {
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(EvalError::InvalidRange {
                message: format!("bounds must be finite, got {}..{}", self.start, self.end),
            });
        }
        if self.steps < 2 {
            return Err(EvalError::InvalidRange {
                message: format!("need at least 2 steps, got {}", self.steps),
            });
        }
        if self.steps > MAX_STEPS {
            return Err(EvalError::InvalidRange {
                message: format!("at most {} steps, got {}", MAX_STEPS, self.steps),
            });
        }
        Ok(())
    }

    /// Input value of step `i`.
    pub fn value_at(&self, i: usize) -> f64 {
        if i == 0 {
            return self.start;
        }
        if i + 1 >= self.steps {
            return self.end;
        }
        // `end - start` overflows for bounds near f64::MAX
        let t = i as f64 / (self.steps - 1) as f64;
        self.start * (1.0 - t) + self.end * t
    }

    /// All input values in order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.steps).map(move |i| self.value_at(i))
    }
}

/// One sampled input and its result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Value the swept variable was set to
    pub input: f64,
    /// Result, or `None` where it was not finite (a gap in the plot)
    pub output: Option<f64>,
}

/// Evaluates a tree repeatedly while stepping one variable.
#[derive(Debug, Clone, Copy)]
pub struct Sampler<'a> {
    root: &'a Node,
    axis: Axis,
}

impl<'a> Sampler<'a> {
    /// Sweep `axis` when evaluating `root`.
    pub fn new(root: &'a Node, axis: Axis) -> Self {
        Self { root, axis }
    }

    /// The swept variable.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Evaluate once per step of `range`.
    ///
    /// The swept variable is written into `ctx` before each step and
    /// restored to its previous value afterwards, also on error. The other
    /// variable keeps whatever value `ctx` holds.
    pub fn sample(&self, ctx: &mut EvalContext, range: &SampleRange) -> Result<Vec<Point>, EvalError> {
        range.validate()?;
        debug!(
            axis = %self.axis,
            start = range.start,
            end = range.end,
            steps = range.steps,
            "sampling expression"
        );

        let previous = ctx.get(self.axis);
        let result = self.sweep(ctx, range);
        ctx.set(self.axis, previous);

        if let Ok(points) = &result {
            let gaps = points.iter().filter(|p| p.output.is_none()).count();
            debug!(points = points.len(), gaps, "sampling finished");
        }
        result
    }

    fn sweep(&self, ctx: &mut EvalContext, range: &SampleRange) -> Result<Vec<Point>, EvalError> {
        let mut points = Vec::with_capacity(range.steps);
        for input in range.values() {
            if ctx.is_interrupted() {
                return Err(EvalError::Interrupted);
            }
            ctx.set(self.axis, input);
            let value = self.root.evaluate(ctx)?;
            points.push(Point {
                input,
                output: value.is_finite().then_some(value),
            });
        }
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Function;

    #[test]
    fn test_range_includes_both_ends() {
        let range = SampleRange::new(-1.0, 1.0, 5).unwrap();
        let values: Vec<f64> = range.values().collect();
        assert_eq!(values, vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_reversed_range() {
        let range = SampleRange::new(2.0, 0.0, 3).unwrap();
        let values: Vec<f64> = range.values().collect();
        assert_eq!(values, vec![2.0, 1.0, 0.0]);
    }

    #[test]
    fn test_invalid_ranges() {
        assert!(matches!(
            SampleRange::new(0.0, 1.0, 1),
            Err(EvalError::InvalidRange { .. })
        ));
        assert!(matches!(
            SampleRange::new(f64::NAN, 1.0, 10),
            Err(EvalError::InvalidRange { .. })
        ));
        assert!(matches!(
            SampleRange::new(0.0, f64::INFINITY, 10),
            Err(EvalError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_step_count_is_capped() {
        assert!(SampleRange::new(0.0, 1.0, MAX_STEPS).is_ok());
        assert!(matches!(
            SampleRange::new(0.0, 1.0, MAX_STEPS + 1),
            Err(EvalError::InvalidRange { .. })
        ));
        assert!(matches!(
            SampleRange::new(0.0, 1.0, usize::MAX),
            Err(EvalError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_extreme_bounds_stay_finite() {
        let range = SampleRange::new(-f64::MAX, f64::MAX, 3).unwrap();
        let values: Vec<f64> = range.values().collect();
        assert_eq!(values, vec![-f64::MAX, 0.0, f64::MAX]);

        let range = SampleRange::new(-f64::MAX, f64::MAX, 7).unwrap();
        assert!(range.values().all(f64::is_finite));
    }

    #[test]
    fn test_sweeps_y() {
        let root = Node::mul(Node::constant(2.0), Node::y());
        let mut ctx = EvalContext::new();
        let range = SampleRange::new(0.0, 2.0, 3).unwrap();
        let points = Sampler::new(&root, Axis::Y).sample(&mut ctx, &range).unwrap();
        let outputs: Vec<Option<f64>> = points.iter().map(|p| p.output).collect();
        assert_eq!(outputs, vec![Some(0.0), Some(2.0), Some(4.0)]);
    }

    #[test]
    fn test_restores_swept_variable() {
        let root = Node::x();
        let mut ctx = EvalContext::with_vars(42.0, 7.0);
        let range = SampleRange::new(0.0, 1.0, 2).unwrap();
        Sampler::new(&root, Axis::X).sample(&mut ctx, &range).unwrap();
        assert_eq!(ctx.x, 42.0);
        assert_eq!(ctx.y, 7.0);
    }

    #[test]
    fn test_non_finite_outputs_are_gaps() {
        let root = Node::call(Function::Ln, vec![Node::x()]);
        let mut ctx = EvalContext::new();
        let range = SampleRange::new(-1.0, 1.0, 3).unwrap();
        let points = Sampler::new(&root, Axis::X).sample(&mut ctx, &range).unwrap();
        assert_eq!(points[0].output, None);
        assert_eq!(points[1].output, None);
        assert_eq!(points[2].output, Some(0.0));
    }

    #[test]
    fn test_interrupt_stops_sampling() {
        let root = Node::x();
        let mut ctx = EvalContext::with_vars(5.0, 0.0);
        ctx.interrupt();
        let range = SampleRange::new(0.0, 1.0, 10).unwrap();
        let result = Sampler::new(&root, Axis::X).sample(&mut ctx, &range);
        assert_eq!(result, Err(EvalError::Interrupted));
        assert_eq!(ctx.x, 5.0);
    }
}
