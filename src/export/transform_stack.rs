//! Transform stack.

use anyhow::bail;
use cgmath::{Matrix4, Point3, SquareMatrix, Transform};
use log::trace;

/// Stack of composed transforms for nested instances and links.
///
/// The identity base is never popped.
#[derive(Debug, Clone)]
pub struct TransformStack {
    /// Composed transforms, base first.
    stack: Vec<Matrix4<f64>>,
}

impl TransformStack {
    /// Creates a new `TransformStack` holding the identity.
    pub fn new() -> Self {
        Self {
            stack: vec![Matrix4::identity()],
        }
    }

    /// Returns the current composed transform.
    pub fn top(&self) -> Matrix4<f64> {
        // The base is never removed.
        self.stack[self.stack.len() - 1]
    }

    /// Returns the number of entries, including the base.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Enters a nested frame with the given local transform.
    pub fn push(&mut self, local: Matrix4<f64>) {
        let composed = self.top() * local;
        self.stack.push(composed);
        trace!("Pushed transform: depth={}", self.stack.len());
    }

    /// Leaves the innermost frame.
    pub fn pop(&mut self) -> anyhow::Result<Matrix4<f64>> {
        if self.stack.len() <= 1 {
            bail!("Transform stack underflow: end callback without matching begin");
        }
        let popped = self
            .stack
            .pop()
            .expect("Should never happen: the stack holds 2 or more transforms");
        trace!("Popped transform: depth={}", self.stack.len());
        Ok(popped)
    }

    /// Transforms a point into the outermost frame.
    pub fn apply_to_point(&self, p: Point3<f64>) -> Point3<f64> {
        self.top().transform_point(p)
    }
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}
