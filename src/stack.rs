//! Per-mode matrix stacks.
//!
//! A [`MatrixStack`] is never empty: it is created holding a single identity
//! matrix, and [`MatrixStack::pop`] refuses to remove that base entry. The
//! [`MatrixStackSet`] holds one stack per [`TransformMode`].

use glam::Mat4;

use crate::error::{PipelineError, PipelineResult};
use crate::mode::TransformMode;

/// A non-empty LIFO stack of 4×4 matrices.
#[derive(Clone, Debug)]
pub struct MatrixStack {
    entries: Vec<Mat4>,
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self {
            entries: vec![Mat4::IDENTITY],
        }
    }
}

impl MatrixStack {
    /// Creates a stack holding a single identity matrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// The active matrix.
    pub fn top(&self) -> Mat4 {
        self.entries[self.entries.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Mat4 {
        let last = self.entries.len() - 1;
        &mut self.entries[last]
    }

    /// Number of entries, always at least one.
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// Discards every entry and reseeds the stack with one identity matrix.
    ///
    /// Returns how many entries were above the base before the reset.
    pub fn reset(&mut self) -> usize {
        let discarded = self.entries.len() - 1;
        self.entries.clear();
        self.entries.push(Mat4::IDENTITY);
        discarded
    }

    /// Duplicates the top entry.
    pub fn push(&mut self) {
        let top = self.top();
        self.entries.push(top);
    }

    /// Removes the top entry, leaving at least the base entry in place.
    pub fn pop(&mut self, mode: TransformMode) -> PipelineResult<Mat4> {
        if self.entries.len() > 1 {
            if let Some(top) = self.entries.pop() {
                return Ok(top);
            }
        }
        Err(PipelineError::StackUnderflow(mode))
    }

    /// Replaces the top entry.
    pub fn load(&mut self, matrix: Mat4) {
        *self.top_mut() = matrix;
    }

    /// Post-multiplies the top entry: `top = top * matrix`.
    pub fn mult(&mut self, matrix: &Mat4) {
        let top = self.top_mut();
        *top = *top * *matrix;
    }
}

/// One [`MatrixStack`] per [`TransformMode`].
#[derive(Clone, Debug, Default)]
pub struct MatrixStackSet {
    stacks: [MatrixStack; TransformMode::COUNT],
}

impl MatrixStackSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, mode: TransformMode) -> &MatrixStack {
        &self.stacks[mode.index()]
    }

    pub fn get_mut(&mut self, mode: TransformMode) -> &mut MatrixStack {
        &mut self.stacks[mode.index()]
    }

    /// Shorthand for `get(mode).top()`.
    pub fn top(&self, mode: TransformMode) -> Mat4 {
        self.get(mode).top()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn starts_with_single_identity() {
        let stack = MatrixStack::new();
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top(), Mat4::IDENTITY);
    }

    #[test]
    fn push_duplicates_and_pop_is_lifo() {
        let mut stack = MatrixStack::new();
        let a = Mat4::from_translation(Vec3::X);
        let b = Mat4::from_scale(Vec3::splat(2.0));

        stack.load(a);
        stack.push();
        assert_eq!(stack.top(), a);
        stack.mult(&b);
        assert_eq!(stack.top(), a * b);

        let popped = stack.pop(TransformMode::ModelView).unwrap();
        assert_eq!(popped, a * b);
        assert_eq!(stack.top(), a);
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn base_entry_cannot_be_popped() {
        let mut stack = MatrixStack::new();
        let err = stack.pop(TransformMode::Projection).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::StackUnderflow(TransformMode::Projection)
        ));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn reset_reports_discarded_entries() {
        let mut stack = MatrixStack::new();
        stack.push();
        stack.push();
        stack.mult(&Mat4::from_translation(Vec3::Y));
        assert_eq!(stack.reset(), 2);
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top(), Mat4::IDENTITY);
        assert_eq!(stack.reset(), 0);
    }

    #[test]
    fn stacks_are_independent_per_mode() {
        let mut set = MatrixStackSet::new();
        set.get_mut(TransformMode::Texture)
            .load(Mat4::from_scale(Vec3::splat(0.5)));
        assert_eq!(set.top(TransformMode::ModelView), Mat4::IDENTITY);
        assert_eq!(set.top(TransformMode::Projection), Mat4::IDENTITY);
        assert_eq!(
            set.top(TransformMode::Texture),
            Mat4::from_scale(Vec3::splat(0.5))
        );
    }
}
