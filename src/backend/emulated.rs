use glam::Mat4;

use super::FixedFunction;
use crate::mode::TransformMode;
use crate::stack::MatrixStackSet;

/// Software fixed-function matrix state.
///
/// Behaves like the immediate-mode matrix API: `load_identity` replaces only
/// the top entry, and popping the last entry of a stack is recorded as a stack
/// underflow instead of changing anything. The current matrices can be read
/// back at any time, which makes this usable both headless and as the
/// reference when checking that the two strategies agree.
#[derive(Debug, Default)]
pub struct EmulatedFixedFunction {
    stacks: MatrixStackSet,
    mode: TransformMode,
    underflows: usize,
    calls: usize,
}

impl EmulatedFixedFunction {
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected matrix mode.
    pub fn mode(&self) -> TransformMode {
        self.mode
    }

    /// Reads back the current matrix of `mode`.
    pub fn matrix(&self, mode: TransformMode) -> Mat4 {
        self.stacks.top(mode)
    }

    pub fn depth(&self, mode: TransformMode) -> usize {
        self.stacks.get(mode).depth()
    }

    /// Number of pops rejected because the stack held a single entry.
    pub fn underflows(&self) -> usize {
        self.underflows
    }

    /// Total number of entry point calls.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl FixedFunction for EmulatedFixedFunction {
    fn matrix_mode(&mut self, mode: TransformMode) {
        self.calls += 1;
        self.mode = mode;
    }

    fn load_identity(&mut self) {
        self.calls += 1;
        self.stacks.get_mut(self.mode).load(Mat4::IDENTITY);
    }

    fn load_matrix(&mut self, matrix: &Mat4) {
        self.calls += 1;
        self.stacks.get_mut(self.mode).load(*matrix);
    }

    fn push_matrix(&mut self) {
        self.calls += 1;
        self.stacks.get_mut(self.mode).push();
    }

    fn pop_matrix(&mut self) {
        self.calls += 1;
        if let Err(err) = self.stacks.get_mut(self.mode).pop(self.mode) {
            tracing::warn!("Fixed-function {}", err);
            self.underflows += 1;
        }
    }

    fn mult_matrix(&mut self, matrix: &Mat4) {
        self.calls += 1;
        self.stacks.get_mut(self.mode).mult(matrix);
    }
}
