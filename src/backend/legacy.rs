use glam::Mat4;

use super::{BackendKind, FixedFunction, TransformBackend};
use crate::mode::TransformMode;
use crate::program::ShaderProgram;
use crate::stack::MatrixStackSet;

/// Replays stack operations onto fixed-function matrix state.
pub struct LegacyBackend<F> {
    fixed: F,
}

impl<F: FixedFunction> LegacyBackend<F> {
    pub fn new(fixed: F) -> Self {
        Self { fixed }
    }

    /// The wrapped fixed-function state.
    pub fn fixed_function(&self) -> &F {
        &self.fixed
    }

    pub fn fixed_function_mut(&mut self) -> &mut F {
        &mut self.fixed
    }

    pub fn into_inner(self) -> F {
        self.fixed
    }
}

impl<F: FixedFunction> TransformBackend for LegacyBackend<F> {
    fn kind(&self) -> BackendKind {
        BackendKind::Legacy
    }

    fn seed(&mut self, initial: TransformMode) {
        for mode in TransformMode::ALL {
            self.fixed.matrix_mode(mode);
            self.fixed.load_identity();
        }
        self.fixed.matrix_mode(initial);
    }

    fn set_mode(&mut self, mode: TransformMode) {
        self.fixed.matrix_mode(mode);
    }

    fn load_identity(&mut self, discarded: usize) {
        // The fixed-function reset only touches the top entry.
        for _ in 0..discarded {
            self.fixed.pop_matrix();
        }
        self.fixed.load_identity();
    }

    fn load_matrix(&mut self, matrix: &Mat4) {
        self.fixed.load_matrix(matrix);
    }

    fn push(&mut self) {
        self.fixed.push_matrix();
    }

    fn pop(&mut self) {
        self.fixed.pop_matrix();
    }

    fn mult_matrix(&mut self, matrix: &Mat4) {
        self.fixed.mult_matrix(matrix);
    }

    fn apply(&mut self, _stacks: &MatrixStackSet, _program: &dyn ShaderProgram) {}
}
