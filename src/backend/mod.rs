//! Execution strategies for the transform pipeline.
//!
//! The pipeline always keeps its CPU-side matrix stacks. What happens beyond
//! that depends on the backend chosen when the pipeline is created:
//!
//! - [`LegacyBackend`] replays every stack operation through [`FixedFunction`]
//!   entry points as it happens. Applying to a program does nothing.
//! - [`ShaderBackend`] leaves the stacks alone until [`TransformBackend::apply`],
//!   then uploads the top matrices through [`UniformUpload`].
//!
//! Both leave geometry in the same place for the same sequence of calls.

mod emulated;
mod legacy;
mod shader;

pub use emulated::EmulatedFixedFunction;
pub use legacy::LegacyBackend;
pub use shader::ShaderBackend;

use glam::{Mat3, Mat4};

use crate::mode::TransformMode;
use crate::program::{ProgramId, ShaderProgram, UniformLocation};
use crate::stack::MatrixStackSet;

/// Fixed-function matrix entry points used by the legacy strategy.
///
/// Semantics follow the classic immediate-mode API: every call acts on the
/// stack selected by the last [`matrix_mode`](Self::matrix_mode), and
/// [`load_identity`](Self::load_identity) only replaces the top entry.
pub trait FixedFunction {
    fn matrix_mode(&mut self, mode: TransformMode);
    fn load_identity(&mut self);
    fn load_matrix(&mut self, matrix: &Mat4);
    fn push_matrix(&mut self);
    fn pop_matrix(&mut self);
    /// `top = top * matrix`
    fn mult_matrix(&mut self, matrix: &Mat4);
}

/// Uniform upload entry points used by the shader strategy.
///
/// Callers only pass valid locations. Every apply ends with exactly one
/// [`commit`](Self::commit), after its last upload.
pub trait UniformUpload {
    fn upload_mat4(&mut self, location: UniformLocation, matrix: &Mat4);
    fn upload_mat3(&mut self, location: UniformLocation, matrix: &Mat3);

    /// The uploads of one apply are complete. Sinks that batch several draws
    /// into one submission snapshot the values for that draw here.
    fn commit(&mut self) {}
}

/// Which strategy a backend implements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    Legacy,
    Shader,
}

/// A transform execution strategy.
///
/// The pipeline validates every operation and updates its own stacks before
/// forwarding it here, so implementations never see an underflowing pop or an
/// invalid mode.
pub trait TransformBackend {
    fn kind(&self) -> BackendKind;

    /// Called once at creation with every stack holding a single identity.
    fn seed(&mut self, initial: TransformMode);

    fn set_mode(&mut self, mode: TransformMode);

    /// The current stack was reset to one identity entry; `discarded` entries
    /// above the base were dropped.
    fn load_identity(&mut self, discarded: usize);

    fn load_matrix(&mut self, matrix: &Mat4);
    fn push(&mut self);
    fn pop(&mut self);
    fn mult_matrix(&mut self, matrix: &Mat4);

    /// Make the current top matrices visible to `program` for the next draw.
    fn apply(&mut self, stacks: &MatrixStackSet, program: &dyn ShaderProgram);

    /// Forget anything cached for a destroyed program.
    fn forget_program(&mut self, _id: ProgramId) {}
}

impl<B: TransformBackend + ?Sized> TransformBackend for Box<B> {
    fn kind(&self) -> BackendKind {
        (**self).kind()
    }

    fn seed(&mut self, initial: TransformMode) {
        (**self).seed(initial);
    }

    fn set_mode(&mut self, mode: TransformMode) {
        (**self).set_mode(mode);
    }

    fn load_identity(&mut self, discarded: usize) {
        (**self).load_identity(discarded);
    }

    fn load_matrix(&mut self, matrix: &Mat4) {
        (**self).load_matrix(matrix);
    }

    fn push(&mut self) {
        (**self).push();
    }

    fn pop(&mut self) {
        (**self).pop();
    }

    fn mult_matrix(&mut self, matrix: &Mat4) {
        (**self).mult_matrix(matrix);
    }

    fn apply(&mut self, stacks: &MatrixStackSet, program: &dyn ShaderProgram) {
        (**self).apply(stacks, program);
    }

    fn forget_program(&mut self, id: ProgramId) {
        (**self).forget_program(id);
    }
}
