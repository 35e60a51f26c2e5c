use glam::Mat4;

use super::{BackendKind, TransformBackend, UniformUpload};
use crate::config::UniformNames;
use crate::mode::TransformMode;
use crate::normal::normal_matrix;
use crate::program::{ProgramId, ShaderProgram};
use crate::stack::MatrixStackSet;
use crate::uniform_cache::{MatrixUniform, UniformCache};

/// Uploads the CPU-side top matrices as shader uniforms.
pub struct ShaderBackend<U> {
    uniforms: U,
    cache: UniformCache,
    names: UniformNames,
}

impl<U: UniformUpload> ShaderBackend<U> {
    pub fn new(uniforms: U, names: UniformNames, report_missing: bool) -> Self {
        Self {
            uniforms,
            cache: UniformCache::new(report_missing),
            names,
        }
    }

    /// The wrapped uniform sink.
    pub fn uniforms(&self) -> &U {
        &self.uniforms
    }

    pub fn uniforms_mut(&mut self) -> &mut U {
        &mut self.uniforms
    }

    pub fn cache(&self) -> &UniformCache {
        &self.cache
    }

    pub fn into_inner(self) -> U {
        self.uniforms
    }
}

impl<U: UniformUpload> TransformBackend for ShaderBackend<U> {
    fn kind(&self) -> BackendKind {
        BackendKind::Shader
    }

    fn seed(&mut self, _initial: TransformMode) {}

    fn set_mode(&mut self, _mode: TransformMode) {}

    fn load_identity(&mut self, _discarded: usize) {}

    fn load_matrix(&mut self, _matrix: &Mat4) {}

    fn push(&mut self) {}

    fn pop(&mut self) {}

    fn mult_matrix(&mut self, _matrix: &Mat4) {}

    fn apply(&mut self, stacks: &MatrixStackSet, program: &dyn ShaderProgram) {
        let matrices = [
            (MatrixUniform::ModelView, TransformMode::ModelView),
            (MatrixUniform::Projection, TransformMode::Projection),
        ];
        for (uniform, mode) in matrices {
            let location = self.cache.resolve(program, uniform, &self.names);
            if location.is_valid() {
                self.uniforms.upload_mat4(location, &stacks.top(mode));
            }
        }

        let location = self
            .cache
            .resolve(program, MatrixUniform::Normal, &self.names);
        if location.is_valid() {
            let normal = normal_matrix(&stacks.top(TransformMode::ModelView));
            self.uniforms.upload_mat3(location, &normal);
        }

        self.uniforms.commit();
    }

    fn forget_program(&mut self, id: ProgramId) {
        self.cache.invalidate(id);
    }
}
