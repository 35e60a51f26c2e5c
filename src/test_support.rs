//! Test doubles shared by the unit tests.

use std::cell::Cell;

use glam::{Mat3, Mat4};

use crate::backend::UniformUpload;
use crate::program::{ProgramId, ShaderProgram, UniformLocation};
use crate::uniform_block::UniformBlock;

pub(crate) const LOCATION_STRIDE: i32 = 64;

/// A program that declares a fixed list of uniforms and counts lookups.
///
/// The uniform at index `i` of `declared` is located at byte offset `i * 64`,
/// so every matrix gets its own slot in a [`UniformBlock`](crate::UniformBlock).
pub(crate) struct CountingProgram {
    id: ProgramId,
    declared: Vec<&'static str>,
    lookups: Cell<usize>,
}

impl CountingProgram {
    pub(crate) fn new(id: ProgramId, declared: &[&'static str]) -> Self {
        Self {
            id,
            declared: declared.to_vec(),
            lookups: Cell::new(0),
        }
    }

    pub(crate) fn lookups(&self) -> usize {
        self.lookups.get()
    }
}

impl ShaderProgram for CountingProgram {
    fn id(&self) -> ProgramId {
        self.id
    }

    fn uniform_location(&self, name: &str) -> UniformLocation {
        self.lookups.set(self.lookups.get() + 1);
        self.declared
            .iter()
            .position(|declared| *declared == name)
            .map(|i| UniformLocation(i as i32 * LOCATION_STRIDE))
            .unwrap_or(UniformLocation::INVALID)
    }
}

/// A uniform sink that keeps a snapshot of its block at every commit.
pub(crate) struct RecordingUniforms {
    current: UniformBlock,
    pub(crate) commits: Vec<UniformBlock>,
}

impl RecordingUniforms {
    pub(crate) fn new(size: usize) -> Self {
        Self {
            current: UniformBlock::new(size),
            commits: Vec::new(),
        }
    }
}

impl UniformUpload for RecordingUniforms {
    fn upload_mat4(&mut self, location: UniformLocation, matrix: &Mat4) {
        self.current.upload_mat4(location, matrix);
    }

    fn upload_mat3(&mut self, location: UniformLocation, matrix: &Mat3) {
        self.current.upload_mat3(location, matrix);
    }

    fn commit(&mut self) {
        self.commits.push(self.current.clone());
    }
}
