//! # Hoplite Transform
//!
//! **Matrix stacks for real-time renderers, uploaded the way your GPU wants them.**
//!
//! A [`PipelineState`] tracks the model-view, projection and texture matrices
//! with one stack per mode. Before each draw, [`PipelineState::apply`] makes the
//! current matrices visible to a shader program. How that happens depends on
//! the backend picked at creation:
//!
//! - **Legacy**: every operation is replayed through [`FixedFunction`] calls.
//! - **Shader**: the top matrices and the derived normal matrix are uploaded
//!   through [`UniformUpload`] on apply.
//!
//! ## Quick Start
//!
//! ```
//! use hoplite_transform::*;
//!
//! let mut programs = ProgramArena::new();
//! let program = WgslProgram::from_source(
//!     programs.allocate(),
//!     TRANSFORM_WGSL,
//!     "transforms",
//! )
//! .unwrap();
//!
//! let block = UniformBlock::new(program.block_size() as usize);
//! let mut pipeline = PipelineState::shader(&PipelineConfig::default(), block);
//!
//! Camera::new().at(0.0, 2.0, 8.0).looking_at(0.0, 0.0, 0.0).load_into(&mut pipeline, 16.0 / 9.0);
//!
//! pipeline.with_pushed(|p| {
//!     p.apply_transform(&Transform::from_position(Vec3::new(1.0, 0.0, 0.0)));
//!     p.apply(&program);
//! });
//!
//! let uploaded = pipeline.backend().uniforms().read_mat4(program.uniform_location("model_view"));
//! assert!(uploaded.is_some());
//! ```
//!
//! ## Philosophy
//!
//! - **Owned state**: no globals, the pipeline is a plain value you pass around.
//! - **Same calls, either backend**: call sites never branch on the strategy.
//! - **Escape hatches everywhere**: reach the wgpu buffer or the fixed-function
//!   state through [`PipelineState::backend`] when needed.
//!
//! See the [repository](https://github.com/xandwr/hoplite) for full documentation.

mod backend;
mod camera;
mod config;
mod error;
mod gpu;
mod mode;
mod normal;
mod pipeline;
mod program;
pub mod projection;
mod stack;
mod transform;
mod uniform_block;
mod uniform_buffer;
mod uniform_cache;
mod wgsl_program;

#[cfg(test)]
mod test_support;

pub use backend::{
    BackendKind, EmulatedFixedFunction, FixedFunction, LegacyBackend, ShaderBackend,
    TransformBackend, UniformUpload,
};
pub use camera::Camera;
pub use config::{PipelineConfig, UniformNames};
pub use error::{PipelineError, PipelineResult};
pub use gpu::GpuContext;
pub use mode::TransformMode;
pub use normal::normal_matrix;
pub use pipeline::PipelineState;
pub use program::{ProgramArena, ProgramId, ShaderProgram, UniformLocation};
pub use stack::{MatrixStack, MatrixStackSet};
pub use transform::Transform;
pub use uniform_block::UniformBlock;
pub use uniform_buffer::TransformUniformBuffer;
pub use uniform_cache::{MatrixUniform, UniformCache};
pub use wgsl_program::{TRANSFORM_WGSL, WgslProgram};

// Re-export glam math types for convenience
pub use glam;
pub use glam::{Mat3, Mat4, Quat, Vec3, Vec4};
