//! Error types for the transform pipeline.
//!
//! Most pipeline operations never fail at runtime: misuse from calling code is
//! a programming error that panics in debug builds and is ignored in release
//! builds (see [`PipelineState`](crate::PipelineState)). The `try_*` variants
//! surface those same conditions as [`PipelineError`] for callers that want to
//! handle them.

use crate::mode::TransformMode;

/// Errors produced by the transform pipeline and its GPU collaborators.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A raw matrix-mode value did not name a transform mode.
    #[error("invalid matrix mode 0x{0:04X}")]
    InvalidMode(u32),
    /// A pop would have removed the base entry of a stack.
    #[error("{0} matrix stack underflow")]
    StackUnderflow(TransformMode),
    /// A push exceeded the configured depth limit.
    #[error("{mode} matrix stack overflow (limit {limit})")]
    StackOverflow { mode: TransformMode, limit: usize },
    /// A WGSL module could not be parsed for reflection.
    #[error("shader reflection failed: {0}")]
    ShaderReflection(String),
    /// The named uniform block was not declared by the shader.
    #[error("uniform block '{0}' not found")]
    MissingUniformBlock(String),
    /// The GPU adapter or device could not be created.
    #[error("GPU error: {0}")]
    Gpu(String),
}

impl From<wgpu::RequestAdapterError> for PipelineError {
    fn from(err: wgpu::RequestAdapterError) -> Self {
        PipelineError::Gpu(err.to_string())
    }
}

impl From<wgpu::RequestDeviceError> for PipelineError {
    fn from(err: wgpu::RequestDeviceError) -> Self {
        PipelineError::Gpu(err.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type PipelineResult<T> = Result<T, PipelineError>;
