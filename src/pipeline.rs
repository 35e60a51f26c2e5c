//! The transform-state pipeline.
//!
//! [`PipelineState`] owns one matrix stack per [`TransformMode`], tracks the
//! current mode, and forwards every change to its [`TransformBackend`]. Call
//! sites look the same whichever backend was chosen:
//!
//! ```
//! use hoplite_transform::*;
//!
//! let mut pipeline = PipelineState::shader(&PipelineConfig::default(), UniformBlock::new(176));
//!
//! pipeline.set_mode(TransformMode::Projection);
//! pipeline.load_identity();
//! pipeline.perspective(60.0, 16.0 / 9.0, 0.1, 100.0);
//!
//! pipeline.set_mode(TransformMode::ModelView);
//! pipeline.load_identity();
//! pipeline.with_pushed(|p| {
//!     p.translate(Vec3::new(0.0, 0.0, -5.0));
//!     p.rotate(Quat::from_rotation_y(0.5));
//!     // draw here: p.apply(&program)
//! });
//! assert_eq!(pipeline.depth(TransformMode::ModelView), 1);
//! ```
//!
//! # Programming errors
//!
//! Popping the base entry of a stack, passing an invalid raw mode, or pushing
//! past a configured depth limit is a bug in the calling code. Debug builds log
//! it and panic; release builds log it and leave the pipeline untouched. The
//! `try_*` variants return a [`PipelineError`] instead.

use glam::{Mat3, Mat4, Quat, Vec3};

use crate::backend::{
    BackendKind, FixedFunction, LegacyBackend, ShaderBackend, TransformBackend, UniformUpload,
};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::mode::TransformMode;
use crate::normal::normal_matrix;
use crate::program::{ProgramId, ShaderProgram};
use crate::projection;
use crate::stack::MatrixStackSet;
use crate::transform::Transform;

/// Matrix stacks, the current mode and the backend that makes them visible
/// to the GPU.
///
/// One instance per render context, owned by the caller.
pub struct PipelineState<B = Box<dyn TransformBackend>> {
    stacks: MatrixStackSet,
    mode: TransformMode,
    max_depth: Option<usize>,
    backend: B,
}

impl PipelineState {
    /// Creates a pipeline whose backend is chosen by
    /// [`PipelineConfig::use_shaders`]. The collaborator for the other
    /// strategy is dropped.
    pub fn from_config<F, U>(config: &PipelineConfig, fixed_function: F, uniforms: U) -> Self
    where
        F: FixedFunction + 'static,
        U: UniformUpload + 'static,
    {
        let backend: Box<dyn TransformBackend> = if config.use_shaders {
            Box::new(ShaderBackend::new(
                uniforms,
                config.uniform_names.clone(),
                config.report_missing_uniforms,
            ))
        } else {
            Box::new(LegacyBackend::new(fixed_function))
        };
        tracing::info!("Transform pipeline using {:?} backend", backend.kind());
        Self::with_backend(config, backend)
    }
}

impl<F: FixedFunction> PipelineState<LegacyBackend<F>> {
    /// Creates a pipeline that replays every operation through `fixed_function`.
    pub fn legacy(config: &PipelineConfig, fixed_function: F) -> Self {
        Self::with_backend(config, LegacyBackend::new(fixed_function))
    }
}

impl<U: UniformUpload> PipelineState<ShaderBackend<U>> {
    /// Creates a pipeline that uploads the top matrices into `uniforms` on
    /// [`apply`](PipelineState::apply).
    pub fn shader(config: &PipelineConfig, uniforms: U) -> Self {
        Self::with_backend(
            config,
            ShaderBackend::new(
                uniforms,
                config.uniform_names.clone(),
                config.report_missing_uniforms,
            ),
        )
    }
}

impl<B: TransformBackend> PipelineState<B> {
    /// Creates a pipeline around an existing backend and seeds it with
    /// identity on every stack.
    pub fn with_backend(config: &PipelineConfig, mut backend: B) -> Self {
        backend.seed(config.initial_mode);
        tracing::debug!(
            "Transform pipeline seeded (mode: {}, max depth: {:?})",
            config.initial_mode,
            config.max_stack_depth
        );
        Self {
            stacks: MatrixStackSet::new(),
            mode: config.initial_mode,
            max_depth: config.max_stack_depth,
            backend,
        }
    }

    // ========================================================================
    // Mode selection
    // ========================================================================

    /// Makes `mode` the target of every following operation.
    pub fn set_mode(&mut self, mode: TransformMode) {
        self.mode = mode;
        self.backend.set_mode(mode);
    }

    /// Selects a mode from its raw GL enum value.
    pub fn try_set_mode_raw(&mut self, raw: u32) -> PipelineResult<()> {
        let mode = TransformMode::try_from(raw)?;
        self.set_mode(mode);
        Ok(())
    }

    /// Like [`try_set_mode_raw`](Self::try_set_mode_raw), treating an invalid
    /// value as a programming error. The current mode is kept.
    pub fn set_mode_raw(&mut self, raw: u32) {
        if let Err(err) = self.try_set_mode_raw(raw) {
            programming_error(err);
        }
    }

    // ========================================================================
    // Stack operations
    // ========================================================================

    /// Resets the current stack to a single identity matrix.
    pub fn load_identity(&mut self) {
        let discarded = self.stacks.get_mut(self.mode).reset();
        self.backend.load_identity(discarded);
    }

    /// Replaces the top of the current stack.
    pub fn load_matrix(&mut self, matrix: Mat4) {
        self.stacks.get_mut(self.mode).load(matrix);
        self.backend.load_matrix(&matrix);
    }

    /// Duplicates the top of the current stack, failing if that would exceed
    /// the configured depth limit.
    pub fn try_push(&mut self) -> PipelineResult<()> {
        let stack = self.stacks.get_mut(self.mode);
        if let Some(limit) = self.max_depth {
            if stack.depth() >= limit {
                return Err(PipelineError::StackOverflow {
                    mode: self.mode,
                    limit,
                });
            }
        }
        stack.push();
        self.backend.push();
        Ok(())
    }

    /// Duplicates the top of the current stack.
    pub fn push(&mut self) {
        if let Err(err) = self.try_push() {
            programming_error(err);
        }
    }

    /// Removes and returns the top of the current stack, failing if only the
    /// base entry is left.
    pub fn try_pop(&mut self) -> PipelineResult<Mat4> {
        let popped = self.stacks.get_mut(self.mode).pop(self.mode)?;
        self.backend.pop();
        Ok(popped)
    }

    /// Removes the top of the current stack.
    pub fn pop(&mut self) {
        if let Err(err) = self.try_pop() {
            programming_error(err);
        }
    }

    /// Runs `f` between a push and the matching pop on the current mode.
    ///
    /// The stack is brought back to its depth at entry even if `f` switches
    /// mode or leaves pushes of its own behind. The mode `f` left selected
    /// stays selected.
    ///
    /// Entries below the push cannot be restored: if `f` calls
    /// [`load_identity`](Self::load_identity) or pops past its own push on the
    /// pushed mode, that stack stays shallower than it was at entry.
    pub fn with_pushed<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let mode = self.mode;
        let depth = self.depth(mode);

        self.push();
        let result = f(self);

        let selected = self.mode;
        if selected != mode {
            self.set_mode(mode);
        }
        while self.depth(mode) > depth {
            if self.try_pop().is_err() {
                break;
            }
        }
        if selected != mode {
            self.set_mode(selected);
        }
        result
    }

    // ========================================================================
    // Transform operators (all post-multiply: top = top * X)
    // ========================================================================

    pub fn mult_matrix(&mut self, matrix: Mat4) {
        self.stacks.get_mut(self.mode).mult(&matrix);
        self.backend.mult_matrix(&matrix);
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.mult_matrix(Mat4::from_translation(offset));
    }

    pub fn rotate(&mut self, rotation: Quat) {
        self.mult_matrix(Mat4::from_quat(rotation));
    }

    /// Rotates by `angle_degrees` counter-clockwise around `axis`.
    ///
    /// The axis does not need to be normalized. A zero axis leaves the stack
    /// unchanged.
    pub fn rotate_axis(&mut self, angle_degrees: f32, axis: Vec3) {
        let Some(axis) = axis.try_normalize() else {
            tracing::warn!("rotate_axis called with a zero-length axis");
            return;
        };
        self.mult_matrix(Mat4::from_axis_angle(axis, angle_degrees.to_radians()));
    }

    pub fn scale(&mut self, factors: Vec3) {
        self.mult_matrix(Mat4::from_scale(factors));
    }

    /// Applies a transform as translate, rotate, scale.
    pub fn apply_transform(&mut self, transform: &Transform) {
        self.translate(transform.position);
        self.rotate(transform.rotation);
        self.scale(transform.scale);
    }

    /// Multiplies by a perspective projection. See [`projection::perspective`].
    pub fn perspective(&mut self, fov_y_degrees: f32, aspect: f32, near: f32, far: f32) {
        self.mult_matrix(projection::perspective(fov_y_degrees, aspect, near, far));
    }

    /// Multiplies by a perspective frustum. See [`projection::frustum`].
    pub fn frustum(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) {
        self.mult_matrix(projection::frustum(left, right, bottom, top, near, far));
    }

    /// Multiplies by an orthographic projection. See [`projection::ortho`].
    pub fn ortho(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) {
        self.mult_matrix(projection::ortho(left, right, bottom, top, near, far));
    }

    /// Multiplies by a view matrix looking from `eye` toward `target`.
    pub fn look_at(&mut self, eye: Vec3, target: Vec3, up: Vec3) {
        self.mult_matrix(projection::look_at(eye, target, up));
    }

    // ========================================================================
    // Backend
    // ========================================================================

    /// Makes the current matrices visible to `program`. Call right before
    /// each draw.
    pub fn apply(&mut self, program: &dyn ShaderProgram) {
        self.backend.apply(&self.stacks, program);
    }

    /// Drops cached uniform locations of a destroyed program.
    pub fn forget_program(&mut self, id: ProgramId) {
        tracing::debug!(
            "Forgetting program {}:{}",
            id.index(),
            id.generation()
        );
        self.backend.forget_program(id);
    }

    pub fn kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// The current mode.
    pub fn mode(&self) -> TransformMode {
        self.mode
    }

    /// Top of the current stack.
    pub fn top(&self) -> Mat4 {
        self.stacks.top(self.mode)
    }

    pub fn top_of(&self, mode: TransformMode) -> Mat4 {
        self.stacks.top(mode)
    }

    pub fn depth(&self, mode: TransformMode) -> usize {
        self.stacks.get(mode).depth()
    }

    /// Normal matrix of the current model-view top.
    pub fn normal_matrix(&self) -> Mat3 {
        normal_matrix(&self.stacks.top(TransformMode::ModelView))
    }

    pub fn stacks(&self) -> &MatrixStackSet {
        &self.stacks
    }

    pub fn max_stack_depth(&self) -> Option<usize> {
        self.max_depth
    }
}

fn programming_error(err: PipelineError) {
    tracing::error!("Transform pipeline misuse: {}", err);
    if cfg!(debug_assertions) {
        panic!("{}", err);
    }
}
