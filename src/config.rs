//! Pipeline configuration.

use crate::mode::TransformMode;

/// Uniform names the shader strategy looks up in each program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UniformNames {
    pub model_view: String,
    pub projection: String,
    pub normal: String,
}

impl Default for UniformNames {
    fn default() -> Self {
        Self {
            model_view: "model_view".to_string(),
            projection: "projection".to_string(),
            normal: "normal_matrix".to_string(),
        }
    }
}

/// Configuration for a [`PipelineState`](crate::PipelineState).
///
/// # Example
///
/// ```
/// use hoplite_transform::{PipelineConfig, TransformMode};
///
/// let config = PipelineConfig::default()
///     .legacy()
///     .max_stack_depth(64)
///     .report_missing_uniforms(true);
/// assert!(!config.use_shaders);
/// assert_eq!(config.initial_mode, TransformMode::ModelView);
/// ```
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Upload matrices as uniforms (`true`) or replay them through
    /// fixed-function state (`false`).
    pub use_shaders: bool,
    /// Mode that is current right after creation.
    pub initial_mode: TransformMode,
    /// Pushing beyond this many entries is a programming error. `None` means
    /// unbounded.
    pub max_stack_depth: Option<usize>,
    /// Names used to resolve the matrix uniforms.
    pub uniform_names: UniformNames,
    /// Emit a warning the first time a program is found to lack one of the
    /// matrix uniforms.
    pub report_missing_uniforms: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            use_shaders: true,
            initial_mode: TransformMode::ModelView,
            max_stack_depth: None,
            uniform_names: UniformNames::default(),
            report_missing_uniforms: false,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the shader strategy.
    pub fn shaders(mut self) -> Self {
        self.use_shaders = true;
        self
    }

    /// Select the fixed-function strategy.
    pub fn legacy(mut self) -> Self {
        self.use_shaders = false;
        self
    }

    pub fn initial_mode(mut self, mode: TransformMode) -> Self {
        self.initial_mode = mode;
        self
    }

    /// Limit stack depth; values below one are raised to one.
    pub fn max_stack_depth(mut self, depth: usize) -> Self {
        self.max_stack_depth = Some(depth.max(1));
        self
    }

    pub fn uniform_names(mut self, names: UniformNames) -> Self {
        self.uniform_names = names;
        self
    }

    pub fn report_missing_uniforms(mut self, report: bool) -> Self {
        self.report_missing_uniforms = report;
        self
    }
}
