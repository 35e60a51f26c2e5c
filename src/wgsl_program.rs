//! Uniform lookup for WGSL programs.
//!
//! WGSL has no runtime uniform query, so names are resolved up front: the
//! module is parsed with naga, the uniform block with the requested variable
//! name is located, and each struct member's byte offset becomes its
//! [`UniformLocation`]. Those offsets are exactly where a
//! [`UniformBlock`](crate::UniformBlock) of the block's size expects the data.

use crate::error::{PipelineError, PipelineResult};
use crate::program::{ProgramId, ShaderProgram, UniformLocation};

/// A lit shader declaring the default matrix block as `transforms` at
/// group 0, binding 0.
pub const TRANSFORM_WGSL: &str = include_str!("shaders/transform.wgsl");

/// A WGSL shader program with its matrix block reflected.
#[derive(Clone, Debug)]
pub struct WgslProgram {
    id: ProgramId,
    source: String,
    block: String,
    members: Vec<(String, u32)>,
    block_size: u32,
    group: u32,
    binding: u32,
}

impl WgslProgram {
    /// Parses `source` and reflects the uniform variable named `block`.
    pub fn from_source(id: ProgramId, source: &str, block: &str) -> PipelineResult<Self> {
        let module = naga::front::wgsl::parse_str(source)
            .map_err(|e| PipelineError::ShaderReflection(e.emit_to_string(source)))?;

        let global = module
            .global_variables
            .iter()
            .map(|(_, global)| global)
            .find(|global| {
                matches!(global.space, naga::AddressSpace::Uniform)
                    && global.name.as_deref() == Some(block)
            })
            .ok_or_else(|| PipelineError::MissingUniformBlock(block.to_string()))?;

        let naga::TypeInner::Struct { members, span } = &module.types[global.ty].inner else {
            return Err(PipelineError::ShaderReflection(format!(
                "uniform '{}' is not a struct",
                block
            )));
        };

        let members = members
            .iter()
            .filter_map(|member| Some((member.name.clone()?, member.offset)))
            .collect();
        let (group, binding) = global
            .binding
            .as_ref()
            .map(|b| (b.group, b.binding))
            .unwrap_or((0, 0));

        Ok(Self {
            id,
            source: source.to_string(),
            block: block.to_string(),
            members,
            block_size: *span,
            group,
            binding,
        })
    }

    /// The WGSL source, for creating the shader module.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Name of the reflected uniform variable.
    pub fn block_name(&self) -> &str {
        &self.block
    }

    /// Size of the uniform block in bytes.
    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    /// Bind group index of the uniform block.
    pub fn group(&self) -> u32 {
        self.group
    }

    /// Binding index of the uniform block inside its group.
    pub fn binding(&self) -> u32 {
        self.binding
    }
}

impl ShaderProgram for WgslProgram {
    fn id(&self) -> ProgramId {
        self.id
    }

    fn uniform_location(&self, name: &str) -> UniformLocation {
        self.members
            .iter()
            .find(|(member, _)| member == name)
            .map(|&(_, offset)| UniformLocation(offset as i32))
            .unwrap_or(UniformLocation::INVALID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::ProgramArena;

    const SHADER: &str = TRANSFORM_WGSL;

    #[test]
    fn reflects_member_offsets() {
        let mut arena = ProgramArena::new();
        let program = WgslProgram::from_source(arena.allocate(), SHADER, "transforms").unwrap();

        assert_eq!(program.uniform_location("model_view"), UniformLocation(0));
        assert_eq!(program.uniform_location("projection"), UniformLocation(64));
        assert_eq!(program.uniform_location("normal_matrix"), UniformLocation(128));
        assert_eq!(program.block_size(), 176);
        assert_eq!((program.group(), program.binding()), (0, 0));
    }

    #[test]
    fn undeclared_member_is_invalid() {
        let mut arena = ProgramArena::new();
        let program = WgslProgram::from_source(arena.allocate(), SHADER, "transforms").unwrap();
        assert_eq!(
            program.uniform_location("texture_matrix"),
            UniformLocation::INVALID
        );
    }

    #[test]
    fn missing_block_is_an_error() {
        let mut arena = ProgramArena::new();
        let err = WgslProgram::from_source(arena.allocate(), SHADER, "camera").unwrap_err();
        assert!(matches!(err, PipelineError::MissingUniformBlock(name) if name == "camera"));
    }

    #[test]
    fn parse_errors_are_reported() {
        let mut arena = ProgramArena::new();
        let err = WgslProgram::from_source(arena.allocate(), "struct {", "transforms").unwrap_err();
        assert!(matches!(err, PipelineError::ShaderReflection(_)));
    }
}
