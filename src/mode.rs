//! Transform modes and raw mode validation.

use std::fmt;

use crate::error::PipelineError;

/// Which logical transform is being edited.
///
/// Raw fixed-function enum values coming from legacy call sites are validated
/// with [`TransformMode::try_from`]; any other value is rejected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TransformMode {
    /// Object to eye space.
    #[default]
    ModelView,
    /// Eye to clip space.
    Projection,
    /// Texture coordinate transform.
    Texture,
}

impl TransformMode {
    /// Number of modes, one matrix stack each.
    pub const COUNT: usize = 3;

    /// All modes in stack order.
    pub const ALL: [TransformMode; Self::COUNT] = [
        TransformMode::ModelView,
        TransformMode::Projection,
        TransformMode::Texture,
    ];

    /// Fixed-function enum value for `ModelView`.
    pub const GL_MODELVIEW: u32 = 0x1700;
    /// Fixed-function enum value for `Projection`.
    pub const GL_PROJECTION: u32 = 0x1701;
    /// Fixed-function enum value for `Texture`.
    pub const GL_TEXTURE: u32 = 0x1702;

    /// Index of this mode's stack.
    pub fn index(self) -> usize {
        match self {
            TransformMode::ModelView => 0,
            TransformMode::Projection => 1,
            TransformMode::Texture => 2,
        }
    }

    /// The raw fixed-function enum value for this mode.
    pub fn to_raw(self) -> u32 {
        match self {
            TransformMode::ModelView => Self::GL_MODELVIEW,
            TransformMode::Projection => Self::GL_PROJECTION,
            TransformMode::Texture => Self::GL_TEXTURE,
        }
    }
}

impl TryFrom<u32> for TransformMode {
    type Error = PipelineError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        match raw {
            Self::GL_MODELVIEW => Ok(TransformMode::ModelView),
            Self::GL_PROJECTION => Ok(TransformMode::Projection),
            Self::GL_TEXTURE => Ok(TransformMode::Texture),
            other => Err(PipelineError::InvalidMode(other)),
        }
    }
}

impl fmt::Display for TransformMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransformMode::ModelView => "model-view",
            TransformMode::Projection => "projection",
            TransformMode::Texture => "texture",
        };
        f.write_str(name)
    }
}
