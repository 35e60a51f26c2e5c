//! Position, rotation and scale for placing objects relative to their parent.

use glam::{Mat4, Quat, Vec3};

/// A 3D transformation representing position, rotation, and scale.
///
/// Applied to a pipeline with
/// [`PipelineState::apply_transform`](crate::PipelineState::apply_transform),
/// which issues translate, rotate and scale in that order. Since every call
/// post-multiplies, the object is scaled first, then rotated, then translated
/// (SRT), the same matrix [`Transform::matrix`] returns.
///
/// # Example
///
/// ```
/// use glam::{Quat, Vec3};
/// use hoplite_transform::Transform;
///
/// let transform = Transform::new()
///     .position(Vec3::new(0.0, 5.0, -10.0))
///     .rotation(Quat::from_rotation_y(std::f32::consts::PI / 4.0))
///     .uniform_scale(2.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Translation relative to the parent.
    pub position: Vec3,
    /// Rotation as a unit quaternion.
    pub rotation: Quat,
    /// Scale factors for each axis.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Creates an identity transform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transform positioned at the given location.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Sets non-uniform scale factors for each axis.
    pub fn scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the same scale on all axes.
    pub fn uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// The local-to-parent matrix, `T * R * S`.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_is_translate_rotate_scale() {
        let t = Transform::new()
            .position(Vec3::new(1.0, 2.0, 3.0))
            .rotation(Quat::from_rotation_z(0.5))
            .scale(Vec3::new(2.0, 1.0, 0.5));

        let expected = Mat4::from_translation(t.position)
            * Mat4::from_quat(t.rotation)
            * Mat4::from_scale(t.scale);
        assert!(t.matrix().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn uniform_scale_sets_all_axes() {
        let t = Transform::from_position(Vec3::X).uniform_scale(3.0);
        assert_eq!(t.scale, Vec3::splat(3.0));
        assert_eq!(t.position, Vec3::X);
    }
}
