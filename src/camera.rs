use glam::Vec3;

use crate::backend::TransformBackend;
use crate::mode::TransformMode;
use crate::pipeline::PipelineState;

/// A simple camera for 3D scenes.
///
/// Provides position, orientation, field of view and clip planes.
/// [`Camera::load_into`] resets the projection and model-view stacks of a
/// pipeline to this camera's view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    pub fov: f32, // radians
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            forward: Vec3::NEG_Z,
            up: Vec3::Y,
            fov: std::f32::consts::FRAC_PI_2, // 90 degrees
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vec3::new(x, y, z);
        self
    }

    pub fn looking_at(mut self, target_x: f32, target_y: f32, target_z: f32) -> Self {
        self.forward = (Vec3::new(target_x, target_y, target_z) - self.position).normalize_or_zero();
        self
    }

    pub fn with_fov(mut self, fov_degrees: f32) -> Self {
        self.fov = fov_degrees.to_radians();
        self
    }

    pub fn with_clip(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    /// Compute the right vector from forward and up.
    pub fn right(&self) -> Vec3 {
        self.forward.cross(self.up).normalize_or_zero()
    }

    /// Recompute up to be orthogonal to forward and right.
    pub fn orthogonal_up(&self) -> Vec3 {
        self.right().cross(self.forward).normalize_or_zero()
    }

    /// Loads the projection and view of this camera into `pipeline`.
    ///
    /// Both stacks are reset first. The pipeline is left in model-view mode
    /// holding the view matrix, ready for per-object transforms.
    pub fn load_into<B: TransformBackend>(&self, pipeline: &mut PipelineState<B>, aspect: f32) {
        pipeline.set_mode(TransformMode::Projection);
        pipeline.load_identity();
        pipeline.perspective(self.fov.to_degrees(), aspect, self.near, self.far);

        pipeline.set_mode(TransformMode::ModelView);
        pipeline.load_identity();
        pipeline.look_at(self.position, self.position + self.forward, self.orthogonal_up());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::uniform_block::UniformBlock;
    use glam::{Mat4, Vec4};

    #[test]
    fn looking_at_normalizes_forward() {
        let camera = Camera::new().at(0.0, 0.0, 0.0).looking_at(3.0, 0.0, 0.0);
        assert!(camera.forward.abs_diff_eq(Vec3::X, 1e-6));
        assert!(camera.right().abs_diff_eq(Vec3::Z, 1e-6));
        assert!(camera.orthogonal_up().abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn clip_planes_reach_the_projection() {
        let mut pipeline = PipelineState::shader(&PipelineConfig::default(), UniformBlock::new(176));
        Camera::new().with_clip(2.0, 50.0).load_into(&mut pipeline, 1.0);

        let projection = pipeline.top_of(TransformMode::Projection);
        let near = projection * Vec4::new(0.0, 0.0, -2.0, 1.0);
        let far = projection * Vec4::new(0.0, 0.0, -50.0, 1.0);
        assert!((near.z / near.w + 1.0).abs() < 1e-5);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn view_uses_orthogonalized_up() {
        let mut pipeline = PipelineState::shader(&PipelineConfig::default(), UniformBlock::new(176));
        let camera = Camera::new().at(0.0, 10.0, 10.0).looking_at(0.0, 0.0, 0.0);
        assert!(camera.orthogonal_up().dot(camera.forward).abs() < 1e-6);
        camera.load_into(&mut pipeline, 1.0);

        let view = Mat4::look_at_rh(camera.position, Vec3::ZERO, Vec3::Y);
        assert!(pipeline.top().abs_diff_eq(view, 1e-5));
    }

    #[test]
    fn load_into_resets_and_loads_view() {
        let mut pipeline = PipelineState::shader(&PipelineConfig::default(), UniformBlock::new(176));
        pipeline.push();
        pipeline.translate(Vec3::splat(9.0));

        let camera = Camera::new().at(0.0, 2.0, 10.0).looking_at(0.0, 2.0, 0.0);
        camera.load_into(&mut pipeline, 1.0);

        assert_eq!(pipeline.mode(), TransformMode::ModelView);
        assert_eq!(pipeline.depth(TransformMode::ModelView), 1);
        assert_eq!(pipeline.depth(TransformMode::Projection), 1);

        let view = Mat4::look_at_rh(camera.position, Vec3::new(0.0, 2.0, 0.0), Vec3::Y);
        assert!(pipeline.top().abs_diff_eq(view, 1e-5));

        // The target lands in the middle of the screen.
        let mvp = pipeline.top_of(TransformMode::Projection) * pipeline.top();
        let clip = mvp * Vec4::new(0.0, 2.0, 0.0, 1.0);
        assert!(clip.x.abs() < 1e-5 && clip.y.abs() < 1e-5);
    }
}
