//! Normal matrix derivation.

use glam::{Mat3, Mat4};

/// Determinants smaller than this are treated as singular.
const SINGULAR_EPSILON: f32 = 1e-8;

/// Computes the normal matrix for a model-view matrix.
///
/// This is the inverse-transpose of the upper 3×3 of `model_view`. When that
/// block is singular (for example a zero scale on some axis) the upper 3×3 is
/// returned unchanged instead, which keeps normals finite at the cost of
/// being wrong under non-uniform scale.
pub fn normal_matrix(model_view: &Mat4) -> Mat3 {
    let upper = Mat3::from_mat4(*model_view);
    let det = upper.determinant();
    if !det.is_finite() || det.abs() < SINGULAR_EPSILON {
        return upper;
    }
    upper.inverse().transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    #[test]
    fn rigid_transform_keeps_rotation() {
        let rotation = Quat::from_euler(glam::EulerRot::YXZ, 0.7, -0.3, 1.1);
        let model_view = Mat4::from_rotation_translation(rotation, Vec3::new(4.0, -2.0, 9.0));

        let normal = normal_matrix(&model_view);
        assert!(normal.abs_diff_eq(Mat3::from_quat(rotation), 1e-5));
    }

    #[test]
    fn non_uniform_scale_is_inverted() {
        let model_view = Mat4::from_scale(Vec3::new(2.0, 4.0, 0.5));
        let normal = normal_matrix(&model_view);
        let expected = Mat3::from_diagonal(Vec3::new(0.5, 0.25, 2.0));
        assert!(normal.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn normals_stay_perpendicular_under_scale() {
        let model_view = Mat4::from_scale(Vec3::new(3.0, 1.0, 1.0))
            * Mat4::from_rotation_z(0.4);
        let tangent = Vec3::new(1.0, 1.0, 0.0);
        let normal = Vec3::new(1.0, -1.0, 0.0);

        let t = model_view.transform_vector3(tangent);
        let n = normal_matrix(&model_view) * normal;
        assert!(t.dot(n).abs() < 1e-5);
    }

    #[test]
    fn singular_upper_block_falls_back() {
        let model_view = Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0));
        let normal = normal_matrix(&model_view);
        assert_eq!(normal, Mat3::from_mat4(model_view));
        assert!(normal.is_finite());
    }
}
