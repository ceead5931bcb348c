//! Camera frustum basis for primary ray generation.
//!
//! The engine receives the camera's world transform as a 4x4 "view matrix".
//! Camera-space ray directions `(u, v, -1)` are carried into world space by the
//! frustum basis, `transpose(inverse(view))`, which stays correct under
//! non-uniform scale where the plain rotation block would not.

use glam::{Mat4, Vec3, Vec4};

/// Extension trait for Mat4 to transform directions.
pub trait Mat4Ext {
    /// Transform a direction in 3D space (applies rotation and scale, but NOT translation).
    /// Directions have an implicit w=0 component.
    fn transform_direction(&self, direction: Vec3) -> Vec3;

    /// The translation stored in the fourth column.
    fn translation(&self) -> Vec3;
}

impl Mat4Ext for Mat4 {
    fn transform_direction(&self, direction: Vec3) -> Vec3 {
        let v4 = Vec4::new(direction.x, direction.y, direction.z, 0.0);
        let transformed = *self * v4;
        Vec3::new(transformed.x, transformed.y, transformed.z)
    }

    fn translation(&self) -> Vec3 {
        self.w_axis.truncate()
    }
}

/// Compute the frustum basis for a camera transform.
///
/// Must be recomputed whenever the view matrix changes.
pub fn frustum_basis(view: Mat4) -> Mat4 {
    view.inverse().transpose()
}

/// World-space position of the camera described by `view`.
pub fn camera_origin(view: Mat4) -> Vec3 {
    view.translation()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_identity_basis_keeps_directions() {
        let basis = frustum_basis(Mat4::IDENTITY);
        let dir = Vec3::new(0.25, -0.5, -1.0);
        assert!(approx_eq(basis.transform_direction(dir), dir));
    }

    #[test]
    fn test_translation_does_not_affect_directions() {
        let view = Mat4::from_translation(Vec3::new(0.0, 1.0, 10.0));
        let basis = frustum_basis(view);
        let dir = Vec3::new(0.3, 0.2, -1.0);

        assert!(approx_eq(basis.transform_direction(dir), dir));
        assert_eq!(camera_origin(view), Vec3::new(0.0, 1.0, 10.0));
    }

    #[test]
    fn test_rotation_basis_matches_rotation() {
        // For an orthonormal rotation, inverse-transpose is the rotation itself
        let rotation = Mat4::from_rotation_y(FRAC_PI_2);
        let view = Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0)) * rotation;
        let basis = frustum_basis(view);

        let forward = basis.transform_direction(Vec3::NEG_Z);
        assert!(approx_eq(forward, rotation.transform_direction(Vec3::NEG_Z)));
        assert!(approx_eq(forward, Vec3::NEG_X));
    }

    #[test]
    fn test_non_uniform_scale_uses_inverse_transpose() {
        let view = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let basis = frustum_basis(view);

        let dir = basis.transform_direction(Vec3::new(1.0, 0.0, -1.0));
        assert!(approx_eq(dir, Vec3::new(0.5, 0.0, -1.0)));
    }

    #[test]
    fn test_transform_direction_ignores_w() {
        let mat = Mat4::from_translation(Vec3::new(10.0, 20.0, 30.0));
        assert_eq!(mat.transform_direction(Vec3::X), Vec3::X);
        assert_eq!(mat.translation(), Vec3::new(10.0, 20.0, 30.0));
    }
}
