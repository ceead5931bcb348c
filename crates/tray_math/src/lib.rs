// Re-export glam for convenience
pub use glam::*;

// Tray math types
mod ray;
mod interval;
pub mod camera;
pub mod frustum;

pub use ray::Ray;
pub use interval::Interval;
pub use camera::CameraRig;
pub use frustum::{camera_origin, frustum_basis, Mat4Ext};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_reexports_compose() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let window = Interval::new(1e-3, f32::INFINITY);
        assert!(window.surrounds(ray.at(2.0).length()));
    }
}
