use glam::{Mat4, Vec3};

use crate::frustum::Mat4Ext;

/// First-person camera state for feeding the renderer.
///
/// Orientation is yaw about +Y followed by pitch about +X; the camera looks
/// down its local -Z axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    pub position: Vec3,
    /// Rotation about the local X axis in radians (positive looks up)
    pub pitch: f32,
    /// Rotation about the world Y axis in radians (positive turns left)
    pub yaw: f32,
}

impl CameraRig {
    /// Create a camera at `position` looking down -Z.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            pitch: 0.0,
            yaw: 0.0,
        }
    }

    /// Set the orientation in radians.
    pub fn with_orientation(mut self, pitch: f32, yaw: f32) -> Self {
        self.pitch = pitch;
        self.yaw = yaw;
        self
    }

    /// Rotation part of the camera transform.
    pub fn rotation(&self) -> Mat4 {
        Mat4::from_rotation_y(self.yaw) * Mat4::from_rotation_x(self.pitch)
    }

    /// Camera-to-world transform, the matrix handed to the renderer.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position) * self.rotation()
    }

    /// Apply a look delta in radians.
    pub fn rotate(&mut self, delta_pitch: f32, delta_yaw: f32) {
        self.pitch += delta_pitch;
        self.yaw += delta_yaw;
    }

    /// Move along a camera-relative direction.
    ///
    /// The direction is normalized first, so diagonal movement is not faster.
    /// A zero direction leaves the camera in place.
    pub fn translate_local(&mut self, direction: Vec3, distance: f32) {
        let step = direction.normalize_or_zero() * distance;
        self.position += self.rotation().transform_direction(step);
    }

    /// World-space forward direction.
    pub fn forward(&self) -> Vec3 {
        self.rotation().transform_direction(Vec3::NEG_Z)
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 1.0, 10.0))
    }
}
