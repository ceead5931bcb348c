//! Tray Renderer - progressive CPU path tracing.
//!
//! Casts jittered rays through a camera frustum into a scene of spheres and
//! accumulates frames into a caller-owned buffer until the image converges.
//! Each frame is rendered in row tiles on a persistent worker pool.

mod error;
mod framebuffer;
mod hittable;
mod material;
mod primitive;
mod random;
mod renderer;
mod scene;
mod sphere;
pub mod tile;

pub use error::{RenderError, RenderResult};
pub use framebuffer::{color_to_rgba, linear_to_gamma, FrameBuffer};
pub use hittable::{HitResult, PrimitiveId, HIT_EPSILON};
pub use material::{Color, Material, MaterialKind, DIFFUSE_F0, METALLIC_F0};
pub use primitive::Primitive;
pub use random::{gen_f32, random_in_unit_sphere, random_unit_vector, RandomSource};
pub use renderer::{sky_color, trace_path, RenderConfig, Renderer, BOUNCE_ATTENUATION};
pub use scene::Scene;
pub use sphere::Sphere;

/// Re-export math types from tray_math
pub use tray_math::{CameraRig, Interval, Mat4, Ray, Vec3};
