//! Sphere primitive for ray tracing.

use std::sync::Arc;

use tray_math::{Interval, Ray, Vec3};

use crate::error::{RenderError, RenderResult};
use crate::hittable::HitResult;
use crate::Material;

/// A sphere primitive.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<Material>,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// Fails with `InvalidGeometry` for zero, negative or non-finite radii.
    pub fn new(center: Vec3, radius: f32, material: Arc<Material>) -> RenderResult<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(RenderError::InvalidGeometry { radius });
        }
        Ok(Self {
            center,
            radius,
            material,
        })
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }

    /// Nearest intersection with t strictly inside `ray_t`.
    ///
    /// Solves |O + tD - C|^2 = r^2, preferring the near root and falling back
    /// to the far root. The returned hit is not yet tagged with a primitive.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<HitResult> {
        let oc = ray.origin() - self.center;
        let dir = ray.direction();
        let b = oc.dot(dir);
        let c = oc.length_squared() - self.radius * self.radius;

        // Origin outside and the sphere lies behind the ray
        if c > 0.0 && b > 0.0 {
            return None;
        }

        let a = dir.length_squared();
        let discriminant = b * b - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        let mut root = (-b - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (-b + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let point = ray.at(root);
        Some(HitResult {
            point,
            normal: (point - self.center) / self.radius,
            t: root,
            primitive: None,
        })
    }
}
