//! Closed set of scene primitives.
//!
//! Each operation dispatches over the primitive kinds with a `match`; there
//! is no open-ended trait object hierarchy.

use std::sync::Arc;

use rand::RngCore;
use tray_math::{Interval, Ray};

use crate::hittable::HitResult;
use crate::material::{Color, Material};
use crate::sphere::Sphere;

/// A piece of scene geometry.
#[derive(Debug, Clone)]
pub enum Primitive {
    Sphere(Sphere),
}

impl Primitive {
    /// Nearest intersection with t strictly inside `ray_t`.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<HitResult> {
        match self {
            Primitive::Sphere(sphere) => sphere.intersect(ray, ray_t),
        }
    }

    /// Base color of the primitive's material.
    pub fn color(&self) -> Color {
        self.material().color()
    }

    pub fn material(&self) -> &Arc<Material> {
        match self {
            Primitive::Sphere(sphere) => sphere.material(),
        }
    }

    /// Next ray after `ray_in` hit this primitive at `hit`.
    pub fn scatter(&self, ray_in: &Ray, hit: &HitResult, rng: &mut dyn RngCore) -> Ray {
        self.material().scatter(ray_in, hit, rng)
    }
}

impl From<Sphere> for Primitive {
    fn from(sphere: Sphere) -> Self {
        Primitive::Sphere(sphere)
    }
}
