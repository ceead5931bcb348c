//! Scene container and nearest-intersection query.

use tray_math::{Interval, Ray};

use crate::hittable::{HitResult, PrimitiveId, HIT_EPSILON};
use crate::primitive::Primitive;

/// An ordered collection of owned primitives.
///
/// Primitive ids are indices into this collection, assigned on insertion.
/// The scene is read-only while a frame is rendering.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    primitives: Vec<Primitive>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a primitive and return its id.
    pub fn add(&mut self, primitive: impl Into<Primitive>) -> PrimitiveId {
        let id = PrimitiveId(self.primitives.len());
        self.primitives.push(primitive.into());
        id
    }

    pub fn get(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.primitives.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Iterate primitives with their ids, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (PrimitiveId, &Primitive)> {
        self.primitives
            .iter()
            .enumerate()
            .map(|(index, primitive)| (PrimitiveId(index), primitive))
    }

    /// Find the nearest intersection along `ray`.
    ///
    /// Linear scan; each primitive is queried with the closest distance found
    /// so far as its upper bound. Returns `HitResult::MISS` if nothing is hit.
    pub fn raycast(&self, ray: &Ray) -> HitResult {
        let window = Interval::new(HIT_EPSILON, f32::INFINITY);
        let mut closest = HitResult::MISS;

        for (id, primitive) in self.iter() {
            if let Some(hit) = primitive.intersect(ray, window.with_max(closest.t)) {
                closest = hit.with_primitive(id);
            }
        }

        closest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Material, Sphere};
    use std::sync::Arc;
    use tray_math::Vec3;

    fn sphere_at(z: f32, radius: f32) -> Sphere {
        let material = Arc::new(Material::diffuse(Color::splat(0.5), 0.0));
        Sphere::new(Vec3::new(0.0, 0.0, z), radius, material).unwrap()
    }

    #[test]
    fn test_ids_follow_insertion_order() {
        let mut scene = Scene::new();
        assert!(scene.is_empty());

        let a = scene.add(sphere_at(-5.0, 1.0));
        let b = scene.add(sphere_at(-10.0, 1.0));
        assert_eq!(a, PrimitiveId(0));
        assert_eq!(b, PrimitiveId(1));
        assert_eq!(scene.len(), 2);
        assert!(scene.get(b).is_some());
        assert!(scene.get(PrimitiveId(2)).is_none());
    }

    #[test]
    fn test_raycast_empty_scene_misses() {
        let scene = Scene::new();
        let hit = scene.raycast(&Ray::new(Vec3::ZERO, Vec3::NEG_Z));
        assert_eq!(hit, HitResult::MISS);
    }

    #[test]
    fn test_raycast_returns_nearest_regardless_of_order() {
        let mut scene = Scene::new();
        let far = scene.add(sphere_at(-10.0, 1.0));
        let near = scene.add(sphere_at(-5.0, 1.0));

        let hit = scene.raycast(&Ray::new(Vec3::ZERO, Vec3::NEG_Z));
        assert!(hit.is_hit());
        assert_eq!(hit.primitive, Some(near));
        assert_ne!(hit.primitive, Some(far));
        assert!((hit.t - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_raycast_misses_when_looking_away() {
        let mut scene = Scene::new();
        scene.add(sphere_at(-5.0, 1.0));

        let hit = scene.raycast(&Ray::new(Vec3::ZERO, Vec3::Z));
        assert!(!hit.is_hit());
        assert_eq!(hit.t, f32::INFINITY);
    }
}
