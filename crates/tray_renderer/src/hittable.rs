//! HitResult and primitive identity for ray-object intersection.

use tray_math::Vec3;

/// Minimum accepted hit distance, avoids self-intersection after a bounce.
pub const HIT_EPSILON: f32 = 1e-3;

/// Identity of a primitive: its index in the owning scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimitiveId(pub usize);

impl PrimitiveId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Record of the nearest intersection along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResult {
    /// Point of intersection
    pub point: Vec3,
    /// Unit surface normal, pointing outward from the primitive
    pub normal: Vec3,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// The primitive that was hit, `None` for a miss
    pub primitive: Option<PrimitiveId>,
}

impl HitResult {
    /// The "no hit" sentinel.
    pub const MISS: HitResult = HitResult {
        point: Vec3::ZERO,
        normal: Vec3::ZERO,
        t: f32::INFINITY,
        primitive: None,
    };

    /// True when this result names a primitive at a finite, non-negative distance.
    pub fn is_hit(&self) -> bool {
        self.primitive.is_some() && self.t.is_finite() && self.t >= 0.0
    }

    /// Tag this result with the primitive that produced it.
    pub fn with_primitive(mut self, id: PrimitiveId) -> Self {
        self.primitive = Some(id);
        self
    }
}

impl Default for HitResult {
    fn default() -> Self {
        Self::MISS
    }
}
