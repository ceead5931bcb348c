//! Surface materials and their scattering models.

use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use tray_math::{Ray, Vec3};

use crate::error::{RenderError, RenderResult};
use crate::hittable::HitResult;
use crate::random::{gen_f32, random_in_unit_sphere};

/// Color type alias (RGB values typically 0-1, not clamped)
pub type Color = Vec3;

/// Reflectance at normal incidence for diffuse surfaces.
pub const DIFFUSE_F0: f32 = 0.04;

/// Reflectance at normal incidence for metallic surfaces.
pub const METALLIC_F0: f32 = 0.95;

/// The closed set of shading behaviors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    Diffuse,
    Metallic,
    Dielectric,
}

impl MaterialKind {
    /// Blend factor between the surface normal and the mirror direction.
    pub fn f0(&self) -> f32 {
        match self {
            MaterialKind::Diffuse => DIFFUSE_F0,
            MaterialKind::Metallic => METALLIC_F0,
            // Dielectrics derive reflectance from the refraction index instead
            MaterialKind::Dielectric => 0.0,
        }
    }
}

impl fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MaterialKind::Diffuse => "diffuse",
            MaterialKind::Metallic => "metallic",
            MaterialKind::Dielectric => "dielectric",
        };
        f.write_str(name)
    }
}

impl FromStr for MaterialKind {
    type Err = RenderError;

    /// Accepts both the engine names and the scene-file vocabulary
    /// (`Lambertian`, `Conductor`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "diffuse" | "lambertian" => Ok(MaterialKind::Diffuse),
            "metallic" | "metal" | "conductor" => Ok(MaterialKind::Metallic),
            "dielectric" | "glass" => Ok(MaterialKind::Dielectric),
            _ => Err(RenderError::UnknownMaterial(s.to_string())),
        }
    }
}

/// An immutable material, shared between primitives via `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    kind: MaterialKind,
    color: Color,
    roughness: f32,
    refraction_index: f32,
}

impl Material {
    /// Create a diffuse material.
    ///
    /// - `color`: per-bounce attenuation color
    /// - `roughness`: 0.0 = scatter along the normal, 1.0 = widest spread
    pub fn diffuse(color: Color, roughness: f32) -> Self {
        Self {
            kind: MaterialKind::Diffuse,
            color,
            roughness: roughness.clamp(0.0, 1.0),
            refraction_index: 1.0,
        }
    }

    /// Create a metallic material.
    ///
    /// - `roughness`: 0.0 = near mirror, 1.0 = very rough
    pub fn metallic(color: Color, roughness: f32) -> Self {
        Self {
            kind: MaterialKind::Metallic,
            ..Self::diffuse(color, roughness)
        }
    }

    /// Create a dielectric (glass-like) material.
    ///
    /// - `refraction_index`: 1.0 = air, 1.5 = glass, 2.4 = diamond
    pub fn dielectric(color: Color, roughness: f32, refraction_index: f32) -> RenderResult<Self> {
        if !refraction_index.is_finite() || refraction_index <= 0.0 {
            return Err(RenderError::InvalidRefractionIndex(refraction_index));
        }
        Ok(Self {
            kind: MaterialKind::Dielectric,
            refraction_index,
            ..Self::diffuse(color, roughness)
        })
    }

    pub fn kind(&self) -> MaterialKind {
        self.kind
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn roughness(&self) -> f32 {
        self.roughness
    }

    /// Index of refraction; 1.0 for non-dielectrics.
    pub fn refraction_index(&self) -> f32 {
        self.refraction_index
    }

    /// Produce the next ray after a surface hit.
    ///
    /// The returned ray starts at the hit point. Its direction is unit length.
    pub fn scatter(&self, ray_in: &Ray, hit: &HitResult, rng: &mut dyn RngCore) -> Ray {
        let direction = match self.kind {
            MaterialKind::Diffuse | MaterialKind::Metallic => {
                self.scatter_blended(ray_in, hit, rng)
            }
            MaterialKind::Dielectric => self.scatter_dielectric(ray_in, hit, rng),
        };
        Ray::new(hit.point, direction)
    }

    /// Normal/mirror blend by F0, roughened by a point in the unit sphere.
    fn scatter_blended(&self, ray_in: &Ray, hit: &HitResult, rng: &mut dyn RngCore) -> Vec3 {
        let normal = facing_normal(ray_in, hit.normal);
        let reflected = reflect(ray_in.direction().normalize(), normal);
        let blended = normal.lerp(reflected, self.kind.f0());
        let direction = blended + self.roughness * random_in_unit_sphere(rng);
        keep_above_surface(direction, normal)
    }

    /// Fresnel (Schlick) choice between reflection and Snell refraction.
    fn scatter_dielectric(&self, ray_in: &Ray, hit: &HitResult, rng: &mut dyn RngCore) -> Vec3 {
        let unit_direction = ray_in.direction().normalize();
        let front_face = unit_direction.dot(hit.normal) < 0.0;
        let normal = if front_face { hit.normal } else { -hit.normal };
        let ratio = if front_face {
            1.0 / self.refraction_index
        } else {
            self.refraction_index
        };

        let cos_theta = (-unit_direction).dot(normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

        // Total internal reflection
        let cannot_refract = ratio * sin_theta > 1.0;

        let fuzz = self.roughness * random_in_unit_sphere(rng);
        if cannot_refract || reflectance(cos_theta, ratio) > gen_f32(rng) {
            keep_above_surface(reflect(unit_direction, normal) + fuzz, normal)
        } else {
            keep_above_surface(refract(unit_direction, normal, ratio) + fuzz, -normal)
        }
    }
}

/// Normal flipped to oppose the incoming ray.
#[inline]
fn facing_normal(ray_in: &Ray, outward_normal: Vec3) -> Vec3 {
    if ray_in.direction().dot(outward_normal) < 0.0 {
        outward_normal
    } else {
        -outward_normal
    }
}

/// Mirror `direction` into the hemisphere of `side` and normalize.
///
/// Degenerate directions collapse to `side`.
#[inline]
fn keep_above_surface(direction: Vec3, side: Vec3) -> Vec3 {
    let d = direction.dot(side);
    let direction = if d < 0.0 { direction - 2.0 * d * side } else { direction };
    if direction.length_squared() < 1e-8 {
        side
    } else {
        direction.normalize()
    }
}

/// Reflect a vector about a normal.
#[inline]
pub(crate) fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface.
#[inline]
pub(crate) fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Schlick's approximation for reflectance.
#[inline]
pub(crate) fn reflectance(cosine: f32, ratio: f32) -> f32 {
    let r0 = ((1.0 - ratio) / (1.0 + ratio)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
