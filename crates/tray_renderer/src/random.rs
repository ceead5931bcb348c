//! Per-worker random number source.
//!
//! Every worker thread owns its own `RandomSource`; generators are never
//! shared between threads.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Seedable uniform generator used for pixel jitter and scattering.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    /// Create a generator from a seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Derive the generator for worker `index` from a shared seed.
    ///
    /// The seed is mixed with the index so neighbouring workers do not
    /// produce correlated streams.
    pub fn for_worker(seed: u64, index: usize) -> Self {
        let stream = (index as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        Self::new(seed ^ stream)
    }

    /// Uniform float in [0, 1).
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }
}

impl RngCore for RandomSource {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

/// Uniform float in [0, 1) from any generator.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniformly distributed point inside the unit sphere.
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    // Rejection sampling from the enclosing cube
    loop {
        let v = Vec3::new(
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
        );
        if v.length_squared() <= 1.0 {
            return v;
        }
    }
}

/// Uniformly distributed unit vector.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let v = random_in_unit_sphere(rng);
        let len_sq = v.length_squared();
        if len_sq > 1e-6 {
            return v / len_sq.sqrt();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_f32_range() {
        let mut rng = RandomSource::new(7);
        for _ in 0..10_000 {
            let x = rng.next_f32();
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = RandomSource::new(1234);
        let mut b = RandomSource::new(1234);
        for _ in 0..100 {
            assert_eq!(a.next_f32().to_bits(), b.next_f32().to_bits());
        }
    }

    #[test]
    fn test_workers_get_distinct_streams() {
        let mut a = RandomSource::for_worker(42, 0);
        let mut b = RandomSource::for_worker(42, 1);
        let xs: Vec<u32> = (0..8).map(|_| a.next_u32()).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.next_u32()).collect();
        assert_ne!(xs, ys);

        let mut again = RandomSource::for_worker(42, 0);
        let zs: Vec<u32> = (0..8).map(|_| again.next_u32()).collect();
        assert_eq!(xs, zs);
    }

    #[test]
    fn test_unit_sphere_sampling() {
        let mut rng = RandomSource::new(99);
        for _ in 0..1_000 {
            assert!(random_in_unit_sphere(&mut rng).length_squared() <= 1.0);
            let unit = random_unit_vector(&mut rng);
            assert!((unit.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_unit_sphere_mean_is_centered() {
        let mut rng = RandomSource::new(5);
        let n = 20_000;
        let sum: Vec3 = (0..n).map(|_| random_in_unit_sphere(&mut rng)).sum();
        assert!((sum / n as f32).length() < 0.05);
    }
}
