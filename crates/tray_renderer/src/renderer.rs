//! Progressive path tracing renderer.
//!
//! Implements:
//! - Jittered multi-sample primary rays through the frustum basis
//! - An iterative bounce loop with a fixed per-bounce falloff and a sky term
//! - Row-tile parallel rendering on a persistent worker pool
//! - Additive accumulation into a caller-owned frame buffer

use std::time::Instant;

use rand::RngCore;
use tray_math::{camera_origin, frustum_basis, Mat4, Mat4Ext, Ray, Vec3};

use crate::error::{RenderError, RenderResult};
use crate::framebuffer::FrameBuffer;
use crate::hittable::PrimitiveId;
use crate::material::Color;
use crate::primitive::Primitive;
use crate::random::{gen_f32, RandomSource};
use crate::scene::Scene;
use crate::tile::{assign_tiles, row_tiles, tile_rows, Tile};

/// Attenuation multiplier applied after every surface hit.
pub const BOUNCE_ATTENUATION: f32 = 0.5;

/// Render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Samples per pixel per frame
    pub samples_per_pixel: u32,
    /// Maximum number of bounces per path
    pub max_bounces: u32,
    /// Seed shared by all worker generators
    pub seed: u64,
    /// Worker count, `None` for the available hardware parallelism
    pub threads: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 1,
            max_bounces: 5,
            seed: 0x5EED,
            threads: None,
        }
    }
}

impl RenderConfig {
    pub fn with_samples(mut self, samples_per_pixel: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self
    }

    pub fn with_max_bounces(mut self, max_bounces: u32) -> Self {
        self.max_bounces = max_bounces;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Check the sample and bounce counts.
    pub fn validate(&self) -> RenderResult<()> {
        if self.samples_per_pixel == 0 {
            return Err(RenderError::ZeroSamples);
        }
        if self.max_bounces == 0 {
            return Err(RenderError::ZeroBounces);
        }
        Ok(())
    }

    /// Worker count after resolving `None` against the machine.
    fn resolved_threads(&self) -> usize {
        match self.threads {
            Some(0) => {
                log::warn!("Requested 0 worker threads, using 1");
                1
            }
            Some(n) => n,
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

/// Camera data needed to generate primary rays for one frame.
#[derive(Debug, Clone, Copy)]
struct FrameView {
    origin: Vec3,
    frustum: Mat4,
    inv_width: f32,
    inv_height: f32,
}

impl FrameView {
    fn new(view: Mat4, width: u32, height: u32) -> Self {
        Self {
            origin: camera_origin(view),
            frustum: frustum_basis(view),
            inv_width: 1.0 / width as f32,
            inv_height: 1.0 / height as f32,
        }
    }

    /// Jittered ray through pixel (x, y). Row 0 maps to v = -1.
    fn primary_ray(&self, x: u32, y: u32, rng: &mut dyn RngCore) -> Ray {
        let u = (x as f32 + gen_f32(rng)) * self.inv_width * 2.0 - 1.0;
        let v = (y as f32 + gen_f32(rng)) * self.inv_height * 2.0 - 1.0;
        let direction = self.frustum.transform_direction(Vec3::new(u, v, -1.0));
        Ray::new(self.origin, direction)
    }
}

/// Sky gradient seen by rays that escape the scene.
pub fn sky_color(direction: Vec3) -> Color {
    let unit_direction = direction.normalize_or_zero();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Follow one path through the scene for at most `max_bounces` bounces.
///
/// Each hit adds the primitive's base color scaled by the running
/// attenuation, which then halves. A miss adds the sky and ends the path.
pub fn trace_path(scene: &Scene, ray: Ray, max_bounces: u32, rng: &mut dyn RngCore) -> Color {
    let mut ray = ray;
    let mut color = Color::ZERO;
    let mut attenuation = 1.0;

    for _ in 0..max_bounces {
        let hit = scene.raycast(&ray);
        let primitive = match hit.primitive.and_then(|id| scene.get(id)) {
            Some(primitive) if hit.is_hit() => primitive,
            _ => {
                color += sky_color(ray.direction()) * attenuation;
                break;
            }
        };

        color += primitive.color() * attenuation;
        attenuation *= BOUNCE_ATTENUATION;
        ray = primitive.scatter(&ray, &hit, rng);
    }

    color
}

/// Average of `config.samples_per_pixel` paths through pixel (x, y).
fn render_pixel(
    view: &FrameView,
    scene: &Scene,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        let ray = view.primary_ray(x, y, rng);
        pixel_color += trace_path(scene, ray, config.max_bounces, rng);
    }

    pixel_color / config.samples_per_pixel as f32
}

/// Render one tile and add it into `band`, the tile's rows of the buffer.
fn render_tile(
    tile: &Tile,
    band: &mut [Color],
    width: u32,
    view: &FrameView,
    scene: &Scene,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) {
    for local_y in 0..tile.rows {
        let row = &mut band[(local_y * width) as usize..((local_y + 1) * width) as usize];
        for (x, cell) in row.iter_mut().enumerate() {
            *cell += render_pixel(view, scene, x as u32, tile.y_start + local_y, config, rng);
        }
    }
}

/// The renderer core: scene, camera state and worker pool.
pub struct Renderer {
    width: u32,
    height: u32,
    config: RenderConfig,
    scene: Scene,
    view_matrix: Mat4,
    view: FrameView,
    pool: rayon::ThreadPool,
    rngs: Vec<RandomSource>,
}

impl Renderer {
    /// Create a renderer for a `width` x `height` image.
    ///
    /// Builds the worker pool once; it is reused for every frame.
    pub fn new(width: u32, height: u32, config: RenderConfig) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyImage { width, height });
        }
        config.validate()?;

        let threads = config.resolved_threads();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("tray-worker-{i}"))
            .build()?;
        let rngs = (0..threads)
            .map(|i| RandomSource::for_worker(config.seed, i))
            .collect();

        log::info!(
            "Renderer {}x{} @ {} spp, {} bounces on {} worker threads",
            width,
            height,
            config.samples_per_pixel,
            config.max_bounces,
            threads
        );

        Ok(Self {
            width,
            height,
            config,
            scene: Scene::new(),
            view_matrix: Mat4::IDENTITY,
            view: FrameView::new(Mat4::IDENTITY, width, height),
            pool,
            rngs,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Number of workers in the pool.
    pub fn thread_count(&self) -> usize {
        self.rngs.len()
    }

    /// Append a primitive to the scene.
    pub fn add_object(&mut self, primitive: impl Into<Primitive>) -> PrimitiveId {
        self.scene.add(primitive)
    }

    /// Set the camera transform and recompute the frustum basis.
    ///
    /// A singular or non-finite transform is rejected and the previous
    /// camera is kept.
    pub fn set_view_matrix(&mut self, view_matrix: Mat4) -> RenderResult<()> {
        let determinant = view_matrix.determinant();
        if !determinant.is_finite() || determinant == 0.0 {
            return Err(RenderError::InvalidViewMatrix { determinant });
        }
        let view = FrameView::new(view_matrix, self.width, self.height);
        if !view.frustum.is_finite() || !view.origin.is_finite() {
            return Err(RenderError::InvalidViewMatrix { determinant });
        }

        self.view_matrix = view_matrix;
        self.view = view;
        Ok(())
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    /// Frustum basis currently used for primary rays.
    pub fn frustum(&self) -> Mat4 {
        self.view.frustum
    }

    /// Re-derive every worker generator from `seed`.
    ///
    /// With a fixed thread count, frames rendered after a reseed are
    /// bit-for-bit reproducible.
    pub fn reseed(&mut self, seed: u64) {
        self.config.seed = seed;
        for (i, rng) in self.rngs.iter_mut().enumerate() {
            *rng = RandomSource::for_worker(seed, i);
        }
    }

    /// Reset the buffer's sums and frame count together.
    ///
    /// Worker generators keep their state, so the next frame is a fresh sample.
    pub fn clear(&self, buffer: &mut FrameBuffer) {
        buffer.clear();
        log::debug!("Frame buffer cleared");
    }

    /// Render one frame and add it into `buffer`.
    ///
    /// Blocks until every worker has finished. The buffer's frame count is
    /// incremented in the same call.
    pub fn raytrace(&mut self, buffer: &mut FrameBuffer) -> RenderResult<()> {
        let expected = self.width as usize * self.height as usize;
        if buffer.width() != self.width || buffer.height() != self.height {
            return Err(RenderError::BufferSizeMismatch {
                expected,
                actual: buffer.len(),
            });
        }

        let start = Instant::now();
        let threads = self.rngs.len();
        let width = self.width;
        let rows = tile_rows(self.height, threads);
        let tiles = row_tiles(self.height, threads);

        // Pair every tile with its own disjoint band of rows
        let mut bands: Vec<Option<&mut [Color]>> = buffer
            .pixels_mut()
            .chunks_mut((rows * width) as usize)
            .map(Some)
            .collect();
        let mut work: Vec<Vec<(Tile, &mut [Color])>> = Vec::with_capacity(threads);
        for worker_tiles in assign_tiles(&tiles, threads) {
            let mut jobs = Vec::with_capacity(worker_tiles.len());
            for tile in worker_tiles {
                let band = bands
                    .get_mut((tile.y_start / rows) as usize)
                    .and_then(Option::take);
                if let Some(band) = band {
                    jobs.push((tile, band));
                }
            }
            work.push(jobs);
        }

        let view = &self.view;
        let scene = &self.scene;
        let config = &self.config;
        let rngs = &mut self.rngs;

        self.pool.scope(|s| {
            for (worker_tiles, rng) in work.into_iter().zip(rngs.iter_mut()) {
                s.spawn(move |_| {
                    for (tile, band) in worker_tiles {
                        render_tile(&tile, band, width, view, scene, config, &mut *rng);
                    }
                });
            }
        });

        buffer.finish_frame();

        let elapsed = start.elapsed();
        let rays = expected as u64 * self.config.samples_per_pixel as u64;
        let micros = elapsed.as_micros().max(1) as f64;
        log::debug!(
            "Frame {} in {:?} ({:.2} MRays/s)",
            buffer.frames(),
            elapsed,
            rays as f64 / micros
        );

        Ok(())
    }
}
