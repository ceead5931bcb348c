//! Error types for the renderer.

use thiserror::Error;

/// Errors reported when building or driving a renderer.
///
/// Intersection queries never fail; a miss is the `HitResult::MISS` value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("invalid sphere geometry: radius {radius} must be finite and positive")]
    InvalidGeometry { radius: f32 },

    #[error("invalid refraction index {0}: must be finite and positive")]
    InvalidRefractionIndex(f32),

    #[error("invalid view matrix: determinant {determinant} must be finite and non-zero")]
    InvalidViewMatrix { determinant: f32 },

    #[error("unknown material type: {0}")]
    UnknownMaterial(String),

    #[error("samples per pixel must be at least 1")]
    ZeroSamples,

    #[error("max bounces must be at least 1")]
    ZeroBounces,

    #[error("image must have a non-zero size, got {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    #[error("no frames accumulated yet; render at least one frame before resolving")]
    NoFramesAccumulated,

    #[error("frame buffer holds {actual} pixels but the renderer expects {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("worker pool error: {0}")]
    ThreadPool(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

impl From<rayon::ThreadPoolBuildError> for RenderError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        RenderError::ThreadPool(err.to_string())
    }
}
