//! Accumulating frame buffer.
//!
//! Holds the running sum of per-frame averaged samples together with the
//! number of frames summed. The renderer updates both in the same call, so a
//! caller never observes a sum without its matching frame count.

use tray_math::Interval;

use crate::error::{RenderError, RenderResult};
use crate::material::Color;

/// Row-major accumulation buffer owned by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
    frames: u32,
}

impl FrameBuffer {
    /// Create a new buffer filled with black and no frames accumulated.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
            frames: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of frames summed into the buffer since the last clear.
    pub fn frames(&self) -> u32 {
        self.frames
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Raw accumulated sums, row-major.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Raw accumulated sums as interleaved RGB floats.
    pub fn as_f32_slice(&self) -> &[f32] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Get the accumulated sum at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Reset every cell and the frame counter.
    pub fn clear(&mut self) {
        self.pixels.fill(Color::ZERO);
        self.frames = 0;
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    pub(crate) fn finish_frame(&mut self) {
        self.frames += 1;
    }

    /// Average of all accumulated frames.
    pub fn resolve(&self) -> RenderResult<Vec<Color>> {
        let mut out = vec![Color::ZERO; self.pixels.len()];
        self.resolve_into(&mut out)?;
        Ok(out)
    }

    /// Average of all accumulated frames, written into `out`.
    pub fn resolve_into(&self, out: &mut [Color]) -> RenderResult<()> {
        if self.frames == 0 {
            return Err(RenderError::NoFramesAccumulated);
        }
        if out.len() != self.pixels.len() {
            return Err(RenderError::BufferSizeMismatch {
                expected: self.pixels.len(),
                actual: out.len(),
            });
        }

        let inv_frames = 1.0 / self.frames as f32;
        for (dst, src) in out.iter_mut().zip(&self.pixels) {
            *dst = *src * inv_frames;
        }
        Ok(())
    }

    /// Resolve and convert to gamma-corrected 8-bit RGBA (for display or saving).
    pub fn to_rgba8(&self) -> RenderResult<Vec<u8>> {
        let resolved = self.resolve()?;
        let mut bytes = Vec::with_capacity(resolved.len() * 4);
        for color in resolved {
            bytes.extend_from_slice(&color_to_rgba(color));
        }
        Ok(bytes)
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a color to 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let to_byte = |c: f32| (255.0 * Interval::UNIT.clamp(linear_to_gamma(c))) as u8;
    [to_byte(color.x), to_byte(color.y), to_byte(color.z), 255]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_black() {
        let buffer = FrameBuffer::new(4, 3);
        assert_eq!(buffer.len(), 12);
        assert_eq!(buffer.frames(), 0);
        assert!(buffer.pixels().iter().all(|c| *c == Color::ZERO));
    }

    #[test]
    fn test_resolve_requires_a_frame() {
        let buffer = FrameBuffer::new(2, 2);
        assert_eq!(buffer.resolve(), Err(RenderError::NoFramesAccumulated));
        assert_eq!(buffer.to_rgba8(), Err(RenderError::NoFramesAccumulated));
    }

    #[test]
    fn test_resolve_divides_by_frame_count() {
        let mut buffer = FrameBuffer::new(2, 1);
        buffer.pixels_mut()[0] = Color::new(1.0, 2.0, 3.0);
        buffer.finish_frame();
        buffer.finish_frame();

        let resolved = buffer.resolve().unwrap();
        assert_eq!(resolved[0], Color::new(0.5, 1.0, 1.5));
        assert_eq!(resolved[1], Color::ZERO);
    }

    #[test]
    fn test_resolve_into_checks_size() {
        let mut buffer = FrameBuffer::new(2, 2);
        buffer.finish_frame();
        let mut out = vec![Color::ZERO; 3];
        assert_eq!(
            buffer.resolve_into(&mut out),
            Err(RenderError::BufferSizeMismatch { expected: 4, actual: 3 })
        );
    }

    #[test]
    fn test_clear_resets_sums_and_frames() {
        let mut buffer = FrameBuffer::new(2, 2);
        buffer.pixels_mut().fill(Color::ONE);
        buffer.finish_frame();

        buffer.clear();
        assert_eq!(buffer.frames(), 0);
        assert_eq!(buffer, FrameBuffer::new(2, 2));
    }

    #[test]
    fn test_as_f32_slice_is_interleaved() {
        let mut buffer = FrameBuffer::new(2, 1);
        buffer.pixels_mut()[1] = Color::new(0.1, 0.2, 0.3);
        assert_eq!(buffer.as_f32_slice(), &[0.0, 0.0, 0.0, 0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_gamma_and_rgba() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 0.0001);
        assert_eq!(color_to_rgba(Color::new(1.0, 0.0, 4.0)), [255, 0, 255, 255]);
        assert_eq!(color_to_rgba(Color::new(-1.0, 0.25, 1.0)), [0, 127, 255, 255]);
    }
}
