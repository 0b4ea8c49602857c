//! # Software Rasterizer
//!
//! A directly addressed RGBA pixel buffer plus an anti-aliased fixed-point line
//! rasterizer. Used by the pixel-buffer strategy, which never issues an
//! immediate-mode draw call and instead hands the finished buffer to the host
//! as a single image.
//!
//! Pixels are stored as premultiplied RGBA8 (`[r, g, b, a]` byte order) so the
//! host can upload the buffer to an `Rgba8Unorm` texture unchanged and
//! composite it with premultiplied alpha blending.

pub mod line;

use crate::simulation::Color;

/// Fast `x / 255` for `x` in `0..=255 * 255`
#[inline]
fn div_255(x: u32) -> u32 {
    (x + 1 + (x >> 8)) >> 8
}

/// Premultiplied RGBA8 pixel buffer
#[derive(Clone, Debug)]
pub struct PixelBuffer {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Create a transparent buffer
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; width as usize * height as usize * 4],
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row, as needed for texture uploads
    #[inline]
    pub fn stride(&self) -> u32 {
        self.width * 4
    }

    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Reset every pixel to transparent black
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Blend `color` over the pixel at `(x, y)` scaled by `coverage` (0-255)
    ///
    /// Out-of-bounds coordinates are ignored.
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color, coverage: u8) {
        if !self.in_bounds(x, y) {
            return;
        }
        let alpha = div_255(u32::from(color.a) * u32::from(coverage));
        if alpha == 0 {
            return;
        }
        let idx = self.pixel_index(x as u32, y as u32);
        let inverse = 255 - alpha;
        let px = &mut self.pixels[idx..idx + 4];
        px[0] = (div_255(u32::from(color.r) * alpha) + div_255(u32::from(px[0]) * inverse)) as u8;
        px[1] = (div_255(u32::from(color.g) * alpha) + div_255(u32::from(px[1]) * inverse)) as u8;
        px[2] = (div_255(u32::from(color.b) * alpha) + div_255(u32::from(px[2]) * inverse)) as u8;
        px[3] = (alpha + div_255(u32::from(px[3]) * inverse)) as u8;
    }

    /// Read back a pixel as premultiplied `[r, g, b, a]`
    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let idx = self.pixel_index(x as u32, y as u32);
        Some([
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Number of pixels with any coverage
    pub fn covered_pixels(&self) -> usize {
        self.pixels.chunks_exact(4).filter(|px| px[3] != 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_transparent() {
        let buffer = PixelBuffer::new(16, 8);
        assert_eq!(buffer.as_bytes().len(), 16 * 8 * 4);
        assert_eq!(buffer.stride(), 64);
        assert_eq!(buffer.covered_pixels(), 0);
    }

    #[test]
    fn test_full_coverage_blend_writes_color() {
        let mut buffer = PixelBuffer::new(4, 4);
        buffer.blend_pixel(1, 2, Color::opaque(10, 200, 30), 255);
        assert_eq!(buffer.pixel(1, 2), Some([10, 200, 30, 255]));
        assert_eq!(buffer.pixel(2, 1), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_partial_coverage_is_premultiplied() {
        let mut buffer = PixelBuffer::new(2, 2);
        buffer.blend_pixel(0, 0, Color::opaque(255, 0, 0), 128);
        let [r, g, b, a] = buffer.pixel(0, 0).unwrap();
        assert_eq!(r, a);
        assert_eq!((g, b), (0, 0));
        assert!((127..=129).contains(&a));
    }

    #[test]
    fn test_blending_accumulates_alpha() {
        let mut buffer = PixelBuffer::new(1, 1);
        buffer.blend_pixel(0, 0, Color::opaque(0, 0, 255), 128);
        let first = buffer.pixel(0, 0).unwrap()[3];
        buffer.blend_pixel(0, 0, Color::opaque(0, 0, 255), 128);
        let second = buffer.pixel(0, 0).unwrap()[3];
        assert!(second > first);
    }

    #[test]
    fn test_out_of_bounds_is_ignored() {
        let mut buffer = PixelBuffer::new(3, 3);
        buffer.blend_pixel(-1, 0, Color::opaque(255, 255, 255), 255);
        buffer.blend_pixel(0, 3, Color::opaque(255, 255, 255), 255);
        assert_eq!(buffer.covered_pixels(), 0);
        assert_eq!(buffer.pixel(3, 0), None);
    }

    #[test]
    fn test_clear_resets_pixels() {
        let mut buffer = PixelBuffer::new(3, 3);
        buffer.blend_pixel(1, 1, Color::opaque(1, 2, 3), 255);
        buffer.clear();
        assert_eq!(buffer.covered_pixels(), 0);
    }
}
