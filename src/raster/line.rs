//! Anti-aliased line rasterization
//!
//! Wu-style stepping in 16.16 fixed point: walk the major axis one pixel at a
//! time and split each step's coverage between the two pixels straddling the
//! exact minor-axis position.

use super::PixelBuffer;
use crate::simulation::Color;

const FRAC_BITS: u32 = 16;
const ONE: i64 = 1 << FRAC_BITS;
const FRAC_MASK: i64 = ONE - 1;

/// Coordinates beyond this magnitude would overflow the fixed-point gradient
const MAX_COORD: f64 = 1.0e7;

#[inline]
fn to_fixed(value: f64) -> i64 {
    (value * ONE as f64).round() as i64
}

impl PixelBuffer {
    /// Draw an anti-aliased line from `(x0, y0)` to `(x1, y1)` in pixel units
    ///
    /// Lines entirely outside the buffer are rejected before stepping; pixels
    /// partly outside are clipped individually. Non-finite or absurdly distant
    /// input is ignored.
    pub fn draw_line_aa(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: Color) {
        if ![x0, y0, x1, y1].iter().all(|v| v.is_finite() && v.abs() < MAX_COORD) {
            return;
        }
        let (w, h) = (self.width() as f64, self.height() as f64);
        if x0.max(x1) < -1.0 || y0.max(y1) < -1.0 || x0.min(x1) > w || y0.min(y1) > h {
            return;
        }

        let steep = (y1 - y0).abs() > (x1 - x0).abs();
        let (mut ax, mut ay, mut bx, mut by) = if steep {
            (y0, x0, y1, x1)
        } else {
            (x0, y0, x1, y1)
        };
        if ax > bx {
            std::mem::swap(&mut ax, &mut bx);
            std::mem::swap(&mut ay, &mut by);
        }

        let (fax, fay, fbx, fby) = (to_fixed(ax), to_fixed(ay), to_fixed(bx), to_fixed(by));
        let dx = fbx - fax;
        let dy = fby - fay;
        let gradient = if dx == 0 { 0 } else { (dy << FRAC_BITS) / dx };

        let first = (fax + ONE / 2) >> FRAC_BITS;
        let last = (fbx + ONE / 2) >> FRAC_BITS;

        // Minor-axis position at the centre of the first major-axis pixel
        let mut intery = fay + ((((first << FRAC_BITS) - fax) * gradient) >> FRAC_BITS);

        for major in first..=last {
            let minor = intery >> FRAC_BITS;
            let frac = ((intery & FRAC_MASK) >> (FRAC_BITS - 8)) as u8;
            let (near, far) = (255 - frac, frac);

            if steep {
                self.blend_pixel(minor as i32, major as i32, color, near);
                self.blend_pixel(minor as i32 + 1, major as i32, color, far);
            } else {
                self.blend_pixel(major as i32, minor as i32, color, near);
                self.blend_pixel(major as i32, minor as i32 + 1, color, far);
            }
            intery += gradient;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::opaque(255, 0, 0);

    #[test]
    fn test_horizontal_line_on_pixel_row() {
        let mut buffer = PixelBuffer::new(10, 5);
        buffer.draw_line_aa(1.0, 2.0, 6.0, 2.0, RED);

        for x in 1..=6 {
            assert_eq!(buffer.pixel(x, 2), Some([255, 0, 0, 255]), "x = {x}");
        }
        assert_eq!(buffer.pixel(0, 2), Some([0, 0, 0, 0]));
        assert_eq!(buffer.pixel(7, 2), Some([0, 0, 0, 0]));
        assert_eq!(buffer.pixel(3, 3), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_vertical_line_is_handled_as_steep() {
        let mut buffer = PixelBuffer::new(5, 10);
        buffer.draw_line_aa(3.0, 8.0, 3.0, 1.0, RED);

        for y in 1..=8 {
            assert_eq!(buffer.pixel(3, y), Some([255, 0, 0, 255]), "y = {y}");
        }
        assert_eq!(buffer.covered_pixels(), 8);
    }

    #[test]
    fn test_half_pixel_offset_splits_coverage() {
        let mut buffer = PixelBuffer::new(8, 8);
        buffer.draw_line_aa(1.0, 3.5, 5.0, 3.5, RED);

        let upper = buffer.pixel(2, 3).unwrap()[3];
        let lower = buffer.pixel(2, 4).unwrap()[3];
        assert!((126..=129).contains(&upper), "upper = {upper}");
        assert!((126..=129).contains(&lower), "lower = {lower}");
    }

    #[test]
    fn test_diagonal_touches_each_column() {
        let mut buffer = PixelBuffer::new(8, 8);
        buffer.draw_line_aa(0.0, 0.0, 7.0, 7.0, RED);

        for i in 0..8 {
            assert_eq!(buffer.pixel(i, i).unwrap()[3], 255);
        }
    }

    #[test]
    fn test_zero_length_segment_plots_a_point() {
        let mut buffer = PixelBuffer::new(4, 4);
        buffer.draw_line_aa(2.0, 2.0, 2.0, 2.0, RED);
        assert_eq!(buffer.pixel(2, 2), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_lines_outside_are_clipped() {
        let mut buffer = PixelBuffer::new(4, 4);
        buffer.draw_line_aa(-50.0, -50.0, -40.0, -45.0, RED);
        buffer.draw_line_aa(100.0, 1.0, 120.0, 2.0, RED);
        buffer.draw_line_aa(f64::NAN, 0.0, 1.0, 1.0, RED);
        assert_eq!(buffer.covered_pixels(), 0);

        buffer.draw_line_aa(-2.0, 1.0, 2.0, 1.0, RED);
        assert_eq!(buffer.pixel(0, 1).unwrap()[3], 255);
        assert_eq!(buffer.pixel(2, 1).unwrap()[3], 255);
    }
}
