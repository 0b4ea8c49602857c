//! The drawing sink contract between render strategies and the host
//!
//! A sink receives one frame's worth of draw commands. Hosts implement it over
//! a real GPU surface; the crate ships a counting sink for headless runs and a
//! recording sink for inspection.

use cgmath::Point2;

use super::{geometry::PathGeometry, group::DrawingGroup, resources::Pen};
use crate::raster::PixelBuffer;
use crate::strategies::accelerated::AcceleratedSurface;

/// Per-frame draw statistics
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawStats {
    /// Calls made into the sink
    pub draw_calls: u32,
    /// Line segments those calls carried
    pub segments: u32,
}

impl DrawStats {
    pub fn record(&mut self, segments: usize) {
        self.draw_calls = self.draw_calls.saturating_add(1);
        self.segments = self.segments.saturating_add(segments as u32);
    }
}

/// Receiver of draw commands for one frame
pub trait DrawingSink {
    /// Stroke a single line segment
    fn draw_line(&mut self, pen: &Pen, from: Point2<f64>, to: Point2<f64>);

    /// Stroke every figure of a path with one pen
    fn draw_geometry(&mut self, pen: &Pen, geometry: &PathGeometry);

    /// Composite a closed retained recording
    fn draw_drawing(&mut self, drawing: &DrawingGroup);

    /// Blit a finished pixel buffer covering the whole surface
    fn draw_image(&mut self, image: &PixelBuffer);

    /// Composite the contents of an accelerated surface
    fn draw_surface(&mut self, surface: &dyn AcceleratedSurface);

    /// Statistics for the commands received so far this frame
    fn stats(&self) -> DrawStats;
}

/// Sink that only counts, for headless throughput runs
///
/// Pens are still resolved so mutable and frozen resources keep their
/// different per-draw costs.
#[derive(Debug, Default)]
pub struct CountingSink {
    stats: DrawStats,
}

impl CountingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting a new frame
    pub fn reset_frame(&mut self) {
        self.stats = DrawStats::default();
    }

    fn consume(&mut self, pen: &Pen) {
        std::hint::black_box(pen.resolve());
    }
}

impl DrawingSink for CountingSink {
    fn draw_line(&mut self, pen: &Pen, _from: Point2<f64>, _to: Point2<f64>) {
        self.consume(pen);
        self.stats.record(1);
    }

    fn draw_geometry(&mut self, pen: &Pen, geometry: &PathGeometry) {
        self.consume(pen);
        self.stats.record(geometry.segment_count());
    }

    fn draw_drawing(&mut self, drawing: &DrawingGroup) {
        for command in drawing.commands() {
            self.consume(&command.pen);
        }
        self.stats.record(drawing.len());
    }

    fn draw_image(&mut self, _image: &PixelBuffer) {
        self.stats.record(0);
    }

    fn draw_surface(&mut self, surface: &dyn AcceleratedSurface) {
        self.stats.record(surface.segment_count());
    }

    fn stats(&self) -> DrawStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::resources::SolidColorBrush;
    use crate::simulation::Color;

    #[test]
    fn test_record_saturates_instead_of_wrapping() {
        let mut stats = DrawStats {
            draw_calls: u32::MAX,
            segments: u32::MAX - 1,
        };
        stats.record(5);
        assert_eq!(stats.draw_calls, u32::MAX);
        assert_eq!(stats.segments, u32::MAX);
    }

    #[test]
    fn test_counting_sink_reports_only_current_frame() {
        let pen = Pen::new(SolidColorBrush::new(Color::opaque(255, 0, 0)), 2.0);
        let mut sink = CountingSink::new();

        for _ in 0..3 {
            sink.draw_line(&pen, Point2::new(0.0, 0.0), Point2::new(1.0, 1.0));
        }
        assert_eq!(sink.stats(), DrawStats { draw_calls: 3, segments: 3 });

        sink.reset_frame();
        sink.draw_line(&pen, Point2::new(0.0, 0.0), Point2::new(1.0, 1.0));
        assert_eq!(sink.stats(), DrawStats { draw_calls: 1, segments: 1 });
    }
}
