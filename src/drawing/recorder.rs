//! Command-recording sink
//!
//! Keeps every command it receives in submission order, with the geometry
//! flattened to plain segments. Useful for comparing what different strategies
//! actually emit.

use cgmath::Point2;

use super::{
    geometry::PathGeometry,
    group::DrawingGroup,
    resources::Pen,
    sink::{DrawStats, DrawingSink},
};
use crate::raster::PixelBuffer;
use crate::simulation::Color;
use crate::strategies::accelerated::AcceleratedSurface;

/// A stroked segment as the sink saw it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecordedSegment {
    pub color: Color,
    pub thickness: f32,
    pub from: Point2<f64>,
    pub to: Point2<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Line(RecordedSegment),
    Geometry {
        color: Color,
        segments: Vec<RecordedSegment>,
    },
    Drawing {
        segments: Vec<RecordedSegment>,
    },
    Image {
        width: u32,
        height: u32,
        covered_pixels: usize,
    },
    Surface {
        width: u32,
        height: u32,
        segments: usize,
    },
}

#[derive(Debug, Default)]
pub struct CommandRecorder {
    commands: Vec<DrawCommand>,
    stats: DrawStats,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drop recorded commands and statistics
    pub fn clear(&mut self) {
        self.commands.clear();
        self.stats = DrawStats::default();
    }

    /// All stroked segments across every vector command, in submission order
    pub fn segments(&self) -> Vec<RecordedSegment> {
        self.commands
            .iter()
            .flat_map(|command| match command {
                DrawCommand::Line(segment) => vec![*segment],
                DrawCommand::Geometry { segments, .. } | DrawCommand::Drawing { segments } => {
                    segments.clone()
                }
                DrawCommand::Image { .. } | DrawCommand::Surface { .. } => Vec::new(),
            })
            .collect()
    }

    fn record_segment(pen: &Pen, from: Point2<f64>, to: Point2<f64>) -> RecordedSegment {
        RecordedSegment {
            color: pen.color(),
            thickness: pen.thickness(),
            from,
            to,
        }
    }
}

impl DrawingSink for CommandRecorder {
    fn draw_line(&mut self, pen: &Pen, from: Point2<f64>, to: Point2<f64>) {
        self.commands
            .push(DrawCommand::Line(Self::record_segment(pen, from, to)));
        self.stats.record(1);
    }

    fn draw_geometry(&mut self, pen: &Pen, geometry: &PathGeometry) {
        let segments: Vec<_> = geometry
            .segments()
            .map(|(from, to)| Self::record_segment(pen, from, to))
            .collect();
        self.stats.record(segments.len());
        self.commands.push(DrawCommand::Geometry {
            color: pen.color(),
            segments,
        });
    }

    fn draw_drawing(&mut self, drawing: &DrawingGroup) {
        let segments: Vec<_> = drawing
            .commands()
            .iter()
            .map(|c| Self::record_segment(&c.pen, c.from, c.to))
            .collect();
        self.stats.record(segments.len());
        self.commands.push(DrawCommand::Drawing { segments });
    }

    fn draw_image(&mut self, image: &PixelBuffer) {
        self.stats.record(0);
        self.commands.push(DrawCommand::Image {
            width: image.width(),
            height: image.height(),
            covered_pixels: image.covered_pixels(),
        });
    }

    fn draw_surface(&mut self, surface: &dyn AcceleratedSurface) {
        let (width, height) = surface.size();
        let segments = surface.segment_count();
        self.stats.record(segments);
        self.commands.push(DrawCommand::Surface {
            width,
            height,
            segments,
        });
    }

    fn stats(&self) -> DrawStats {
        self.stats
    }
}
