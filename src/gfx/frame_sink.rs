//! Drawing sink backed by the window surface
//!
//! Vector commands are tessellated into the frame's [`LineBatch`] in device
//! pixels. Pixel buffers are uploaded to the [`ImageLayer`] and accelerated
//! surfaces are picked up by downcasting to [`GpuRenderTarget`]; either one
//! becomes the frame's composite layer, drawn below the lines.

use cgmath::Point2;
use log::warn;

use super::accelerated::GpuRenderTarget;
use super::blit_pipeline::{BlitPipeline, ImageLayer};
use super::line_pipeline::LineBatch;
use crate::drawing::{DrawStats, DrawingGroup, DrawingSink, PathGeometry, Pen};
use crate::raster::PixelBuffer;
use crate::strategies::AcceleratedSurface;

pub struct GpuFrameSink<'a> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    blit: &'a BlitPipeline,
    lines: &'a mut LineBatch,
    image: &'a mut ImageLayer,
    scale: f32,
    composite: Option<wgpu::BindGroup>,
    stats: DrawStats,
}

impl<'a> GpuFrameSink<'a> {
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        blit: &'a BlitPipeline,
        lines: &'a mut LineBatch,
        image: &'a mut ImageLayer,
        scale_factor: f64,
    ) -> Self {
        lines.clear();
        Self {
            device,
            queue,
            blit,
            lines,
            image,
            scale: scale_factor as f32,
            composite: None,
            stats: DrawStats::default(),
        }
    }

    /// Texture layer to composite under the lines, if any was drawn
    pub fn into_composite(self) -> Option<wgpu::BindGroup> {
        self.composite
    }

    fn device_point(&self, point: Point2<f64>) -> [f32; 2] {
        [point.x as f32 * self.scale, point.y as f32 * self.scale]
    }

    fn stroke(&mut self, color: [f32; 4], width: f32, from: Point2<f64>, to: Point2<f64>) {
        let (from, to) = (self.device_point(from), self.device_point(to));
        self.lines.push(from, to, width * self.scale, color);
    }
}

impl DrawingSink for GpuFrameSink<'_> {
    fn draw_line(&mut self, pen: &Pen, from: Point2<f64>, to: Point2<f64>) {
        let (color, width) = pen.resolve();
        self.stroke(color, width, from, to);
        self.stats.record(1);
    }

    fn draw_geometry(&mut self, pen: &Pen, geometry: &PathGeometry) {
        let (color, width) = pen.resolve();
        for (from, to) in geometry.segments() {
            self.stroke(color, width, from, to);
        }
        self.stats.record(geometry.segment_count());
    }

    fn draw_drawing(&mut self, drawing: &DrawingGroup) {
        for command in drawing.commands() {
            let (color, width) = command.pen.resolve();
            self.stroke(color, width, command.from, command.to);
        }
        self.stats.record(drawing.len());
    }

    fn draw_image(&mut self, image: &PixelBuffer) {
        self.composite = Some(self.image.upload(self.device, self.queue, self.blit, image));
        self.stats.record(0);
    }

    fn draw_surface(&mut self, surface: &dyn AcceleratedSurface) {
        match surface.as_any().downcast_ref::<GpuRenderTarget>() {
            Some(target) => self.composite = Some(target.composite_bind_group().clone()),
            None => warn!("Accelerated surface is not a GPU render target; skipping composite"),
        }
        self.stats.record(surface.segment_count());
    }

    fn stats(&self) -> DrawStats {
        self.stats
    }
}
