//! Offscreen GPU render targets for the accelerated strategy
//!
//! Each target owns an RGBA texture the strategy draws into between
//! `begin_draw` and `end_draw`; `end_draw` submits the lines as one render
//! pass. The frame sink then composites the texture onto the window.

use std::any::Any;
use std::sync::Arc;

use log::debug;

use super::blit_pipeline::{create_source_texture, BlitPipeline, SOURCE_FORMAT};
use super::line_pipeline::{LineBatch, LinePipeline};
use crate::error::SurfaceError;
use crate::simulation::Color;
use crate::strategies::{AcceleratedSurface, AcceleratedSurfaceFactory, BrushId};

/// Shared GPU state needed to build render targets
#[derive(Clone)]
struct TargetContext {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    lines: Arc<LinePipeline>,
    blit: Arc<BlitPipeline>,
}

impl TargetContext {
    /// Create a texture of the given size, reporting device errors instead of panicking
    fn create_texture(
        &self,
        width: u32,
        height: u32,
    ) -> Result<(wgpu::Texture, wgpu::TextureView, wgpu::BindGroup), SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::InvalidBounds {
                width: f64::from(width),
                height: f64::from(height),
            });
        }
        let limit = self.device.limits().max_texture_dimension_2d;
        if width > limit || height > limit {
            return Err(SurfaceError::TextureTooLarge {
                width,
                height,
                limit,
            });
        }

        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let texture = create_source_texture(&self.device, "Accelerated Target", width, height);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.blit.bind_group(&self.device, &view);
        let validation = pollster::block_on(self.device.pop_error_scope());
        let out_of_memory = pollster::block_on(self.device.pop_error_scope());

        if let Some(err) = validation.or(out_of_memory) {
            return Err(SurfaceError::Allocation(err.to_string()));
        }
        Ok((texture, view, bind_group))
    }
}

/// GPU-backed [`AcceleratedSurface`]
pub struct GpuRenderTarget {
    context: TargetContext,
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    composite: wgpu::BindGroup,
    batch: LineBatch,
    brushes: Vec<Option<[f32; 4]>>,
    free_brushes: Vec<u32>,
    clear_color: wgpu::Color,
    size: (u32, u32),
    segments: usize,
}

impl GpuRenderTarget {
    fn new(context: TargetContext, width: u32, height: u32) -> Result<Self, SurfaceError> {
        let (texture, view, composite) = context.create_texture(width, height)?;
        let batch = LineBatch::new(&context.device, &context.lines);
        Ok(Self {
            context,
            _texture: texture,
            view,
            composite,
            batch,
            brushes: Vec::new(),
            free_brushes: Vec::new(),
            clear_color: wgpu::Color::TRANSPARENT,
            size: (width, height),
            segments: 0,
        })
    }

    /// Bind group sampling the finished target, for compositing
    pub fn composite_bind_group(&self) -> &wgpu::BindGroup {
        &self.composite
    }
}

impl AcceleratedSurface for GpuRenderTarget {
    fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        let (texture, view, composite) = self.context.create_texture(width, height)?;
        debug!("Accelerated target resized to {width}x{height}");
        self._texture = texture;
        self.view = view;
        self.composite = composite;
        self.size = (width, height);
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn begin_draw(&mut self) {
        self.batch.clear();
    }

    fn clear(&mut self, color: Color) {
        let [r, g, b, a] = color.to_rgba_f32();
        self.clear_color = wgpu::Color {
            r: f64::from(r),
            g: f64::from(g),
            b: f64::from(b),
            a: f64::from(a),
        };
        self.batch.clear();
    }

    fn create_solid_brush(&mut self, color: Color) -> BrushId {
        let rgba = Some(color.to_rgba_f32());
        match self.free_brushes.pop() {
            Some(id) => {
                self.brushes[id as usize] = rgba;
                BrushId(id)
            }
            None => {
                self.brushes.push(rgba);
                BrushId((self.brushes.len() - 1) as u32)
            }
        }
    }

    fn release_brush(&mut self, brush: BrushId) {
        if let Some(slot) = self.brushes.get_mut(brush.0 as usize) {
            if slot.take().is_some() {
                self.free_brushes.push(brush.0);
            }
        }
    }

    fn draw_line(&mut self, from: [f32; 2], to: [f32; 2], brush: BrushId, stroke_width: f32) {
        if let Some(Some(color)) = self.brushes.get(brush.0 as usize) {
            self.batch.push(from, to, stroke_width, *color);
        }
    }

    fn end_draw(&mut self) {
        let TargetContext {
            device,
            queue,
            lines,
            ..
        } = &self.context;
        self.batch.upload(device, queue, self.size);
        self.segments = self.batch.line_count();

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Accelerated Target Encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Accelerated Target Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            self.batch.draw(lines, &mut pass);
        }
        queue.submit(std::iter::once(encoder.finish()));
    }

    fn segment_count(&self) -> usize {
        self.segments
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Builds [`GpuRenderTarget`]s on the window's device
pub struct GpuSurfaceFactory {
    context: TargetContext,
}

impl GpuSurfaceFactory {
    pub fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>, blit: Arc<BlitPipeline>) -> Self {
        let lines = Arc::new(LinePipeline::new(&device, SOURCE_FORMAT));
        Self {
            context: TargetContext {
                device,
                queue,
                lines,
                blit,
            },
        }
    }
}

impl AcceleratedSurfaceFactory for GpuSurfaceFactory {
    fn create(&self, width: u32, height: u32) -> Result<Box<dyn AcceleratedSurface>, SurfaceError> {
        debug!("Creating GPU render target {width}x{height}");
        Ok(Box::new(GpuRenderTarget::new(self.context.clone(), width, height)?))
    }
}
