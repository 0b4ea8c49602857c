//! WGPU-based renderer for the benchmark window
//!
//! Owns the surface, device and queue, the line and blit pipelines, and the
//! per-frame buffers the [`GpuFrameSink`] fills. Each frame is one render pass:
//! clear, composite layer (pixel buffer or accelerated target), then lines,
//! followed by the optional UI overlay.

use std::sync::Arc;

use log::{debug, info, warn};
use wgpu::TextureFormat;

use super::accelerated::GpuSurfaceFactory;
use super::blit_pipeline::{BlitPipeline, ImageLayer};
use super::frame_sink::GpuFrameSink;
use super::line_pipeline::{LineBatch, LinePipeline};
use crate::drawing::{DrawStats, DrawingSink};
use crate::error::SurfaceError;
use crate::strategies::pixel_buffer::MAX_BUFFER_DIMENSION;

const BACKGROUND: wgpu::Color = wgpu::Color {
    r: 0.1,
    g: 0.2,
    b: 0.3,
    a: 1.0,
};

pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    format: TextureFormat,
    line_pipeline: LinePipeline,
    blit_pipeline: Arc<BlitPipeline>,
    lines: LineBatch,
    image: ImageLayer,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<RenderEngine, SurfaceError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .map_err(|e| SurfaceError::AdapterUnavailable(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| SurfaceError::AdapterUnavailable(e.to_string()))?;
        info!("Using adapter {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: MAX_BUFFER_DIMENSION,
                    ..wgpu::Limits::downlevel_defaults()
                }
                .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| SurfaceError::DeviceRequest(e.to_string()))?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| SurfaceError::Unsupported("surface reports no formats".to_string()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            // Uncapped presentation so the benchmark measures drawing, not vsync
            present_mode: wgpu::PresentMode::AutoNoVsync,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let line_pipeline = LinePipeline::new(&device, format);
        let blit_pipeline = Arc::new(BlitPipeline::new(&device, format));
        let lines = LineBatch::new(&device, &line_pipeline);

        Ok(RenderEngine {
            surface,
            device: Arc::new(device),
            queue: Arc::new(queue),
            config,
            format,
            line_pipeline,
            blit_pipeline,
            lines,
            image: ImageLayer::new(),
        })
    }

    /// Factory for accelerated render targets on this engine's device
    pub fn surface_factory(&self) -> GpuSurfaceFactory {
        GpuSurfaceFactory::new(
            Arc::clone(&self.device),
            Arc::clone(&self.queue),
            Arc::clone(&self.blit_pipeline),
        )
    }

    /// Renders one frame
    ///
    /// `draw` receives the frame's sink and returns its statistics; `ui_callback`
    /// records the overlay on top. Returns `None` when no surface texture could
    /// be acquired, in which case nothing was drawn.
    ///
    /// # Arguments
    /// * `scale_factor` - Logical-to-device pixel ratio for sink coordinates
    /// * `draw` - Emits the frame's draw commands
    /// * `ui_callback` - Optional function that renders UI elements
    pub fn render_frame<F, U>(
        &mut self,
        scale_factor: f64,
        draw: F,
        ui_callback: Option<U>,
    ) -> Option<DrawStats>
    where
        F: FnOnce(&mut dyn DrawingSink) -> DrawStats,
        U: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                debug!("Surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return None;
            }
            Err(err) => {
                warn!("Failed to acquire surface texture: {err}");
                return None;
            }
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let (stats, composite) = {
            let mut sink = GpuFrameSink::new(
                &self.device,
                &self.queue,
                &self.blit_pipeline,
                &mut self.lines,
                &mut self.image,
                scale_factor,
            );
            let stats = draw(&mut sink);
            (stats, sink.into_composite())
        };
        self.lines
            .upload(&self.device, &self.queue, (self.config.width, self.config.height));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(BACKGROUND),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some(bind_group) = &composite {
                self.blit_pipeline.draw(bind_group, &mut render_pass);
            }
            self.lines.draw(&self.line_pipeline, &mut render_pass);
        }

        if let Some(ui_callback) = ui_callback {
            ui_callback(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_texture_view,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Some(stats)
    }

    /// Resizes the surface; zero sizes are ignored until the window is restored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Returns the surface texture format
    ///
    /// Used for creating compatible render targets and UI systems.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}
