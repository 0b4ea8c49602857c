// src/ui/manager.rs
//! ImGui overlay manager
//!
//! Handles ImGui integration with wgpu and winit: frame timing, input capture
//! and drawing the overlay on top of the benchmark frame.

use std::time::Instant;

use imgui::{Context, FontConfig, FontSource, MouseCursor};
use imgui_wgpu::{Renderer, RendererConfig};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use log::warn;
use wgpu::{CommandEncoder, Device, Queue, TextureFormat, TextureView};
use winit::{
    event::{Event, WindowEvent},
    window::{Window, WindowId},
};

const FONT_SIZE: f32 = 18.0;

/// Owns the ImGui context, its winit platform glue and its wgpu renderer
pub struct UiManager {
    context: Context,
    platform: WinitPlatform,
    renderer: Renderer,
    last_frame: Instant,
    last_cursor: Option<MouseCursor>,
}

impl UiManager {
    /// Creates a new UI manager
    ///
    /// DPI is locked at 1.0 so the overlay is laid out in physical pixels,
    /// matching the surface the benchmark draws into.
    ///
    /// # Arguments
    /// * `device` - WGPU device for creating renderer resources
    /// * `queue` - WGPU queue for renderer operations
    /// * `output_color_format` - Target texture format for rendering
    /// * `window` - Window for platform integration
    pub fn new(
        device: &Device,
        queue: &Queue,
        output_color_format: TextureFormat,
        window: &Window,
    ) -> Self {
        let mut context = Context::create();
        context.set_ini_filename(None);

        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(context.io_mut(), window, HiDpiMode::Locked(1.0));

        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: FONT_SIZE,
                ..Default::default()
            }),
        }]);

        let renderer = Renderer::new(
            &mut context,
            device,
            queue,
            RendererConfig {
                texture_format: output_color_format,
                ..Default::default()
            },
        );

        Self {
            context,
            platform,
            renderer,
            last_frame: Instant::now(),
            last_cursor: None,
        }
    }

    /// Keep ImGui's display size in step with the surface
    pub fn update_display_size(&mut self, width: u32, height: u32) {
        self.context.io_mut().display_size = [width as f32, height as f32];
    }

    /// Feed a window event to ImGui; returns true when the overlay captured it
    pub fn handle_input(&mut self, window: &Window, window_id: WindowId, event: &WindowEvent) -> bool {
        if !matches!(
            event,
            WindowEvent::CursorMoved { .. }
                | WindowEvent::MouseInput { .. }
                | WindowEvent::MouseWheel { .. }
                | WindowEvent::KeyboardInput { .. }
                | WindowEvent::Focused(_)
        ) {
            return false;
        }

        let wrapped: Event<()> = Event::WindowEvent {
            window_id,
            event: event.clone(),
        };
        self.platform
            .handle_event(self.context.io_mut(), window, &wrapped);

        let io = self.context.io();
        io.want_capture_mouse || io.want_capture_keyboard
    }

    /// Build this frame's overlay and record it onto `color_attachment`
    ///
    /// The attachment is loaded, not cleared, so the benchmark frame stays
    /// underneath.
    pub fn draw<F>(
        &mut self,
        device: &Device,
        queue: &Queue,
        encoder: &mut CommandEncoder,
        window: &Window,
        color_attachment: &TextureView,
        run_ui: F,
    ) where
        F: FnOnce(&imgui::Ui),
    {
        let now = Instant::now();
        self.context
            .io_mut()
            .update_delta_time(now - self.last_frame);
        self.last_frame = now;

        if let Err(err) = self.platform.prepare_frame(self.context.io_mut(), window) {
            warn!("Failed to prepare UI frame: {err}");
            return;
        }

        let ui = self.context.frame();
        run_ui(ui);

        if self.last_cursor != ui.mouse_cursor() {
            self.last_cursor = ui.mouse_cursor();
            self.platform.prepare_render(ui, window);
        }

        let draw_data = self.context.render();
        if draw_data.display_size[0] <= 0.0 || draw_data.display_size[1] <= 0.0 {
            return;
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("imgui_render_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_attachment,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let Err(err) = self
            .renderer
            .render(draw_data, queue, device, &mut render_pass)
        {
            warn!("Failed to render UI: {err}");
        }
    }
}
