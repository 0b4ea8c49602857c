//! Windowed host for the benchmark
//!
//! Runs a winit event loop, owns the [`RenderEngine`] and the ImGui overlay,
//! and drives a [`DrawBenchmark`] once per redraw. Frames are requested as
//! fast as the configured frame yield allows; a background
//! [`FrameRateMonitor`] logs the resulting rate.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Context};
use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::bench::DrawBenchmark;
use crate::config::BenchConfig;
use crate::gfx::RenderEngine;
use crate::performance::{FrameRateMonitor, FrameStats};
use crate::strategies::StrategyKind;
use crate::ui::{strategy_panel, OverlayState, UiManager};

pub struct StrokeBenchApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: BenchConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    bench: Option<DrawBenchmark>,
    monitor: Option<FrameRateMonitor>,
    frame_stats: FrameStats,
    last_error: Option<String>,
    next_frame: Instant,
    fatal: Option<anyhow::Error>,
}

impl StrokeBenchApp {
    pub fn new(config: BenchConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let event_loop = EventLoop::new().context("failed to create event loop")?;

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                ui_manager: None,
                bench: None,
                monitor: None,
                frame_stats: FrameStats::default(),
                last_error: None,
                next_frame: Instant::now(),
                fatal: None,
            },
        })
    }

    /// Run the event loop until the window closes
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .ok_or_else(|| anyhow!("event loop already consumed"))?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop
            .run_app(&mut self.app_state)
            .context("event loop terminated with an error")?;

        match self.app_state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Full error chain on one line, for the log and the overlay
fn describe(err: impl std::error::Error + Send + Sync + 'static) -> String {
    format!("{:#}", anyhow::Error::new(err))
}

impl AppState {
    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let (width, height) = self.config.window_size;
        let window = event_loop
            .create_window(
                WindowAttributes::default()
                    .with_title("strokebench")
                    .with_inner_size(LogicalSize::new(width, height)),
            )
            .context("failed to create window")?;
        let window = Arc::new(window);

        let size = window.inner_size();
        let engine = pollster::block_on(RenderEngine::new(
            Arc::clone(&window),
            size.width,
            size.height,
        ))?;

        let mut ui_manager = UiManager::new(
            engine.device(),
            engine.queue(),
            engine.surface_format(),
            &window,
        );
        ui_manager.update_display_size(size.width, size.height);

        // Start idle so a failing initial strategy is reported, not fatal
        let mut bench = DrawBenchmark::new(
            self.config.clone().with_strategy(StrategyKind::None),
            Arc::new(engine.surface_factory()),
        )?;
        let logical = size.to_logical::<f64>(window.scale_factor());
        if let Err(err) = bench.on_resize(logical.width, logical.height, window.scale_factor()) {
            warn!("Initial resize failed: {err}");
        }

        let mut monitor = FrameRateMonitor::new(bench.frame_counter(), self.config.sample_interval)
            .with_strategy_tag(bench.strategy_tag());
        monitor.start();

        self.window = Some(window);
        self.render_engine = Some(engine);
        self.ui_manager = Some(ui_manager);
        self.bench = Some(bench);
        self.monitor = Some(monitor);

        self.apply_strategy(self.config.initial_strategy);
        Ok(())
    }

    fn apply_strategy(&mut self, kind: StrategyKind) {
        let Some(bench) = self.bench.as_mut() else {
            return;
        };
        // The selector logs activation and setup failures itself
        self.last_error = bench.set_strategy(kind).err().map(describe);
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        let AppState {
            window: Some(window),
            render_engine: Some(engine),
            ui_manager: Some(ui_manager),
            bench: Some(bench),
            ..
        } = self
        else {
            return;
        };

        engine.resize(size.width, size.height);
        ui_manager.update_display_size(size.width, size.height);

        let scale_factor = window.scale_factor();
        let logical = size.to_logical::<f64>(scale_factor);
        if let Err(err) = bench.on_resize(logical.width, logical.height, scale_factor) {
            self.last_error = Some(describe(err));
        }
    }

    fn redraw(&mut self) {
        let AppState {
            window: Some(window),
            render_engine: Some(engine),
            ui_manager: Some(ui_manager),
            bench: Some(bench),
            monitor,
            frame_stats,
            last_error,
            ..
        } = self
        else {
            return;
        };

        let overlay = OverlayState {
            strategy: bench.strategy(),
            fps: monitor.as_ref().map_or(0.0, |m| m.gauge().get()),
            particle_count: bench.pool().len(),
            draw: frame_stats.last_draw(),
            frame_time_ms: frame_stats.average_frame_time_ms(),
            history: frame_stats.history_ms(),
            last_error: last_error.clone(),
        };

        let mut picked = None;
        frame_stats.begin_frame();
        let drawn = engine.render_frame(
            window.scale_factor(),
            |sink| bench.on_frame(sink),
            Some(|device: &wgpu::Device,
                  queue: &wgpu::Queue,
                  encoder: &mut wgpu::CommandEncoder,
                  view: &wgpu::TextureView| {
                ui_manager.draw(device, queue, encoder, window, view, |ui| {
                    picked = strategy_panel(ui, &overlay);
                });
            }),
        );
        if let Some(stats) = drawn {
            frame_stats.end_frame(stats);
        }

        if let Some(kind) = picked {
            self.apply_strategy(kind);
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, code: KeyCode) {
        let index = match code {
            KeyCode::Escape => {
                event_loop.exit();
                return;
            }
            KeyCode::Digit0 | KeyCode::Numpad0 => 0,
            KeyCode::Digit1 | KeyCode::Numpad1 => 1,
            KeyCode::Digit2 | KeyCode::Numpad2 => 2,
            KeyCode::Digit3 | KeyCode::Numpad3 => 3,
            KeyCode::Digit4 | KeyCode::Numpad4 => 4,
            KeyCode::Digit5 | KeyCode::Numpad5 => 5,
            KeyCode::Digit6 | KeyCode::Numpad6 => 6,
            _ => return,
        };
        if let Some(kind) = StrategyKind::from_index(index) {
            self.apply_strategy(kind);
        }
    }

    fn shutdown(&mut self) {
        if let Some(mut monitor) = self.monitor.take() {
            monitor.stop();
        }
        if let Some(bench) = self.bench.take() {
            info!(
                "Shutting down after {} frames",
                bench.frame_counter().get()
            );
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init(event_loop) {
            error!("Startup failed: {err:#}");
            self.fatal = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if let (Some(window), Some(ui_manager)) = (self.window.as_ref(), self.ui_manager.as_mut()) {
            if ui_manager.handle_input(window, window_id, &event) {
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, code),
            WindowEvent::Resized(size) => self.resize(size),
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::RedrawRequested => self.redraw(),
            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = self.window.as_ref() else {
            return;
        };

        // Hand control back to the event loop between frames
        let now = Instant::now();
        if now >= self.next_frame {
            window.request_redraw();
            self.next_frame = now + self.config.frame_yield;
        }
        if self.config.frame_yield.is_zero() {
            event_loop.set_control_flow(ControlFlow::Poll);
        } else {
            event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
    }
}
