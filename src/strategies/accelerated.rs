//! Drawing through a lower-level accelerated 2D surface
//!
//! The host supplies the surface through an [`AcceleratedSurfaceFactory`].
//! Each frame the strategy clears the surface, rebuilds its brush table (one
//! brush per palette slot), then issues one hardware line per particle grouped
//! by slot. The finished surface is composited into the sink with one call.

use std::any::Any;
use std::sync::Arc;

use log::{debug, warn};

use super::{FrameContext, RenderStrategy, ResourceKind, ResourceLease, ResourceLedger, StrategyKind, Viewport};
use crate::drawing::DrawingSink;
use crate::error::SurfaceError;
use crate::simulation::{Color, PALETTE_SIZE};

/// Handle to a brush owned by an accelerated surface
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BrushId(pub u32);

/// A hardware render target the strategy draws into
pub trait AcceleratedSurface: Any {
    /// Recreate size-dependent storage for the new device size
    fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError>;

    fn size(&self) -> (u32, u32);

    fn begin_draw(&mut self);

    fn clear(&mut self, color: Color);

    fn create_solid_brush(&mut self, color: Color) -> BrushId;

    fn release_brush(&mut self, brush: BrushId);

    /// Queue one stroked line in device pixels
    fn draw_line(&mut self, from: [f32; 2], to: [f32; 2], brush: BrushId, stroke_width: f32);

    fn end_draw(&mut self);

    /// Lines drawn between the last `begin_draw` and `end_draw`
    fn segment_count(&self) -> usize;

    fn as_any(&self) -> &dyn Any;
}

/// Creates accelerated surfaces on demand
pub trait AcceleratedSurfaceFactory {
    fn create(&self, width: u32, height: u32) -> Result<Box<dyn AcceleratedSurface>, SurfaceError>;
}

/// Factory for hosts without any accelerated backend
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAcceleration;

impl AcceleratedSurfaceFactory for NoAcceleration {
    fn create(&self, _width: u32, _height: u32) -> Result<Box<dyn AcceleratedSurface>, SurfaceError> {
        Err(SurfaceError::Unsupported(
            "no accelerated surface backend available".to_string(),
        ))
    }
}

struct LiveSurface {
    surface: Box<dyn AcceleratedSurface>,
    brushes: [Option<BrushId>; PALETTE_SIZE],
    _lease: ResourceLease,
}

impl LiveSurface {
    fn release_brushes(&mut self) {
        for brush in self.brushes.iter_mut().filter_map(Option::take) {
            self.surface.release_brush(brush);
        }
    }
}

pub struct AcceleratedStrategy {
    factory: Arc<dyn AcceleratedSurfaceFactory>,
    ledger: ResourceLedger,
    live: Option<LiveSurface>,
    buckets: [Vec<usize>; PALETTE_SIZE],
    scale_factor: f64,
}

impl AcceleratedStrategy {
    /// Set up the strategy, creating its surface for `viewport`
    ///
    /// Degenerate bounds defer surface creation to the next resize; a factory
    /// failure is returned as-is.
    pub fn new(
        viewport: Viewport,
        factory: Arc<dyn AcceleratedSurfaceFactory>,
        ledger: ResourceLedger,
    ) -> Result<Self, SurfaceError> {
        let mut strategy = Self {
            factory,
            ledger,
            live: None,
            buckets: Default::default(),
            scale_factor: viewport.scale_factor,
        };
        strategy.resize(viewport)?;
        Ok(strategy)
    }

    pub fn surface(&self) -> Option<&dyn AcceleratedSurface> {
        self.live.as_ref().map(|live| live.surface.as_ref())
    }

    fn create_surface(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        debug!("Creating {width}x{height} accelerated surface");
        let surface = self.factory.create(width, height)?;
        self.live = Some(LiveSurface {
            surface,
            brushes: [None; PALETTE_SIZE],
            _lease: self.ledger.acquire(ResourceKind::AcceleratedSurface),
        });
        Ok(())
    }
}

impl RenderStrategy for AcceleratedStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::AcceleratedSurface
    }

    fn render(&mut self, frame: &mut FrameContext<'_>, sink: &mut dyn DrawingSink) {
        frame.advance_particles();

        let Some(live) = self.live.as_mut() else {
            return;
        };

        for bucket in &mut self.buckets {
            bucket.clear();
        }
        for (index, particle) in frame.pool.particles().iter().enumerate() {
            self.buckets[particle.palette_index % PALETTE_SIZE].push(index);
        }

        let scale = self.scale_factor;
        let stroke_width = (f64::from(frame.pen_thickness) * scale) as f32;
        let particles = frame.pool.particles();

        live.surface.begin_draw();
        live.surface.clear(Color::TRANSPARENT);

        // Brushes are rebuilt from the current palette every frame
        live.release_brushes();
        for (slot, color) in frame.palette.colors().into_iter().enumerate() {
            live.brushes[slot] = Some(live.surface.create_solid_brush(color));
        }

        for (slot, bucket) in self.buckets.iter().enumerate() {
            let Some(brush) = live.brushes[slot] else {
                continue;
            };
            for &index in bucket {
                let particle = &particles[index];
                live.surface.draw_line(
                    [
                        (particle.previous.x * scale) as f32,
                        (particle.previous.y * scale) as f32,
                    ],
                    [
                        (particle.current.x * scale) as f32,
                        (particle.current.y * scale) as f32,
                    ],
                    brush,
                    stroke_width,
                );
            }
        }
        live.surface.end_draw();

        sink.draw_surface(live.surface.as_ref());
    }

    fn resize(&mut self, viewport: Viewport) -> Result<(), SurfaceError> {
        self.scale_factor = viewport.scale_factor;
        let Some((width, height)) = viewport.device_pixels() else {
            warn!(
                "Skipping accelerated surface allocation for degenerate bounds {}x{}",
                viewport.bounds.width, viewport.bounds.height
            );
            return Ok(());
        };

        match self.live.as_mut() {
            Some(live) if live.surface.size() == (width, height) => Ok(()),
            Some(live) => {
                debug!("Resizing accelerated surface to {width}x{height}");
                live.surface.resize(width, height)
            }
            None => self.create_surface(width, height),
        }
    }

    fn teardown(&mut self) {
        if let Some(mut live) = self.live.take() {
            live.release_brushes();
            debug!("Released accelerated surface");
        }
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct MockLine {
        pub from: [f32; 2],
        pub to: [f32; 2],
        pub brush: BrushId,
        pub stroke_width: f32,
    }

    #[derive(Default)]
    pub struct MockSurface {
        pub size: (u32, u32),
        pub lines: Vec<MockLine>,
        pub brush_colors: Vec<(BrushId, Color)>,
        pub live_brushes: usize,
        pub clears: usize,
        pub drawing: bool,
        next_brush: u32,
    }

    impl AcceleratedSurface for MockSurface {
        fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
            self.size = (width, height);
            Ok(())
        }

        fn size(&self) -> (u32, u32) {
            self.size
        }

        fn begin_draw(&mut self) {
            self.drawing = true;
            self.lines.clear();
        }

        fn clear(&mut self, _color: Color) {
            self.clears += 1;
        }

        fn create_solid_brush(&mut self, color: Color) -> BrushId {
            let id = BrushId(self.next_brush);
            self.next_brush += 1;
            self.live_brushes += 1;
            self.brush_colors.push((id, color));
            id
        }

        fn release_brush(&mut self, _brush: BrushId) {
            self.live_brushes -= 1;
        }

        fn draw_line(&mut self, from: [f32; 2], to: [f32; 2], brush: BrushId, stroke_width: f32) {
            assert!(self.drawing, "draw_line outside begin/end");
            self.lines.push(MockLine {
                from,
                to,
                brush,
                stroke_width,
            });
        }

        fn end_draw(&mut self) {
            self.drawing = false;
        }

        fn segment_count(&self) -> usize {
            self.lines.len()
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    /// Factory that can be told to fail, and counts what it built
    #[derive(Default)]
    pub struct MockFactory {
        pub fail: AtomicBool,
        pub created: AtomicUsize,
    }

    impl MockFactory {
        pub fn shared() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn failing() -> Arc<Self> {
            let factory = Self::default();
            factory.fail.store(true, Ordering::Relaxed);
            Arc::new(factory)
        }
    }

    impl AcceleratedSurfaceFactory for MockFactory {
        fn create(&self, width: u32, height: u32) -> Result<Box<dyn AcceleratedSurface>, SurfaceError> {
            if self.fail.load(Ordering::Relaxed) {
                return Err(SurfaceError::DeviceRequest("mock device lost".to_string()));
            }
            self.created.fetch_add(1, Ordering::Relaxed);
            Ok(Box::new(MockSurface {
                size: (width, height),
                ..Default::default()
            }))
        }
    }
}
