//! Direct pixel-buffer rasterization
//!
//! Owns an RGBA buffer sized to the host's device pixels. Each frame clears it,
//! rasterizes every segment with the software line drawer and hands the whole
//! buffer to the sink as one image. No vector draw calls are issued.

use log::{debug, warn};

use super::{FrameContext, RenderStrategy, ResourceKind, ResourceLease, ResourceLedger, StrategyKind, Viewport};
use crate::drawing::DrawingSink;
use crate::error::SurfaceError;
use crate::raster::PixelBuffer;

/// Largest buffer side the host can upload as a single texture
pub const MAX_BUFFER_DIMENSION: u32 = 8192;

pub struct PixelBufferStrategy {
    target: Option<(PixelBuffer, ResourceLease)>,
    ledger: ResourceLedger,
    scale_factor: f64,
}

impl PixelBufferStrategy {
    /// Create the strategy and allocate its buffer for `viewport`
    ///
    /// Degenerate bounds leave the strategy without a buffer until the next
    /// resize with positive bounds. Bounds larger than
    /// [`MAX_BUFFER_DIMENSION`] device pixels on either side are rejected.
    pub fn new(viewport: Viewport, ledger: ResourceLedger) -> Result<Self, SurfaceError> {
        let mut strategy = Self {
            target: None,
            ledger,
            scale_factor: viewport.scale_factor,
        };
        strategy.allocate(viewport)?;
        Ok(strategy)
    }

    pub fn buffer(&self) -> Option<&PixelBuffer> {
        self.target.as_ref().map(|(buffer, _)| buffer)
    }

    fn allocate(&mut self, viewport: Viewport) -> Result<(), SurfaceError> {
        self.scale_factor = viewport.scale_factor;
        let Some((width, height)) = viewport.device_pixels() else {
            warn!(
                "Skipping pixel buffer allocation for degenerate bounds {}x{}",
                viewport.bounds.width, viewport.bounds.height
            );
            return Ok(());
        };
        if width > MAX_BUFFER_DIMENSION || height > MAX_BUFFER_DIMENSION {
            return Err(SurfaceError::TextureTooLarge {
                width,
                height,
                limit: MAX_BUFFER_DIMENSION,
            });
        }
        if let Some((buffer, _)) = &self.target {
            if buffer.width() == width && buffer.height() == height {
                return Ok(());
            }
        }

        // Release the old buffer before allocating its replacement
        self.target = None;
        debug!("Allocating {width}x{height} pixel buffer");
        let lease = self.ledger.acquire(ResourceKind::PixelBuffer);
        self.target = Some((PixelBuffer::new(width, height), lease));
        Ok(())
    }
}

impl RenderStrategy for PixelBufferStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::PixelBuffer
    }

    fn render(&mut self, frame: &mut FrameContext<'_>, sink: &mut dyn DrawingSink) {
        frame.advance_particles();

        let Some((buffer, _)) = self.target.as_mut() else {
            return;
        };
        let scale = self.scale_factor;
        buffer.clear();
        for particle in frame.pool.particles() {
            buffer.draw_line_aa(
                particle.previous.x * scale,
                particle.previous.y * scale,
                particle.current.x * scale,
                particle.current.y * scale,
                frame.palette.color(particle.palette_index),
            );
        }
        sink.draw_image(buffer);
    }

    fn resize(&mut self, viewport: Viewport) -> Result<(), SurfaceError> {
        self.allocate(viewport)
    }

    fn teardown(&mut self) {
        if self.target.take().is_some() {
            debug!("Released pixel buffer");
        }
    }
}
