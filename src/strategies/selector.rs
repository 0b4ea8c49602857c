//! Strategy selector
//!
//! Owns the active strategy and its lifecycle. Switching tears the previous
//! strategy down before the next one is set up, so at most one strategy's
//! size-dependent resources are alive at any time.

use std::sync::Arc;

use log::{debug, error, info};

use super::{
    AcceleratedStrategy, AcceleratedSurfaceFactory, BaselineStrategy, BatchedStrategy, FrameContext,
    ImmutableResourceStrategy, LiveResources, PixelBufferStrategy, RenderStrategy, ResourceLedger,
    RetainedStrategy, StrategyKind, Viewport,
};
use super::baseline::DEFAULT_PARTICLE_LIMIT;
use crate::drawing::DrawingSink;
use crate::error::{BenchError, Result, SurfaceError};

/// Switches between render strategies and manages their resources
pub struct StrategySelector {
    active: Option<Box<dyn RenderStrategy>>,
    factory: Arc<dyn AcceleratedSurfaceFactory>,
    ledger: ResourceLedger,
    viewport: Viewport,
    baseline_limit: usize,
}

impl StrategySelector {
    /// Create a selector with no active strategy
    ///
    /// # Arguments
    /// * `viewport` - Initial host geometry used for resource setup
    /// * `factory` - Source of accelerated surfaces
    pub fn new(viewport: Viewport, factory: Arc<dyn AcceleratedSurfaceFactory>) -> Self {
        Self {
            active: None,
            factory,
            ledger: ResourceLedger::new(),
            viewport,
            baseline_limit: DEFAULT_PARTICLE_LIMIT,
        }
    }

    pub fn with_baseline_limit(mut self, limit: usize) -> Self {
        self.baseline_limit = limit;
        self
    }

    /// Currently active strategy, `None` when nothing is drawn
    pub fn kind(&self) -> StrategyKind {
        self.active
            .as_ref()
            .map_or(StrategyKind::None, |strategy| strategy.kind())
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    pub fn live_resources(&self) -> LiveResources {
        self.ledger.snapshot()
    }

    /// Activate `kind`, releasing the previous strategy first
    ///
    /// Selecting the active strategy again does nothing. When setup fails the
    /// selector falls back to [`StrategyKind::None`] and returns the error.
    pub fn select(&mut self, kind: StrategyKind) -> Result<()> {
        if kind == self.kind() {
            return Ok(());
        }

        self.detach();

        match self.build(kind) {
            Ok(strategy) => {
                if strategy.is_some() {
                    info!("Activated {kind} strategy");
                }
                self.active = strategy;
                Ok(())
            }
            Err(source) => {
                error!("Failed to set up {kind} strategy: {source}");
                Err(BenchError::StrategySetup {
                    strategy: kind,
                    source,
                })
            }
        }
    }

    /// Apply a host size change to the active strategy
    pub fn resize(&mut self, viewport: Viewport) -> Result<()> {
        debug!(
            "Resize to {}x{} at scale {}",
            viewport.bounds.width, viewport.bounds.height, viewport.scale_factor
        );
        self.viewport = viewport;

        let Some(strategy) = self.active.as_mut() else {
            return Ok(());
        };
        if let Err(source) = strategy.resize(viewport) {
            let kind = strategy.kind();
            error!("Failed to resize {kind} strategy: {source}");
            self.detach();
            return Err(BenchError::StrategySetup {
                strategy: kind,
                source,
            });
        }
        Ok(())
    }

    /// Draw one frame with the active strategy
    ///
    /// With no active strategy nothing is drawn and the particles stay put.
    pub fn render(&mut self, frame: &mut FrameContext<'_>, sink: &mut dyn DrawingSink) {
        if let Some(strategy) = self.active.as_mut() {
            strategy.render(frame, sink);
        }
    }

    fn detach(&mut self) {
        if let Some(mut strategy) = self.active.take() {
            debug!("Tearing down {} strategy", strategy.kind());
            strategy.teardown();
        }
    }

    fn build(
        &self,
        kind: StrategyKind,
    ) -> std::result::Result<Option<Box<dyn RenderStrategy>>, SurfaceError> {
        let strategy: Box<dyn RenderStrategy> = match kind {
            StrategyKind::None => return Ok(None),
            StrategyKind::Baseline => Box::new(BaselineStrategy::new(self.baseline_limit)),
            StrategyKind::ImmutableResource => Box::new(ImmutableResourceStrategy::new()),
            StrategyKind::BatchedByAttribute => Box::new(BatchedStrategy::new()),
            StrategyKind::RetainedSurface => Box::new(RetainedStrategy::new()),
            StrategyKind::PixelBuffer => {
                Box::new(PixelBufferStrategy::new(self.viewport, self.ledger.clone())?)
            }
            StrategyKind::AcceleratedSurface => Box::new(AcceleratedStrategy::new(
                self.viewport,
                Arc::clone(&self.factory),
                self.ledger.clone(),
            )?),
        };
        Ok(Some(strategy))
    }
}

impl Drop for StrategySelector {
    fn drop(&mut self) {
        self.detach();
    }
}
