//! # Render Strategies
//!
//! Six interchangeable ways of drawing the same particle workload. Every
//! strategy runs the shared particle update once per frame and differs only
//! in how draw commands reach the sink and how drawing resources live:
//!
//! | Strategy | Sink calls per frame | Resources |
//! |---|---|---|
//! | Baseline | one per particle | fresh mutable pens every frame |
//! | Immutable-Resource | one per particle | fresh frozen pens every frame |
//! | Batched-by-Attribute | one per palette slot | frozen pens, reused path buffers |
//! | Retained-Surface | one | persistent drawing group |
//! | Pixel-Buffer | one image | owned RGBA buffer, resized with the host |
//! | Accelerated-Surface | one surface | hardware surface and brush table |
//!
//! Only one strategy is active at a time; [`selector::StrategySelector`]
//! owns the switching and the lifecycle of size-dependent resources.

pub mod accelerated;
pub mod baseline;
pub mod batched;
pub mod immutable;
pub mod ledger;
pub mod pixel_buffer;
pub mod retained;
pub mod selector;

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;

use crate::drawing::{DrawingSink, Pen, SolidColorBrush};
use crate::error::{BenchError, SurfaceError};
use crate::simulation::{Bounds, Palette, ParticlePool, PALETTE_SIZE};

pub use accelerated::{
    AcceleratedStrategy, AcceleratedSurface, AcceleratedSurfaceFactory, BrushId, NoAcceleration,
};
pub use baseline::BaselineStrategy;
pub use batched::BatchedStrategy;
pub use immutable::ImmutableResourceStrategy;
pub use ledger::{LiveResources, ResourceKind, ResourceLease, ResourceLedger};
pub use pixel_buffer::PixelBufferStrategy;
pub use retained::RetainedStrategy;
pub use selector::StrategySelector;

/// Which drawing strategy is active
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    #[default]
    None,
    Baseline,
    ImmutableResource,
    BatchedByAttribute,
    RetainedSurface,
    PixelBuffer,
    AcceleratedSurface,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 7] = [
        StrategyKind::None,
        StrategyKind::Baseline,
        StrategyKind::ImmutableResource,
        StrategyKind::BatchedByAttribute,
        StrategyKind::RetainedSurface,
        StrategyKind::PixelBuffer,
        StrategyKind::AcceleratedSurface,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::None => "None",
            StrategyKind::Baseline => "Baseline",
            StrategyKind::ImmutableResource => "Immutable Resource",
            StrategyKind::BatchedByAttribute => "Batched by Attribute",
            StrategyKind::RetainedSurface => "Retained Surface",
            StrategyKind::PixelBuffer => "Pixel Buffer",
            StrategyKind::AcceleratedSurface => "Accelerated Surface",
        }
    }

    /// Short name accepted on the command line
    pub fn slug(&self) -> &'static str {
        match self {
            StrategyKind::None => "none",
            StrategyKind::Baseline => "baseline",
            StrategyKind::ImmutableResource => "immutable",
            StrategyKind::BatchedByAttribute => "batched",
            StrategyKind::RetainedSurface => "retained",
            StrategyKind::PixelBuffer => "pixel-buffer",
            StrategyKind::AcceleratedSurface => "accelerated",
        }
    }

    /// Position in [`StrategyKind::ALL`], also the number-key shortcut
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|k| k == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.slug() == wanted || kind.as_str().to_ascii_lowercase().replace(' ', "-") == wanted)
            .ok_or_else(|| BenchError::UnknownStrategy(s.to_string()))
    }
}

/// Host surface geometry: logical bounds plus the device pixel ratio
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub bounds: Bounds,
    pub scale_factor: f64,
}

impl Viewport {
    pub fn new(bounds: Bounds, scale_factor: f64) -> Self {
        let scale_factor = if scale_factor.is_finite() && scale_factor > 0.0 {
            scale_factor
        } else {
            1.0
        };
        Self {
            bounds,
            scale_factor,
        }
    }

    /// Size in whole device pixels, `None` while the bounds are degenerate
    pub fn device_pixels(&self) -> Option<(u32, u32)> {
        self.bounds.device_pixels(self.scale_factor)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Bounds::default(), 1.0)
    }
}

/// Everything a strategy may touch while drawing one frame
pub struct FrameContext<'a> {
    pub pool: &'a mut ParticlePool,
    pub viewport: Viewport,
    pub palette: &'a Palette,
    pub rng: &'a mut StdRng,
    pub pen_thickness: f32,
}

impl FrameContext<'_> {
    /// Run the shared per-frame particle update
    pub fn advance_particles(&mut self) {
        self.pool
            .advance(self.viewport.bounds, PALETTE_SIZE, &mut *self.rng);
    }

    /// One new mutable pen per palette slot
    pub fn mutable_pens(&self) -> [Pen; PALETTE_SIZE] {
        self.palette
            .colors()
            .map(|color| Pen::new(SolidColorBrush::new(color), self.pen_thickness))
    }

    /// One new frozen pen per palette slot
    pub fn frozen_pens(&self) -> [Pen; PALETTE_SIZE] {
        self.palette
            .colors()
            .map(|color| Pen::frozen(color, self.pen_thickness))
    }
}

/// Shared contract of every drawing strategy
pub trait RenderStrategy {
    fn kind(&self) -> StrategyKind;

    /// Advance the particles and draw the frame into `sink`
    fn render(&mut self, frame: &mut FrameContext<'_>, sink: &mut dyn DrawingSink);

    /// React to a host size change
    fn resize(&mut self, _viewport: Viewport) -> Result<(), SurfaceError> {
        Ok(())
    }

    /// Release strategy-owned resources before the strategy is dropped
    fn teardown(&mut self) {}
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parses_slugs_and_names() {
        assert_eq!("batched".parse::<StrategyKind>().unwrap(), StrategyKind::BatchedByAttribute);
        assert_eq!("Pixel Buffer".parse::<StrategyKind>().unwrap(), StrategyKind::PixelBuffer);
        assert_eq!("pixel_buffer".parse::<StrategyKind>().unwrap(), StrategyKind::PixelBuffer);
        assert_eq!("ACCELERATED".parse::<StrategyKind>().unwrap(), StrategyKind::AcceleratedSurface);
        assert!(matches!(
            "vector".parse::<StrategyKind>(),
            Err(BenchError::UnknownStrategy(_))
        ));
    }

    #[test]
    fn test_kind_index_round_trip() {
        for kind in StrategyKind::ALL {
            assert_eq!(StrategyKind::from_index(kind.index()), Some(kind));
        }
        assert_eq!(StrategyKind::from_index(7), None);
    }

    #[test]
    fn test_viewport_rejects_bad_scale() {
        let viewport = Viewport::new(Bounds::new(100.0, 50.0), f64::NAN);
        assert_eq!(viewport.scale_factor, 1.0);
        assert_eq!(Viewport::new(Bounds::new(100.0, 50.0), 2.0).device_pixels(), Some((200, 100)));
        assert_eq!(Viewport::new(Bounds::new(0.0, 50.0), 2.0).device_pixels(), None);
    }
}
