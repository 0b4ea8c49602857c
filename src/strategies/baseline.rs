//! Naive immediate drawing
//!
//! Fresh mutable pens every frame and one sink call per particle. This is the
//! slow reference point, so it switches itself off above a population limit.

use log::warn;

use super::{FrameContext, RenderStrategy, StrategyKind};
use crate::drawing::DrawingSink;

/// Population above which the baseline strategy stops drawing
pub const DEFAULT_PARTICLE_LIMIT: usize = 3000;

pub struct BaselineStrategy {
    particle_limit: usize,
    warned: bool,
}

impl BaselineStrategy {
    pub fn new(particle_limit: usize) -> Self {
        Self {
            particle_limit,
            warned: false,
        }
    }

    /// Whether a pool of `population` particles is drawn at all
    pub fn is_enabled_for(&self, population: usize) -> bool {
        population <= self.particle_limit
    }
}

impl Default for BaselineStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_PARTICLE_LIMIT)
    }
}

impl RenderStrategy for BaselineStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Baseline
    }

    fn render(&mut self, frame: &mut FrameContext<'_>, sink: &mut dyn DrawingSink) {
        if !self.is_enabled_for(frame.pool.len()) {
            if !self.warned {
                warn!(
                    "Baseline strategy disabled: {} particles exceeds the limit of {}",
                    frame.pool.len(),
                    self.particle_limit
                );
                self.warned = true;
            }
            return;
        }

        let pens = frame.mutable_pens();
        frame.advance_particles();
        for particle in frame.pool.particles() {
            sink.draw_line(&pens[particle.palette_index], particle.previous, particle.current);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::{CommandRecorder, DrawCommand};
    use crate::strategies::test_support::Fixture;

    #[test]
    fn test_one_line_per_particle_with_mutable_pens() {
        let mut fixture = Fixture::new(100, 9);
        let mut strategy = BaselineStrategy::default();
        let mut sink = CommandRecorder::new();

        strategy.render(&mut fixture.frame(), &mut sink);

        assert_eq!(sink.stats().draw_calls, 100);
        assert!(sink
            .commands()
            .iter()
            .all(|c| matches!(c, DrawCommand::Line(_))));
        let segments = sink.segments();
        assert_eq!(segments[3].color, fixture.palette.color(3));
        assert_eq!(segments[11].color, fixture.palette.color(3));
    }

    #[test]
    fn test_disabled_above_limit() {
        let mut fixture = Fixture::new(50, 9);
        let before = fixture.pool.particles().to_vec();
        let mut strategy = BaselineStrategy::new(20);
        let mut sink = CommandRecorder::new();

        strategy.render(&mut fixture.frame(), &mut sink);

        assert!(!strategy.is_enabled_for(50));
        assert!(sink.commands().is_empty());
        assert_eq!(fixture.pool.particles(), before.as_slice());
    }
}
