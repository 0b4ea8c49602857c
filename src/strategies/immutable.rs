//! Immediate drawing with frozen resources
//!
//! Same draw pattern as the baseline, but every pen and brush is frozen right
//! after construction so the sink can skip revalidating them per draw.

use super::{FrameContext, RenderStrategy, StrategyKind};
use crate::drawing::DrawingSink;

#[derive(Default)]
pub struct ImmutableResourceStrategy;

impl ImmutableResourceStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl RenderStrategy for ImmutableResourceStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ImmutableResource
    }

    fn render(&mut self, frame: &mut FrameContext<'_>, sink: &mut dyn DrawingSink) {
        let pens = frame.frozen_pens();
        frame.advance_particles();
        for particle in frame.pool.particles() {
            sink.draw_line(&pens[particle.palette_index], particle.previous, particle.current);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::CommandRecorder;
    use crate::strategies::baseline::BaselineStrategy;
    use crate::strategies::test_support::Fixture;

    #[test]
    fn test_output_matches_baseline() {
        let mut baseline_fixture = Fixture::new(64, 21);
        let mut frozen_fixture = Fixture::new(64, 21);
        let mut baseline_sink = CommandRecorder::new();
        let mut frozen_sink = CommandRecorder::new();

        BaselineStrategy::default().render(&mut baseline_fixture.frame(), &mut baseline_sink);
        ImmutableResourceStrategy::new().render(&mut frozen_fixture.frame(), &mut frozen_sink);

        assert_eq!(baseline_sink.commands(), frozen_sink.commands());
    }
}
