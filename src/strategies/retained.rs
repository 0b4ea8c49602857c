//! Retained-mode drawing
//!
//! Keeps one drawing group alive across frames. Each frame the group is
//! reopened, every segment is recorded into it, and the closed recording is
//! composited into the sink with a single call.

use super::{FrameContext, RenderStrategy, StrategyKind};
use crate::drawing::{DrawingGroup, DrawingSink};

#[derive(Default)]
pub struct RetainedStrategy {
    group: DrawingGroup,
}

impl RetainedStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group(&self) -> &DrawingGroup {
        &self.group
    }
}

impl RenderStrategy for RetainedStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::RetainedSurface
    }

    fn render(&mut self, frame: &mut FrameContext<'_>, sink: &mut dyn DrawingSink) {
        let pens = frame.frozen_pens();
        frame.advance_particles();

        let mut context = self.group.open();
        for particle in frame.pool.particles() {
            context.draw_line(&pens[particle.palette_index], particle.previous, particle.current);
        }
        context.close();

        sink.draw_drawing(&self.group);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::{CommandRecorder, DrawCommand};
    use crate::strategies::test_support::Fixture;

    #[test]
    fn test_single_composite_per_frame() {
        let mut fixture = Fixture::new(200, 12);
        let mut strategy = RetainedStrategy::new();
        let mut sink = CommandRecorder::new();

        for _ in 0..3 {
            sink.clear();
            strategy.render(&mut fixture.frame(), &mut sink);
            assert_eq!(sink.stats().draw_calls, 1);
            assert!(matches!(
                &sink.commands()[0],
                DrawCommand::Drawing { segments } if segments.len() == 200
            ));
        }

        assert_eq!(strategy.group().revision(), 3);
        assert_eq!(strategy.group().len(), 200);
        assert!(!strategy.group().is_open());
    }
}
