//! Geometry batching by palette slot
//!
//! After the particle update every segment is appended, as its own open
//! figure, to the path of its palette slot. Each path is then stroked with a
//! single call, so the sink sees one call per slot instead of one per particle.
//! Only the grouped paths are drawn; no per-particle lines are issued.

use super::{FrameContext, RenderStrategy, StrategyKind};
use crate::drawing::{DrawingSink, PathGeometry};
use crate::simulation::PALETTE_SIZE;

pub struct BatchedStrategy {
    paths: [PathGeometry; PALETTE_SIZE],
}

impl BatchedStrategy {
    pub fn new() -> Self {
        Self {
            paths: std::array::from_fn(|_| PathGeometry::new()),
        }
    }
}

impl Default for BatchedStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderStrategy for BatchedStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::BatchedByAttribute
    }

    fn render(&mut self, frame: &mut FrameContext<'_>, sink: &mut dyn DrawingSink) {
        let pens = frame.frozen_pens();
        frame.advance_particles();

        for path in &mut self.paths {
            path.clear();
        }
        for particle in frame.pool.particles() {
            let path = &mut self.paths[particle.palette_index % PALETTE_SIZE];
            path.begin_figure(particle.previous);
            path.line_to(particle.current);
        }

        for (pen, path) in pens.iter().zip(&self.paths) {
            if !path.is_empty() {
                sink.draw_geometry(pen, path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::{CommandRecorder, DrawCommand, RecordedSegment};
    use crate::strategies::baseline::BaselineStrategy;
    use crate::strategies::test_support::Fixture;

    fn sorted(mut segments: Vec<RecordedSegment>) -> Vec<RecordedSegment> {
        segments.sort_by(|a, b| {
            (a.from.x, a.from.y, a.to.x, a.to.y)
                .partial_cmp(&(b.from.x, b.from.y, b.to.x, b.to.y))
                .unwrap()
        });
        segments
    }

    #[test]
    fn test_one_call_per_palette_slot() {
        let mut fixture = Fixture::new(1000, 4);
        let mut sink = CommandRecorder::new();

        BatchedStrategy::new().render(&mut fixture.frame(), &mut sink);

        assert_eq!(sink.stats().draw_calls, PALETTE_SIZE as u32);
        assert_eq!(sink.stats().segments, 1000);
        for (slot, command) in sink.commands().iter().enumerate() {
            match command {
                DrawCommand::Geometry { color, segments } => {
                    assert_eq!(*color, fixture.palette.color(slot));
                    assert_eq!(segments.len(), 125);
                }
                other => panic!("unexpected command {other:?}"),
            }
        }
    }

    #[test]
    fn test_same_segments_as_baseline() {
        let mut baseline_fixture = Fixture::new(300, 77);
        let mut batched_fixture = Fixture::new(300, 77);
        let mut baseline_sink = CommandRecorder::new();
        let mut batched_sink = CommandRecorder::new();

        BaselineStrategy::default().render(&mut baseline_fixture.frame(), &mut baseline_sink);
        BatchedStrategy::new().render(&mut batched_fixture.frame(), &mut batched_sink);

        assert_eq!(baseline_sink.stats().draw_calls, 300);
        assert_eq!(batched_sink.stats().draw_calls, 8);
        assert_eq!(
            sorted(baseline_sink.segments()),
            sorted(batched_sink.segments())
        );
        assert_eq!(
            baseline_fixture.pool.particles(),
            batched_fixture.pool.particles()
        );
    }

    #[test]
    fn test_small_pool_skips_empty_slots() {
        let mut fixture = Fixture::new(3, 4);
        let mut sink = CommandRecorder::new();

        BatchedStrategy::new().render(&mut fixture.frame(), &mut sink);

        assert_eq!(sink.stats().draw_calls, 3);
    }
}
