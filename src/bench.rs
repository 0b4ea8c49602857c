//! The benchmark core driven by the host
//!
//! [`DrawBenchmark`] owns the particle pool, the random source, the frame
//! counter and the strategy selector. The host calls [`DrawBenchmark::on_frame`]
//! once per redraw and [`DrawBenchmark::on_resize`] when its surface changes
//! size; both run on the host's render thread.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::BenchConfig;
use crate::drawing::{CountingSink, DrawStats, DrawingSink};
use crate::error::Result;
use crate::performance::{compute_fps, FrameCounter, FrameRateMonitor, StrategyTag};
use crate::simulation::{Bounds, Palette, ParticlePool};
use crate::strategies::{
    AcceleratedSurfaceFactory, FrameContext, LiveResources, StrategyKind, StrategySelector, Viewport,
};

pub struct DrawBenchmark {
    config: BenchConfig,
    pool: ParticlePool,
    rng: StdRng,
    counter: FrameCounter,
    selector: StrategySelector,
    strategy_tag: StrategyTag,
}

impl DrawBenchmark {
    /// Build the core and activate the configured initial strategy
    ///
    /// # Arguments
    /// * `config` - Validated before anything is allocated
    /// * `factory` - Accelerated surface source offered by the host
    pub fn new(config: BenchConfig, factory: Arc<dyn AcceleratedSurfaceFactory>) -> Result<Self> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let pool = ParticlePool::new(config.particle_count, config.max_age, &mut rng);
        let selector = StrategySelector::new(Viewport::new(config.initial_bounds, 1.0), factory)
            .with_baseline_limit(config.baseline_particle_limit);

        let mut bench = Self {
            config,
            pool,
            rng,
            counter: FrameCounter::new(),
            selector,
            strategy_tag: StrategyTag::default(),
        };
        let initial = bench.config.initial_strategy;
        bench.set_strategy(initial)?;
        Ok(bench)
    }

    /// Render one frame into `sink` and count it
    ///
    /// The frame is counted even when no strategy is active.
    pub fn on_frame(&mut self, sink: &mut dyn DrawingSink) -> DrawStats {
        let palette = Palette::generate(self.counter.get());
        let mut frame = FrameContext {
            pool: &mut self.pool,
            viewport: self.selector.viewport(),
            palette: &palette,
            rng: &mut self.rng,
            pen_thickness: self.config.pen_thickness,
        };
        self.selector.render(&mut frame, sink);
        self.counter.increment();
        sink.stats()
    }

    /// Host size change, in logical units plus the device pixel ratio
    pub fn on_resize(&mut self, width: f64, height: f64, scale_factor: f64) -> Result<()> {
        let result = self
            .selector
            .resize(Viewport::new(Bounds::new(width, height), scale_factor));
        self.strategy_tag.set(self.selector.kind());
        result
    }

    /// Switch strategies; on failure the benchmark falls back to `None`
    pub fn set_strategy(&mut self, kind: StrategyKind) -> Result<()> {
        let result = self.selector.select(kind);
        self.strategy_tag.set(self.selector.kind());
        result
    }

    pub fn strategy(&self) -> StrategyKind {
        self.selector.kind()
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    pub fn viewport(&self) -> Viewport {
        self.selector.viewport()
    }

    /// Shared handle to the frame counter, for the monitor thread
    pub fn frame_counter(&self) -> FrameCounter {
        self.counter.clone()
    }

    pub fn strategy_tag(&self) -> StrategyTag {
        self.strategy_tag.clone()
    }

    pub fn live_resources(&self) -> LiveResources {
        self.selector.live_resources()
    }
}

/// Throughput of one strategy in a headless run
#[derive(Debug, Clone)]
pub struct HeadlessReport {
    pub strategy: StrategyKind,
    pub frames: u64,
    pub fps: f64,
    /// Draw statistics of the last frame
    pub last_frame: DrawStats,
    /// Set when the strategy could not be set up
    pub setup_error: Option<String>,
}

/// Run every drawing strategy for `duration` against a counting sink
///
/// Each strategy gets a fresh pool built from the same configuration. The
/// accelerated strategy is attempted with `factory` and reported as skipped
/// when it cannot be set up.
pub fn run_headless(
    config: &BenchConfig,
    factory: Arc<dyn AcceleratedSurfaceFactory>,
    duration: Duration,
) -> Result<Vec<HeadlessReport>> {
    config.validate()?;
    let mut reports = Vec::new();

    for kind in StrategyKind::ALL.into_iter().filter(|k| *k != StrategyKind::None) {
        let mut bench = DrawBenchmark::new(
            config.clone().with_strategy(StrategyKind::None),
            Arc::clone(&factory),
        )?;
        if let Err(err) = bench.set_strategy(kind) {
            warn!("Skipping {kind}: {err}");
            reports.push(HeadlessReport {
                strategy: kind,
                frames: 0,
                fps: 0.0,
                last_frame: DrawStats::default(),
                setup_error: Some(err.to_string()),
            });
            continue;
        }

        let mut monitor = FrameRateMonitor::new(bench.frame_counter(), config.sample_interval)
            .with_strategy_tag(bench.strategy_tag());
        monitor.start();

        let mut sink = CountingSink::new();
        let mut last_frame = DrawStats::default();
        let start = Instant::now();
        while start.elapsed() < duration {
            sink.reset_frame();
            last_frame = bench.on_frame(&mut sink);
        }
        let elapsed = start.elapsed();
        monitor.stop();

        let frames = bench.frame_counter().get();
        let fps = compute_fps(frames, elapsed);
        info!(
            "{kind}: {frames} frames in {:.2}s, FPS: {fps:.1}, {} draw calls per frame",
            elapsed.as_secs_f64(),
            last_frame.draw_calls
        );
        reports.push(HeadlessReport {
            strategy: kind,
            frames,
            fps,
            last_frame,
            setup_error: None,
        });
    }

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drawing::CommandRecorder;
    use crate::error::BenchError;
    use crate::strategies::accelerated::mock::MockFactory;
    use crate::strategies::NoAcceleration;

    fn config(count: usize) -> BenchConfig {
        BenchConfig::default()
            .with_particle_count(count)
            .with_seed(Some(42))
    }

    #[test]
    fn test_frames_counted_without_strategy() {
        let mut bench = DrawBenchmark::new(config(50), Arc::new(NoAcceleration)).unwrap();
        let before = bench.pool().particles().to_vec();
        let mut sink = CommandRecorder::new();

        for _ in 0..3 {
            bench.on_frame(&mut sink);
        }

        assert_eq!(bench.frame_counter().get(), 3);
        assert_eq!(bench.strategy(), StrategyKind::None);
        assert_eq!(bench.pool().particles(), before.as_slice());
        assert!(sink.commands().is_empty());
    }

    #[test]
    fn test_palette_follows_frame_counter() {
        let mut bench = DrawBenchmark::new(
            config(16).with_strategy(StrategyKind::BatchedByAttribute),
            Arc::new(NoAcceleration),
        )
        .unwrap();
        let mut sink = CommandRecorder::new();

        bench.on_frame(&mut sink);
        sink.clear();
        bench.on_frame(&mut sink);

        let expected = Palette::generate(1);
        match &sink.commands()[0] {
            crate::drawing::DrawCommand::Geometry { color, .. } => {
                assert_eq!(*color, expected.color(0));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = DrawBenchmark::new(
            config(100).with_strategy(StrategyKind::Baseline),
            Arc::new(NoAcceleration),
        )
        .unwrap();
        let mut b = DrawBenchmark::new(
            config(100).with_strategy(StrategyKind::RetainedSurface),
            Arc::new(NoAcceleration),
        )
        .unwrap();
        let mut sink_a = CommandRecorder::new();
        let mut sink_b = CommandRecorder::new();

        for _ in 0..5 {
            a.on_frame(&mut sink_a);
            b.on_frame(&mut sink_b);
        }

        assert_eq!(a.pool().particles(), b.pool().particles());
        assert_eq!(sink_a.segments(), sink_b.segments());
    }

    #[test]
    fn test_strategy_switch_and_resize() {
        let mut bench = DrawBenchmark::new(config(20), MockFactory::shared()).unwrap();

        bench.set_strategy(StrategyKind::AcceleratedSurface).unwrap();
        assert_eq!(bench.strategy_tag().get(), StrategyKind::AcceleratedSurface);
        bench.on_resize(500.0, 400.0, 2.0).unwrap();
        assert_eq!(bench.viewport().device_pixels(), Some((1000, 800)));

        bench.set_strategy(StrategyKind::PixelBuffer).unwrap();
        assert_eq!(
            bench.live_resources(),
            LiveResources {
                pixel_buffers: 1,
                accelerated_surfaces: 0
            }
        );
    }

    #[test]
    fn test_failed_initial_strategy_is_reported() {
        let result = DrawBenchmark::new(
            config(20).with_strategy(StrategyKind::AcceleratedSurface),
            Arc::new(NoAcceleration),
        );
        assert!(matches!(result, Err(BenchError::StrategySetup { .. })));

        assert!(matches!(
            DrawBenchmark::new(config(0), Arc::new(NoAcceleration)),
            Err(BenchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_headless_covers_every_strategy() {
        let config = config(200).with_sample_interval(Duration::from_millis(5));
        let reports = run_headless(&config, Arc::new(NoAcceleration), Duration::from_millis(20)).unwrap();

        assert_eq!(reports.len(), 6);
        for report in &reports {
            if report.strategy == StrategyKind::AcceleratedSurface {
                assert!(report.setup_error.is_some());
            } else {
                assert!(report.setup_error.is_none());
                assert!(report.frames > 0);
            }
        }
        let batched = reports
            .iter()
            .find(|r| r.strategy == StrategyKind::BatchedByAttribute)
            .unwrap();
        assert_eq!(batched.last_frame.draw_calls, 8);
    }
}
