//! # strokebench Prelude
//!
//! Commonly used types in one import, for hosts embedding the benchmark core:
//!
//! ```no_run
//! use strokebench::prelude::*;
//!
//! let config = BenchConfig::default().with_seed(Some(7));
//! let mut bench = DrawBenchmark::new(config, std::sync::Arc::new(NoAcceleration))?;
//! bench.on_resize(800.0, 600.0, 1.0)?;
//! bench.set_strategy(StrategyKind::BatchedByAttribute)?;
//!
//! let mut sink = CountingSink::new();
//! let stats = bench.on_frame(&mut sink);
//! assert_eq!(stats.draw_calls, 8);
//! # Ok::<(), BenchError>(())
//! ```

// Benchmark core
pub use crate::bench::{run_headless, DrawBenchmark, HeadlessReport};
pub use crate::config::BenchConfig;
pub use crate::error::{BenchError, SurfaceError};

// Drawing model
pub use crate::drawing::{
    CommandRecorder, CountingSink, DrawStats, DrawingGroup, DrawingSink, PathGeometry, Pen,
    SolidColorBrush,
};
pub use crate::raster::PixelBuffer;
pub use crate::simulation::{Bounds, Color, Palette, Particle, ParticlePool, PALETTE_SIZE};

// Strategies
pub use crate::strategies::{
    AcceleratedSurface, AcceleratedSurfaceFactory, NoAcceleration, RenderStrategy, StrategyKind,
    StrategySelector, Viewport,
};

// Frame rate measurement
pub use crate::performance::{FpsGauge, FrameCounter, FrameRateMonitor};

// Windowed host
pub use crate::app::StrokeBenchApp;
