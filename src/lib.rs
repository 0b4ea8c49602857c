// src/lib.rs
//! strokebench
//!
//! A line-drawing throughput benchmark. A pool of short-lived particles is
//! drawn every frame through one of several interchangeable strategies, and
//! the achieved frame rate is sampled once per second.
//!
//! The benchmark core ([`bench`], [`strategies`], [`simulation`]) is host
//! independent and draws into any [`drawing::DrawingSink`]. The windowed host
//! lives in [`app`] and [`gfx`] and is built on winit and wgpu.

pub mod app;
pub mod bench;
pub mod config;
pub mod drawing;
pub mod error;
pub mod gfx;
pub mod performance;
pub mod prelude;
pub mod raster;
pub mod simulation;
pub mod strategies;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::StrokeBenchApp;
pub use bench::{run_headless, DrawBenchmark, HeadlessReport};
pub use config::BenchConfig;
pub use error::{BenchError, Result, SurfaceError};
pub use strategies::StrategyKind;
