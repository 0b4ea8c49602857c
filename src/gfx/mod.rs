//! # Graphics Module
//!
//! The GPU host for the benchmark: everything needed to put a strategy's draw
//! commands on screen through wgpu.
//!
//! ## Architecture Overview
//!
//! - **Render Engine** ([`render_engine`]) - surface, device and the per-frame pass
//! - **Frame Sink** ([`frame_sink`]) - [`DrawingSink`] that tessellates lines and
//!   collects the frame's composite layer
//! - **Pipelines** ([`line_pipeline`], [`blit_pipeline`]) - stroked lines and
//!   full-surface texture composites
//! - **Accelerated Targets** ([`accelerated`]) - offscreen textures backing the
//!   accelerated strategy
//!
//! [`DrawingSink`]: crate::drawing::DrawingSink

pub mod accelerated;
pub mod blit_pipeline;
pub mod frame_sink;
pub mod line_pipeline;
pub mod render_engine;

// Re-export commonly used types
pub use accelerated::{GpuRenderTarget, GpuSurfaceFactory};
pub use frame_sink::GpuFrameSink;
pub use render_engine::RenderEngine;
