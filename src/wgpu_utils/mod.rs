// src/wgpu_utils/mod.rs
//! WGPU utility functions and helpers
//!
//! Small wrappers for the buffers and binding types the renderer repeats.

pub mod binding_types;
pub mod uniform_buffer;

pub use uniform_buffer::{UniformBuffer, VertexArrayBuffer};
