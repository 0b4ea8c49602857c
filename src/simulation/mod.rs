// src/simulation/mod.rs
//! Particle simulation
//!
//! The shared workload every render strategy draws: a fixed pool of
//! random-walking line segments and the per-frame color palette.

pub mod palette;
pub mod particle;

pub use palette::{Color, Palette, Swatch, PALETTE_SIZE};
pub use particle::{Bounds, Particle, ParticlePool, MAX_AGE};
