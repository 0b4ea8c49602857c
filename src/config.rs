//! Benchmark configuration
//!
//! Plain settings with builder-style setters. Every field has the default the
//! benchmark was tuned with; the command line overrides only what it names.

use std::time::Duration;

use crate::drawing::DEFAULT_PEN_THICKNESS;
use crate::error::{BenchError, Result};
use crate::performance::DEFAULT_SAMPLE_INTERVAL;
use crate::simulation::{Bounds, MAX_AGE};
use crate::strategies::baseline::DEFAULT_PARTICLE_LIMIT;
use crate::strategies::StrategyKind;

pub const DEFAULT_PARTICLE_COUNT: usize = 10_000;

#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
    /// Particles in the shared pool
    pub particle_count: usize,
    /// Age after which a particle respawns
    pub max_age: u32,
    pub pen_thickness: f32,
    /// Population above which the baseline strategy draws nothing
    pub baseline_particle_limit: usize,
    pub initial_strategy: StrategyKind,
    /// Fixed RNG seed; fresh entropy when `None`
    pub seed: Option<u64>,
    pub sample_interval: Duration,
    /// Pause between frames handed back to the host
    pub frame_yield: Duration,
    /// Bounds used until the host reports its real size
    pub initial_bounds: Bounds,
    /// Logical window size in windowed mode
    pub window_size: (u32, u32),
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLE_COUNT,
            max_age: MAX_AGE,
            pen_thickness: DEFAULT_PEN_THICKNESS,
            baseline_particle_limit: DEFAULT_PARTICLE_LIMIT,
            initial_strategy: StrategyKind::None,
            seed: None,
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            frame_yield: Duration::from_millis(1),
            initial_bounds: Bounds::default(),
            window_size: (1200, 800),
        }
    }
}

impl BenchConfig {
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    pub fn with_max_age(mut self, max_age: u32) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn with_pen_thickness(mut self, thickness: f32) -> Self {
        self.pen_thickness = thickness;
        self
    }

    pub fn with_baseline_limit(mut self, limit: usize) -> Self {
        self.baseline_particle_limit = limit;
        self
    }

    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.initial_strategy = strategy;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_sample_interval(mut self, interval: Duration) -> Self {
        self.sample_interval = interval;
        self
    }

    pub fn with_frame_yield(mut self, frame_yield: Duration) -> Self {
        self.frame_yield = frame_yield;
        self
    }

    pub fn with_initial_bounds(mut self, bounds: Bounds) -> Self {
        self.initial_bounds = bounds;
        self
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    /// Reject settings the benchmark cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.particle_count == 0 {
            return Err(BenchError::InvalidConfig(
                "particle count must be at least 1".to_string(),
            ));
        }
        if self.sample_interval.is_zero() {
            return Err(BenchError::InvalidConfig(
                "sample interval must be positive".to_string(),
            ));
        }
        if !(self.pen_thickness.is_finite() && self.pen_thickness > 0.0) {
            return Err(BenchError::InvalidConfig(format!(
                "pen thickness must be positive, got {}",
                self.pen_thickness
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BenchConfig::default();
        assert_eq!(config.particle_count, 10_000);
        assert_eq!(config.max_age, 100);
        assert_eq!(config.baseline_particle_limit, 3000);
        assert_eq!(config.initial_strategy, StrategyKind::None);
        assert_eq!(config.sample_interval, Duration::from_millis(1000));
        assert_eq!(config.initial_bounds, Bounds::new(1000.0, 1000.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unusable_settings() {
        let empty = BenchConfig::default().with_particle_count(0);
        assert!(matches!(empty.validate(), Err(BenchError::InvalidConfig(_))));

        let no_interval = BenchConfig::default().with_sample_interval(Duration::ZERO);
        assert!(matches!(no_interval.validate(), Err(BenchError::InvalidConfig(_))));

        let thin = BenchConfig::default().with_pen_thickness(f32::NAN);
        assert!(thin.validate().is_err());
    }
}
