//! Error types for strokebench
//!
//! The benchmark is a closed loop over in-memory data, so the only failures
//! come from allocating host surfaces and from bad launch configuration.

use thiserror::Error;

use crate::strategies::StrategyKind;

/// Failures while creating or resizing a drawing surface
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("invalid surface bounds: {width}x{height}")]
    InvalidBounds { width: f64, height: f64 },

    #[error("surface of {width}x{height} exceeds the device limit of {limit}")]
    TextureTooLarge { width: u32, height: u32, limit: u32 },

    #[error("no graphics adapter available: {0}")]
    AdapterUnavailable(String),

    #[error("failed to request graphics device: {0}")]
    DeviceRequest(String),

    #[error("surface allocation failed: {0}")]
    Allocation(String),

    #[error("accelerated surfaces are not supported here: {0}")]
    Unsupported(String),
}

/// The main error type for benchmark operations
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("failed to set up the {strategy} strategy")]
    StrategySetup {
        strategy: StrategyKind,
        #[source]
        source: SurfaceError,
    },

    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for benchmark operations
pub type Result<T> = std::result::Result<T, BenchError>;
