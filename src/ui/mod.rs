//! # User Interface Module
//!
//! Dear ImGui overlay drawn on top of the benchmark frame.
//!
//! - [`UiManager`] - ImGui integration with winit and wgpu, input capture
//! - [`strategy_panel`] - strategy picker with frame rate and draw statistics
//!
//! The panel never switches strategies itself. It reports the user's choice
//! and the host applies it before the next frame, so the strategy in use
//! never changes while a frame is being drawn.

pub mod manager;
pub mod panel;

// Re-export main types
pub use manager::UiManager;
pub use panel::{strategy_panel, OverlayState};
