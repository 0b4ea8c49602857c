//! # Drawing Model
//!
//! The vocabulary render strategies use to talk to the host: pens and brushes
//! with freeze semantics, path geometry, a retained drawing group, and the
//! [`DrawingSink`] trait every host surface implements.

pub mod geometry;
pub mod group;
pub mod recorder;
pub mod resources;
pub mod sink;

pub use geometry::PathGeometry;
pub use group::{DrawingContext, DrawingGroup, LineCommand};
pub use recorder::{CommandRecorder, DrawCommand, RecordedSegment};
pub use resources::{Pen, SolidColorBrush, DEFAULT_PEN_THICKNESS};
pub use sink::{CountingSink, DrawStats, DrawingSink};
