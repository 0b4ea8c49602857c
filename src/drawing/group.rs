//! Retained drawing group
//!
//! A `DrawingGroup` is a recording that outlives a single frame. Opening it
//! discards the previous contents and hands out a context that records new
//! draw commands; closing the context publishes the recording so it can be
//! composited into a sink as a whole.

use cgmath::Point2;

use super::resources::Pen;

/// A recorded line draw
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineCommand {
    pub pen: Pen,
    pub from: Point2<f64>,
    pub to: Point2<f64>,
}

#[derive(Clone, Debug, Default)]
pub struct DrawingGroup {
    commands: Vec<LineCommand>,
    /// Number of times the group has been closed
    revision: u64,
    open: bool,
}

impl DrawingGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reopen the group for recording, replacing its previous contents
    pub fn open(&mut self) -> DrawingContext<'_> {
        self.commands.clear();
        self.open = true;
        DrawingContext { group: self }
    }

    /// Recorded commands from the last closed recording
    pub fn commands(&self) -> &[LineCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

/// Recording context borrowed from an open `DrawingGroup`
///
/// Dropping the context closes the recording, same as `close`.
pub struct DrawingContext<'a> {
    group: &'a mut DrawingGroup,
}

impl DrawingContext<'_> {
    pub fn draw_line(&mut self, pen: &Pen, from: Point2<f64>, to: Point2<f64>) {
        self.group.commands.push(LineCommand {
            pen: *pen,
            from,
            to,
        });
    }

    pub fn close(self) {}
}

impl Drop for DrawingContext<'_> {
    fn drop(&mut self) {
        self.group.open = false;
        self.group.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::Color;

    #[test]
    fn test_reopen_replaces_contents() {
        let pen = Pen::frozen(Color::opaque(255, 0, 0), 2.0);
        let mut group = DrawingGroup::new();

        let mut ctx = group.open();
        ctx.draw_line(&pen, Point2::new(0.0, 0.0), Point2::new(1.0, 1.0));
        ctx.draw_line(&pen, Point2::new(1.0, 1.0), Point2::new(2.0, 2.0));
        ctx.close();
        assert_eq!(group.len(), 2);
        assert_eq!(group.revision(), 1);
        assert!(!group.is_open());

        let mut ctx = group.open();
        ctx.draw_line(&pen, Point2::new(3.0, 3.0), Point2::new(4.0, 4.0));
        drop(ctx);
        assert_eq!(group.len(), 1);
        assert_eq!(group.commands()[0].from, Point2::new(3.0, 3.0));
        assert_eq!(group.revision(), 2);
    }
}
