//! Brushes and pens
//!
//! A resource starts out mutable. Mutable resources are revalidated every
//! time a sink consumes them; freezing one resolves its GPU-ready color once
//! and lets every later draw reuse it.

use crate::simulation::Color;

/// Default stroke width used by every strategy that strokes with pens
pub const DEFAULT_PEN_THICKNESS: f32 = 2.0;

/// Single-color fill
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolidColorBrush {
    color: Color,
    frozen: Option<[f32; 4]>,
}

impl SolidColorBrush {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            frozen: None,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Change the color; only allowed while the brush is mutable
    pub fn set_color(&mut self, color: Color) -> bool {
        if self.is_frozen() {
            return false;
        }
        self.color = color;
        true
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.is_some()
    }

    pub fn freeze(&mut self) {
        if self.frozen.is_none() {
            self.frozen = Some(self.color.to_rgba_f32());
        }
    }

    /// Normalized RGBA, recomputed on every call unless frozen
    #[inline]
    pub fn resolve(&self) -> [f32; 4] {
        match self.frozen {
            Some(rgba) => rgba,
            None => self.color.to_rgba_f32(),
        }
    }
}

/// Stroke description: a brush plus a width in logical units
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pen {
    brush: SolidColorBrush,
    thickness: f32,
    frozen: bool,
}

impl Pen {
    pub fn new(brush: SolidColorBrush, thickness: f32) -> Self {
        Self {
            brush,
            thickness,
            frozen: false,
        }
    }

    /// Build a frozen pen (and brush) for `color`
    pub fn frozen(color: Color, thickness: f32) -> Self {
        let mut brush = SolidColorBrush::new(color);
        brush.freeze();
        let mut pen = Self::new(brush, thickness);
        pen.freeze();
        pen
    }

    pub fn brush(&self) -> &SolidColorBrush {
        &self.brush
    }

    pub fn color(&self) -> Color {
        self.brush.color()
    }

    pub fn thickness(&self) -> f32 {
        self.thickness
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Freeze the pen; its brush is frozen with it
    pub fn freeze(&mut self) {
        self.brush.freeze();
        self.frozen = true;
    }

    /// Resolve color and width for a draw call
    ///
    /// A mutable pen re-checks its thickness and revalidates its brush on
    /// every call; a frozen pen returns its cached values.
    #[inline]
    pub fn resolve(&self) -> ([f32; 4], f32) {
        if self.frozen {
            return (self.brush.resolve(), self.thickness);
        }
        let thickness = if self.thickness.is_finite() {
            self.thickness.max(0.0)
        } else {
            0.0
        };
        (self.brush.resolve(), thickness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frozen_brush_rejects_changes() {
        let mut brush = SolidColorBrush::new(Color::opaque(255, 0, 0));
        assert!(brush.set_color(Color::opaque(0, 255, 0)));
        brush.freeze();
        assert!(brush.is_frozen());
        assert!(!brush.set_color(Color::opaque(0, 0, 255)));
        assert_eq!(brush.color(), Color::opaque(0, 255, 0));
    }

    #[test]
    fn test_frozen_and_mutable_resolve_identically() {
        let color = Color::opaque(12, 34, 56);
        let mutable = Pen::new(SolidColorBrush::new(color), 2.0);
        let frozen = Pen::frozen(color, 2.0);

        assert!(!mutable.is_frozen());
        assert!(frozen.is_frozen() && frozen.brush().is_frozen());
        assert_eq!(mutable.resolve(), frozen.resolve());
    }

    #[test]
    fn test_mutable_pen_sanitizes_thickness() {
        let pen = Pen::new(SolidColorBrush::new(Color::opaque(1, 1, 1)), f32::NAN);
        assert_eq!(pen.resolve().1, 0.0);
    }
}
