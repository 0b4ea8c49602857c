//! Multi-figure path geometry
//!
//! A path is a list of open figures, each a start point followed by line
//! segments. Points are stored flat so rebuilding a path every frame reuses
//! the same allocations.

use cgmath::Point2;

#[derive(Clone, Debug, Default)]
pub struct PathGeometry {
    points: Vec<Point2<f64>>,
    /// Index into `points` where each figure starts
    figure_starts: Vec<usize>,
}

impl PathGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(figures: usize, points: usize) -> Self {
        Self {
            points: Vec::with_capacity(points),
            figure_starts: Vec::with_capacity(figures),
        }
    }

    /// Start a new open figure at `start`
    pub fn begin_figure(&mut self, start: Point2<f64>) {
        self.figure_starts.push(self.points.len());
        self.points.push(start);
    }

    /// Extend the current figure; starts a figure at `to` if none is open
    pub fn line_to(&mut self, to: Point2<f64>) {
        if self.figure_starts.is_empty() {
            self.begin_figure(to);
            return;
        }
        self.points.push(to);
    }

    /// Remove all figures, keeping capacity
    pub fn clear(&mut self) {
        self.points.clear();
        self.figure_starts.clear();
    }

    pub fn figure_count(&self) -> usize {
        self.figure_starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.figure_starts.is_empty()
    }

    /// Points of each figure in insertion order
    pub fn figures(&self) -> impl Iterator<Item = &[Point2<f64>]> + '_ {
        self.figure_starts.iter().enumerate().map(move |(i, &start)| {
            let end = self
                .figure_starts
                .get(i + 1)
                .copied()
                .unwrap_or(self.points.len());
            &self.points[start..end]
        })
    }

    /// Every line segment across all figures
    pub fn segments(&self) -> impl Iterator<Item = (Point2<f64>, Point2<f64>)> + '_ {
        self.figures()
            .flat_map(|figure| figure.windows(2).map(|pair| (pair[0], pair[1])))
    }

    pub fn segment_count(&self) -> usize {
        self.figures().map(|f| f.len().saturating_sub(1)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_figures_are_kept_separate() {
        let mut path = PathGeometry::new();
        path.begin_figure(Point2::new(0.0, 0.0));
        path.line_to(Point2::new(1.0, 0.0));
        path.begin_figure(Point2::new(5.0, 5.0));
        path.line_to(Point2::new(6.0, 6.0));
        path.line_to(Point2::new(7.0, 5.0));

        assert_eq!(path.figure_count(), 2);
        assert_eq!(path.segment_count(), 3);
        let segments: Vec<_> = path.segments().collect();
        assert_eq!(segments[0], (Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)));
        assert_eq!(segments[1], (Point2::new(5.0, 5.0), Point2::new(6.0, 6.0)));
    }

    #[test]
    fn test_line_to_without_figure_starts_one() {
        let mut path = PathGeometry::new();
        path.line_to(Point2::new(2.0, 3.0));
        assert_eq!(path.figure_count(), 1);
        assert_eq!(path.segment_count(), 0);
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut path = PathGeometry::with_capacity(4, 8);
        path.begin_figure(Point2::new(0.0, 0.0));
        path.line_to(Point2::new(1.0, 1.0));
        path.clear();
        assert!(path.is_empty());
        assert_eq!(path.segments().count(), 0);
    }
}
