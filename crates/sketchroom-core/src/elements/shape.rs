//! Geometric shape element (rectangle, circle, triangle).
//!
//! A shape stores only its two gesture corners; concrete geometry is derived
//! on demand, so resizing stays a matter of moving corners.

use super::ElementId;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stroke width applied to newly committed shapes.
pub const DEFAULT_STROKE_WIDTH: f64 = 5.0;

/// The geometric variants a shape can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Triangle,
}

/// A shape defined by its two drag corners.
///
/// `start` and `end` are unordered: either may be the visual top-left, and
/// resize handles may drag them past each other, which still yields a valid
/// (mirrored or degenerate) shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeFigure {
    pub id: ElementId,
    #[serde(rename = "shape_kind")]
    pub kind: ShapeKind,
    pub start: Point,
    pub end: Point,
    pub color: String,
    pub stroke_width: f64,
}

impl ShapeFigure {
    /// Create a shape from two gesture corners.
    pub fn new(kind: ShapeKind, start: Point, end: Point, color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            start,
            end,
            color: color.into(),
            stroke_width: DEFAULT_STROKE_WIDTH,
        }
    }

    /// Normalized rectangle: min corner plus absolute extents.
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.start.x.min(self.end.x),
            self.start.y.min(self.end.y),
            self.start.x.max(self.end.x),
            self.start.y.max(self.end.y),
        )
    }

    /// Circle parameters: midpoint center, half the corner distance as
    /// radius.
    pub fn circle(&self) -> (Point, f64) {
        let center = Point::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
        );
        let radius = self.start.distance(self.end) / 2.0;
        (center, radius)
    }

    /// Triangle vertices: base corners at `(start.x, end.y)` and
    /// `(end.x, end.y)`, apex at the horizontal midpoint toward `start.y`.
    pub fn triangle(&self) -> [Point; 3] {
        [
            Point::new(self.start.x, self.end.y),
            Point::new((self.start.x + self.end.x) / 2.0, self.start.y),
            Point::new(self.end.x, self.end.y),
        ]
    }

    /// Bounding box of the derived geometry.
    pub fn bounds(&self) -> Rect {
        match self.kind {
            ShapeKind::Rectangle => self.rect(),
            ShapeKind::Circle => {
                let (center, radius) = self.circle();
                Rect::new(
                    center.x - radius,
                    center.y - radius,
                    center.x + radius,
                    center.y + radius,
                )
            }
            ShapeKind::Triangle => {
                let [a, b, c] = self.triangle();
                Rect::new(
                    a.x.min(b.x).min(c.x),
                    a.y.min(b.y).min(c.y),
                    a.x.max(b.x).max(c.x),
                    a.y.max(b.y).max(c.y),
                )
            }
        }
    }
}

/// An in-progress shape gesture, before commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeDraft {
    pub kind: ShapeKind,
    pub start: Point,
    pub end: Point,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_normalizes_swapped_corners() {
        let a = ShapeFigure::new(
            ShapeKind::Rectangle,
            Point::new(100.0, 80.0),
            Point::new(20.0, 10.0),
            "#000000",
        );
        let b = ShapeFigure::new(
            ShapeKind::Rectangle,
            Point::new(20.0, 10.0),
            Point::new(100.0, 80.0),
            "#000000",
        );
        assert_eq!(a.rect(), b.rect());
        assert!((a.rect().width() - 80.0).abs() < f64::EPSILON);
        assert!((a.rect().height() - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_circle_center_and_radius() {
        let shape = ShapeFigure::new(
            ShapeKind::Circle,
            Point::new(0.0, 0.0),
            Point::new(6.0, 8.0),
            "#000000",
        );
        let (center, radius) = shape.circle();
        assert!((center.x - 3.0).abs() < f64::EPSILON);
        assert!((center.y - 4.0).abs() < f64::EPSILON);
        assert!((radius - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_circle_bounds() {
        let shape = ShapeFigure::new(
            ShapeKind::Circle,
            Point::new(0.0, 0.0),
            Point::new(6.0, 8.0),
            "#000000",
        );
        let bounds = shape.bounds();
        assert!((bounds.x0 + 2.0).abs() < f64::EPSILON); // 3 - 5
        assert!((bounds.y0 + 1.0).abs() < f64::EPSILON); // 4 - 5
        assert!((bounds.width() - 10.0).abs() < f64::EPSILON);
        assert!((bounds.height() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_triangle_vertices() {
        let shape = ShapeFigure::new(
            ShapeKind::Triangle,
            Point::new(0.0, 0.0),
            Point::new(10.0, 20.0),
            "#000000",
        );
        let [a, b, c] = shape.triangle();
        assert_eq!(a, Point::new(0.0, 20.0));
        assert_eq!(b, Point::new(5.0, 0.0));
        assert_eq!(c, Point::new(10.0, 20.0));
    }

    #[test]
    fn test_triangle_bounds_from_vertices() {
        // Apex points downward when start is below end.
        let shape = ShapeFigure::new(
            ShapeKind::Triangle,
            Point::new(0.0, 20.0),
            Point::new(10.0, 0.0),
            "#000000",
        );
        let bounds = shape.bounds();
        assert!((bounds.y0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 20.0).abs() < f64::EPSILON);
        assert!((bounds.width() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_degenerate_shape_is_valid() {
        let shape = ShapeFigure::new(
            ShapeKind::Rectangle,
            Point::new(5.0, 5.0),
            Point::new(5.0, 5.0),
            "#000000",
        );
        assert!((shape.bounds().area()).abs() < f64::EPSILON);
    }
}
