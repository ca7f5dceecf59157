//! Freehand drawn path element.

use super::ElementId;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stroke width applied to newly drawn paths.
pub const DEFAULT_STROKE_WIDTH: f64 = 5.0;

/// A freehand path: an ordered polyline of canvas points.
///
/// Committed paths always carry at least two points; shorter gestures are
/// discarded before commit. Transforms never mutate the points in place
/// across gestures: each gesture writes a fresh vector derived from its
/// start snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawPath {
    pub id: ElementId,
    pub points: Vec<Point>,
    pub color: String,
    pub stroke_width: f64,
}

impl DrawPath {
    /// Create a new path from drawn points.
    pub fn new(points: Vec<Point>, color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            color: color.into(),
            stroke_width: DEFAULT_STROKE_WIDTH,
        }
    }

    /// Bounding box over all points.
    pub fn bounds(&self) -> Rect {
        if self.points.is_empty() {
            return Rect::ZERO;
        }

        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;

        for point in &self.points {
            min_x = min_x.min(point.x);
            min_y = min_y.min(point.y);
            max_x = max_x.max(point.x);
            max_y = max_y.max(point.y);
        }

        Rect::new(min_x, min_y, max_x, max_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let path = DrawPath::new(
            vec![
                Point::new(0.0, 0.0),
                Point::new(100.0, 50.0),
                Point::new(50.0, 100.0),
            ],
            "#000000",
        );

        let bounds = path.bounds();
        assert!((bounds.x0).abs() < f64::EPSILON);
        assert!((bounds.y0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 100.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_bounds() {
        let path = DrawPath::new(Vec::new(), "#000000");
        assert_eq!(path.bounds(), Rect::ZERO);
    }
}
