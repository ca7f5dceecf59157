//! Canvas element definitions.
//!
//! Elements form a closed tagged union; every consumption site matches
//! exhaustively, so adding a new element kind is a compile-time-checked
//! change.

mod path;
mod screen_share;
mod shape;
mod sticky_note;

pub use path::DrawPath;
pub use screen_share::ScreenShare;
pub use shape::{ShapeDraft, ShapeFigure, ShapeKind};
pub use sticky_note::StickyNote;

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Discriminant for element kinds, used for kind-filtered queries and
/// click-selection priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Path,
    StickyNote,
    Shape,
    ScreenShare,
}

/// A canvas element.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Element {
    Path(DrawPath),
    StickyNote(StickyNote),
    Shape(ShapeFigure),
    #[serde(rename = "screenshare")]
    ScreenShare(ScreenShare),
}

impl Element {
    /// Get the unique identifier.
    pub fn id(&self) -> ElementId {
        match self {
            Element::Path(p) => p.id,
            Element::StickyNote(n) => n.id,
            Element::Shape(s) => s.id,
            Element::ScreenShare(s) => s.id,
        }
    }

    /// Get the kind discriminant.
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Path(_) => ElementKind::Path,
            Element::StickyNote(_) => ElementKind::StickyNote,
            Element::Shape(_) => ElementKind::Shape,
            Element::ScreenShare(_) => ElementKind::ScreenShare,
        }
    }

    /// Get the axis-aligned bounding box in canvas coordinates.
    pub fn bounds(&self) -> Rect {
        match self {
            Element::Path(p) => p.bounds(),
            Element::StickyNote(n) => n.bounds(),
            Element::Shape(s) => s.bounds(),
            Element::ScreenShare(s) => s.bounds(),
        }
    }

    /// Translate the element's geometry by a delta, in canvas units.
    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Element::Path(p) => {
                for point in &mut p.points {
                    *point += delta;
                }
            }
            Element::StickyNote(n) => n.position += delta,
            Element::Shape(s) => {
                s.start += delta;
                s.end += delta;
            }
            Element::ScreenShare(s) => s.position += delta,
        }
    }
}

/// Inclusive point-in-rect test. `kurbo::Rect::contains` is half-open, which
/// would drop hits exactly on the right/bottom edge of a selection box.
pub(crate) fn point_in_rect(point: Point, rect: Rect) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Inclusive axis-aligned overlap test between two rects.
pub(crate) fn rects_overlap(a: Rect, b: Rect) -> bool {
    !(a.x0 > b.x1 || a.x1 < b.x0 || a.y0 > b.y1 || a.y1 < b.y0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_path_moves_every_point() {
        let mut element = Element::Path(DrawPath::new(
            vec![Point::new(0.0, 0.0), Point::new(10.0, 5.0)],
            "#000000",
        ));
        element.translate(Vec2::new(3.0, -2.0));

        if let Element::Path(path) = element {
            assert!((path.points[0].x - 3.0).abs() < f64::EPSILON);
            assert!((path.points[0].y + 2.0).abs() < f64::EPSILON);
            assert!((path.points[1].x - 13.0).abs() < f64::EPSILON);
            assert!((path.points[1].y - 3.0).abs() < f64::EPSILON);
        } else {
            panic!("expected path element");
        }
    }

    #[test]
    fn test_translate_shape_moves_both_corners() {
        let mut element = Element::Shape(ShapeFigure::new(
            ShapeKind::Rectangle,
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            "#000000",
        ));
        element.translate(Vec2::new(5.0, 5.0));

        if let Element::Shape(shape) = element {
            assert!((shape.start.x - 5.0).abs() < f64::EPSILON);
            assert!((shape.end.y - 15.0).abs() < f64::EPSILON);
        } else {
            panic!("expected shape element");
        }
    }

    #[test]
    fn test_point_in_rect_is_inclusive() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(point_in_rect(Point::new(10.0, 10.0), rect));
        assert!(point_in_rect(Point::new(0.0, 0.0), rect));
        assert!(!point_in_rect(Point::new(10.1, 5.0), rect));
    }

    #[test]
    fn test_rects_overlap_partial() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 20.0, 20.0);
        let c = Rect::new(11.0, 0.0, 20.0, 10.0);
        assert!(rects_overlap(a, b));
        assert!(!rects_overlap(a, c));
    }

    #[test]
    fn test_serde_tags() {
        let note = Element::StickyNote(StickyNote::new(Point::new(1.0, 2.0), "#FFB6C1"));
        let json = serde_json::to_string(&note).unwrap();
        assert!(json.contains("\"type\":\"sticky-note\""));

        let share = Element::ScreenShare(ScreenShare::new("stream-1", Uuid::new_v4()));
        let json = serde_json::to_string(&share).unwrap();
        assert!(json.contains("\"type\":\"screenshare\""));
    }
}
