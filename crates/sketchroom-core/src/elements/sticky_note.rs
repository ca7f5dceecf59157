//! Sticky note element.

use super::ElementId;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Width of a freshly created note.
pub const DEFAULT_WIDTH: f64 = 200.0;
/// Height of a freshly created note.
pub const DEFAULT_HEIGHT: f64 = 150.0;

/// A sticky note with editable text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StickyNote {
    pub id: ElementId,
    pub position: Point,
    pub text: String,
    pub color: String,
    pub width: f64,
    pub height: f64,
}

impl StickyNote {
    /// Create an empty note at the given position in the creator's color.
    pub fn new(position: Point, color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            text: String::new(),
            color: color.into(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }

    /// Bounding box of the note.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_note_defaults() {
        let note = StickyNote::new(Point::new(10.0, 20.0), "#87CEEB");
        assert!(note.text.is_empty());
        assert!((note.width - DEFAULT_WIDTH).abs() < f64::EPSILON);
        assert!((note.height - DEFAULT_HEIGHT).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bounds() {
        let note = StickyNote::new(Point::new(50.0, 50.0), "#87CEEB");
        let bounds = note.bounds();
        assert!((bounds.x1 - 250.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 200.0).abs() < f64::EPSILON);
    }
}
