//! Screen share element.

use super::ElementId;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default width of a freshly placed share surface.
pub const DEFAULT_WIDTH: f64 = 640.0;
/// Default height of a freshly placed share surface.
pub const DEFAULT_HEIGHT: f64 = 480.0;
/// Default placement of a freshly placed share surface.
pub const DEFAULT_POSITION: Point = Point::new(200.0, 200.0);

/// A shared-screen surface placed on the canvas.
///
/// `stream_id` refers to media owned by the external transport; this core
/// only tracks placement and ownership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenShare {
    pub id: ElementId,
    pub stream_id: String,
    /// Session id of the sharing user.
    pub user_id: Uuid,
    pub position: Point,
    pub width: f64,
    pub height: f64,
}

impl ScreenShare {
    /// Create a share surface for the given stream at the default placement.
    pub fn new(stream_id: impl Into<String>, user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            stream_id: stream_id.into(),
            user_id,
            position: DEFAULT_POSITION,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }

    /// Bounding box of the share surface.
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
    fn test_defaults() {
        let share = ScreenShare::new("stream-1", Uuid::new_v4());
        assert_eq!(share.position, DEFAULT_POSITION);
        assert!((share.width - 640.0).abs() < f64::EPSILON);
        assert!((share.height - 480.0).abs() < f64::EPSILON);
        assert!((share.bounds().x1 - 840.0).abs() < f64::EPSILON);
    }
}
