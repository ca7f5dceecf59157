//! Pointer event plumbing: buttons, modifiers, double-click detection.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Pointer event type for unified mouse/touch handling. Positions are
/// container-relative screen pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Up {
        position: Point,
    },
    Move {
        position: Point,
    },
    Scroll {
        position: Point,
        delta_y: f64,
    },
}

/// Double-click detection constants.
const DOUBLE_CLICK_TIME_MS: u128 = 500;
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Detects double-clicks from a stream of pointer-down positions.
#[derive(Debug, Clone, Default)]
pub struct ClickTracker {
    last_click: Option<(Instant, Point)>,
}

impl ClickTracker {
    /// Create a fresh tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pointer-down. Returns true when this click completes a
    /// double-click (close enough in both time and space to the previous
    /// one). A detected double-click resets the tracker so a triple click
    /// does not count twice.
    pub fn click(&mut self, position: Point) -> bool {
        let now = Instant::now();
        if let Some((last_time, last_pos)) = self.last_click {
            let elapsed = now.duration_since(last_time).as_millis();
            let distance = position.distance(last_pos);
            if elapsed < DOUBLE_CLICK_TIME_MS && distance < DOUBLE_CLICK_DISTANCE {
                self.last_click = None;
                return true;
            }
        }
        self.last_click = Some((now, position));
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_click_is_not_double() {
        let mut tracker = ClickTracker::new();
        assert!(!tracker.click(Point::new(100.0, 100.0)));
    }

    #[test]
    fn test_second_nearby_click_is_double() {
        let mut tracker = ClickTracker::new();
        tracker.click(Point::new(100.0, 100.0));
        assert!(tracker.click(Point::new(101.0, 101.0)));
    }

    #[test]
    fn test_triple_click_is_single_double() {
        let mut tracker = ClickTracker::new();
        tracker.click(Point::new(100.0, 100.0));
        assert!(tracker.click(Point::new(100.0, 100.0)));
        // The third click starts a new sequence.
        assert!(!tracker.click(Point::new(100.0, 100.0)));
    }

    #[test]
    fn test_far_click_is_not_double() {
        let mut tracker = ClickTracker::new();
        tracker.click(Point::new(100.0, 100.0));
        assert!(!tracker.click(Point::new(200.0, 200.0)));
    }
}
