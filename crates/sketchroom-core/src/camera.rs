//! Camera module for pan/zoom transforms.
//!
//! The camera maps canvas-space coordinates (where elements live) to
//! screen-space pixels: `screen = canvas * zoom + offset`. Panning moves the
//! offset in raw screen pixels; zooming rescales about an arbitrary screen
//! point so the canvas point under the cursor stays put.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Minimum allowed zoom factor.
pub const MIN_ZOOM: f64 = 0.1;
/// Maximum allowed zoom factor.
pub const MAX_ZOOM: f64 = 5.0;
/// Scales wheel deltas into zoom factors.
pub const ZOOM_INTENSITY: f64 = 0.1;

/// Camera manages the view transform for the canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan), in screen pixels.
    pub offset: Vec2,
    /// Current zoom factor. Invariant: `min_zoom <= zoom <= max_zoom`.
    pub zoom: f64,
    /// Minimum allowed zoom factor.
    pub min_zoom: f64,
    /// Maximum allowed zoom factor.
    pub max_zoom: f64,
    /// Last pointer position while panning, in screen pixels.
    #[serde(skip)]
    drag_anchor: Option<Point>,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            drag_anchor: None,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a screen point to canvas coordinates.
    ///
    /// `origin` is the top-left of the viewport container in absolute screen
    /// pixels; pass `Point::ZERO` when the input is already container-relative.
    pub fn screen_to_canvas(&self, screen: Point, origin: Point) -> Point {
        Point::new(
            (screen.x - origin.x - self.offset.x) / self.zoom,
            (screen.y - origin.y - self.offset.y) / self.zoom,
        )
    }

    /// Convert a canvas point to screen coordinates. Inverse of
    /// [`Camera::screen_to_canvas`].
    pub fn canvas_to_screen(&self, canvas: Point, origin: Point) -> Point {
        Point::new(
            canvas.x * self.zoom + self.offset.x + origin.x,
            canvas.y * self.zoom + self.offset.y + origin.y,
        )
    }

    /// Zoom by `factor`, keeping the canvas point under `mouse` fixed on
    /// screen. `mouse` is container-relative.
    ///
    /// The offset correction holds exactly per axis, not approximately: the
    /// point that was under the cursor before the zoom maps to the same
    /// screen pixel after it.
    pub fn zoom_to_point(&mut self, mouse: Point, factor: f64) {
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        let change = new_zoom - self.zoom;
        if change.abs() < f64::EPSILON {
            return;
        }

        self.offset.x -= (mouse.x - self.offset.x) * (change / self.zoom);
        self.offset.y -= (mouse.y - self.offset.y) * (change / self.zoom);
        self.zoom = new_zoom;
    }

    /// Map a wheel delta to a zoom about the cursor position.
    pub fn handle_wheel(&mut self, mouse: Point, delta_y: f64) {
        let factor = 1.0 + (-delta_y * 0.01) * ZOOM_INTENSITY;
        self.zoom_to_point(mouse, factor);
    }

    /// Begin a pan drag at the given screen position.
    pub fn start_drag(&mut self, screen: Point) {
        self.drag_anchor = Some(screen);
    }

    /// Continue a pan drag: the screen-space delta since the last event is
    /// added to the offset directly (panning is not scaled by zoom).
    pub fn update_drag(&mut self, screen: Point) {
        if let Some(last) = self.drag_anchor {
            self.offset += screen - last;
            self.drag_anchor = Some(screen);
        }
    }

    /// End the pan drag.
    pub fn stop_drag(&mut self) {
        self.drag_anchor = None;
    }

    /// Whether a pan drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    /// Reset the camera to the origin at 100% zoom.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = 1.0;
        self.drag_anchor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera() {
        let camera = Camera::new();
        assert_eq!(camera.offset, Vec2::ZERO);
        assert!((camera.zoom - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_canvas_with_offset_and_zoom() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(50.0, 100.0);
        camera.zoom = 2.0;

        let canvas = camera.screen_to_canvas(Point::new(150.0, 300.0), Point::ZERO);
        assert!((canvas.x - 50.0).abs() < f64::EPSILON);
        assert!((canvas.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_container_origin_is_subtracted() {
        let camera = Camera::new();
        let origin = Point::new(20.0, 40.0);

        let canvas = camera.screen_to_canvas(Point::new(120.0, 140.0), origin);
        assert!((canvas.x - 100.0).abs() < f64::EPSILON);
        assert!((canvas.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(30.0, -20.0);
        camera.zoom = 1.5;
        let origin = Point::new(8.0, 16.0);

        let original = Point::new(123.0, 456.0);
        let canvas = camera.screen_to_canvas(original, origin);
        let back = camera.canvas_to_screen(canvas, origin);

        assert!((back.x - original.x).abs() < 1e-10);
        assert!((back.y - original.y).abs() < 1e-10);
    }

    #[test]
    fn test_zoom_keeps_cursor_point_fixed() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(37.0, -12.0);
        camera.zoom = 1.25;

        let mouse = Point::new(411.0, 233.0);
        let under_cursor = camera.screen_to_canvas(mouse, Point::ZERO);

        camera.zoom_to_point(mouse, 1.3);

        let after = camera.canvas_to_screen(under_cursor, Point::ZERO);
        assert!((after.x - mouse.x).abs() < 1e-9);
        assert!((after.y - mouse.y).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_fixed_point_holds_at_clamp_boundary() {
        let mut camera = Camera::new();
        camera.zoom = 4.0;

        let mouse = Point::new(100.0, 50.0);
        let under_cursor = camera.screen_to_canvas(mouse, Point::ZERO);

        // Factor 2.0 would exceed MAX_ZOOM; the clamped zoom must still keep
        // the cursor point fixed.
        camera.zoom_to_point(mouse, 2.0);
        assert!((camera.zoom - MAX_ZOOM).abs() < f64::EPSILON);

        let after = camera.canvas_to_screen(under_cursor, Point::ZERO);
        assert!((after.x - mouse.x).abs() < 1e-9);
        assert!((after.y - mouse.y).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut camera = Camera::new();
        camera.zoom_to_point(Point::ZERO, 0.001);
        assert!((camera.zoom - MIN_ZOOM).abs() < f64::EPSILON);

        camera.zoom = 1.0;
        camera.zoom_to_point(Point::ZERO, 1000.0);
        assert!((camera.zoom - MAX_ZOOM).abs() < f64::EPSILON);
    }

    #[test]
    fn test_wheel_zoom_direction() {
        let mut camera = Camera::new();
        camera.handle_wheel(Point::ZERO, -100.0); // Wheel up zooms in
        assert!(camera.zoom > 1.0);

        camera.reset();
        camera.handle_wheel(Point::ZERO, 100.0); // Wheel down zooms out
        assert!(camera.zoom < 1.0);
    }

    #[test]
    fn test_pan_drag_accumulates_screen_deltas() {
        let mut camera = Camera::new();
        camera.zoom = 2.0; // Pan must not be scaled by zoom

        camera.start_drag(Point::new(100.0, 100.0));
        camera.update_drag(Point::new(110.0, 95.0));
        camera.update_drag(Point::new(130.0, 95.0));
        camera.stop_drag();

        assert!((camera.offset.x - 30.0).abs() < f64::EPSILON);
        assert!((camera.offset.y + 5.0).abs() < f64::EPSILON);
        assert!(!camera.is_dragging());
    }

    #[test]
    fn test_update_without_drag_is_noop() {
        let mut camera = Camera::new();
        camera.update_drag(Point::new(50.0, 50.0));
        assert_eq!(camera.offset, Vec2::ZERO);
    }

    #[test]
    fn test_reset() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(10.0, 20.0);
        camera.zoom = 3.0;
        camera.reset();
        assert_eq!(camera.offset, Vec2::ZERO);
        assert!((camera.zoom - 1.0).abs() < f64::EPSILON);
    }
}
