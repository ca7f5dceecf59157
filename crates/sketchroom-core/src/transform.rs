//! Move/resize of selected elements via handles, including pivot-based
//! group scaling.
//!
//! Every gesture works off a snapshot taken at its start: element data and
//! the union bounding box are captured once and all subsequent updates
//! derive from them, so intermediate states never compound into drift.

use crate::elements::{Element, ElementId};
use crate::selection::SelectionState;
use crate::store::ElementStore;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Smallest side a sticky note or screen share can be resized to.
const MIN_SIDE: f64 = 1.0;

/// A transform handle: eight resize positions plus whole-selection move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handle {
    TopLeft,
    TopMid,
    TopRight,
    MidLeft,
    MidRight,
    BottomLeft,
    BottomMid,
    BottomRight,
    Move,
}

impl Handle {
    /// Whether the handle drags the left edge.
    pub fn touches_left(self) -> bool {
        matches!(self, Handle::TopLeft | Handle::MidLeft | Handle::BottomLeft)
    }

    /// Whether the handle drags the right edge.
    pub fn touches_right(self) -> bool {
        matches!(self, Handle::TopRight | Handle::MidRight | Handle::BottomRight)
    }

    /// Whether the handle drags the top edge.
    pub fn touches_top(self) -> bool {
        matches!(self, Handle::TopLeft | Handle::TopMid | Handle::TopRight)
    }

    /// Whether the handle drags the bottom edge.
    pub fn touches_bottom(self) -> bool {
        matches!(
            self,
            Handle::BottomLeft | Handle::BottomMid | Handle::BottomRight
        )
    }
}

/// Transient state of an active transform gesture.
#[derive(Debug, Clone)]
pub struct TransformState {
    handle: Handle,
    initial_point: Point,
    /// Snapshot of every selected element at gesture start.
    initial: HashMap<ElementId, Element>,
    /// Union bounding box of the selection at gesture start. The group-scale
    /// pivot and factors derive from this box only.
    group_bounds: Rect,
}

impl TransformState {
    /// Begin a gesture: snapshot the selected elements and their union
    /// bounding box. Returns `None` for an empty selection (transform on
    /// nothing is a no-op).
    pub fn begin(
        handle: Handle,
        point: Point,
        store: &ElementStore,
        selection: &SelectionState,
    ) -> Option<Self> {
        let mut initial = HashMap::new();
        let mut group_bounds: Option<Rect> = None;

        for &id in selection.selected() {
            let Some(element) = store.get(id) else {
                continue;
            };
            let bounds = element.bounds();
            group_bounds = Some(match group_bounds {
                Some(acc) => acc.union(bounds),
                None => bounds,
            });
            initial.insert(id, element.clone());
        }

        let group_bounds = group_bounds?;
        Some(Self {
            handle,
            initial_point: point,
            initial,
            group_bounds,
        })
    }

    /// The handle driving this gesture.
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// Ids of the elements under transform.
    pub fn element_ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.initial.keys().copied()
    }

    /// The selection's bounding box at gesture start.
    pub fn group_bounds(&self) -> Rect {
        self.group_bounds
    }

    /// Apply the gesture for the current pointer position, live-previewing
    /// through the store. Always derives from the gesture-start snapshot.
    pub fn update(&self, point: Point, store: &mut ElementStore) {
        let delta = point - self.initial_point;
        let multi = self.initial.len() > 1;

        for (&id, snapshot) in &self.initial {
            let next = if self.handle == Handle::Move {
                translated(snapshot, delta)
            } else if multi {
                let (pivot, scale) = self.group_scale(delta);
                scaled_about(snapshot, pivot, scale)
            } else {
                resized_single(snapshot, self.handle, delta)
            };
            store.update(id, |el| *el = next);
        }
    }

    /// Finish the gesture: collect the final element states from the store
    /// for the caller to commit through the sync bridge.
    pub fn finish(self, store: &ElementStore) -> Vec<Element> {
        self.initial
            .keys()
            .filter_map(|&id| store.get(id).cloned())
            .collect()
    }

    /// Derive the anisotropic scale factors and pivot from how the dragged
    /// edges move relative to the initial group box. The pivot is the
    /// opposite edge/corner of that box.
    fn group_scale(&self, delta: Vec2) -> (Point, Vec2) {
        let bounds = self.group_bounds;
        let width = bounds.width();
        let height = bounds.height();

        let mut scale = Vec2::new(1.0, 1.0);
        let mut pivot = Point::new(bounds.x0, bounds.y0);

        if width > f64::EPSILON {
            if self.handle.touches_right() {
                scale.x = (width + delta.x) / width;
                pivot.x = bounds.x0;
            } else if self.handle.touches_left() {
                scale.x = (width - delta.x) / width;
                pivot.x = bounds.x1;
            }
        }
        if height > f64::EPSILON {
            if self.handle.touches_bottom() {
                scale.y = (height + delta.y) / height;
                pivot.y = bounds.y0;
            } else if self.handle.touches_top() {
                scale.y = (height - delta.y) / height;
                pivot.y = bounds.y1;
            }
        }

        // Middle handles scale along one axis only.
        if matches!(self.handle, Handle::TopMid | Handle::BottomMid) {
            scale.x = 1.0;
        }
        if matches!(self.handle, Handle::MidLeft | Handle::MidRight) {
            scale.y = 1.0;
        }

        (pivot, scale)
    }
}

/// The snapshot translated by the gesture delta.
fn translated(snapshot: &Element, delta: Vec2) -> Element {
    let mut element = snapshot.clone();
    element.translate(delta);
    element
}

/// Remap one coordinate about the pivot.
fn scale_point(p: Point, pivot: Point, scale: Vec2) -> Point {
    Point::new(
        pivot.x + (p.x - pivot.x) * scale.x,
        pivot.y + (p.y - pivot.y) * scale.y,
    )
}

/// The snapshot scaled about the group pivot, component-wise.
fn scaled_about(snapshot: &Element, pivot: Point, scale: Vec2) -> Element {
    let mut element = snapshot.clone();
    match &mut element {
        Element::Path(path) => {
            for point in &mut path.points {
                *point = scale_point(*point, pivot, scale);
            }
        }
        Element::StickyNote(note) => {
            note.position = scale_point(note.position, pivot, scale);
            note.width = (note.width * scale.x).max(MIN_SIDE);
            note.height = (note.height * scale.y).max(MIN_SIDE);
        }
        Element::Shape(shape) => {
            shape.start = scale_point(shape.start, pivot, scale);
            shape.end = scale_point(shape.end, pivot, scale);
        }
        Element::ScreenShare(share) => {
            share.position = scale_point(share.position, pivot, scale);
            share.width = (share.width * scale.x).max(MIN_SIDE);
            share.height = (share.height * scale.y).max(MIN_SIDE);
        }
    }
    element
}

/// The snapshot resized by a handle-specific edge adjustment.
fn resized_single(snapshot: &Element, handle: Handle, delta: Vec2) -> Element {
    let mut element = snapshot.clone();
    match &mut element {
        Element::StickyNote(note) => {
            let (position, width, height) = resize_box(
                note.position,
                note.width,
                note.height,
                handle,
                delta,
            );
            note.position = position;
            note.width = width;
            note.height = height;
        }
        Element::ScreenShare(share) => {
            let (position, width, height) = resize_box(
                share.position,
                share.width,
                share.height,
                handle,
                delta,
            );
            share.position = position;
            share.width = width;
            share.height = height;
        }
        Element::Shape(shape) => {
            // Corners move directly; crossing yields a valid degenerate
            // shape, so no floor is needed.
            if handle.touches_left() {
                shape.start.x += delta.x;
            }
            if handle.touches_right() {
                shape.end.x += delta.x;
            }
            if handle.touches_top() {
                shape.start.y += delta.y;
            }
            if handle.touches_bottom() {
                shape.end.y += delta.y;
            }
        }
        // A lone path under a resize handle is left as-is.
        Element::Path(_) => {}
    }
    element
}

/// Edge adjustment for position/width/height boxes, floored at [`MIN_SIDE`].
fn resize_box(
    position: Point,
    width: f64,
    height: f64,
    handle: Handle,
    delta: Vec2,
) -> (Point, f64, f64) {
    let mut position = position;
    let mut width = width;
    let mut height = height;

    if handle.touches_left() {
        width -= delta.x;
        position.x += delta.x;
    }
    if handle.touches_right() {
        width += delta.x;
    }
    if handle.touches_top() {
        height -= delta.y;
        position.y += delta.y;
    }
    if handle.touches_bottom() {
        height += delta.y;
    }

    (position, width.max(MIN_SIDE), height.max(MIN_SIDE))
}
