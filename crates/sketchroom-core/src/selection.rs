//! Selection engine: box selection, click selection, and note edit mode.

use crate::elements::{point_in_rect, rects_overlap, Element, ElementId, ElementKind};
use crate::store::ElementStore;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A drag below this size in both dimensions is treated as a click, not a
/// box selection.
pub const MIN_SELECTION_SIZE: f64 = 2.0;

/// Kind priority for click hit-testing, foreground-most interactive kind
/// first. Paths are only selectable via box selection.
const CLICK_PRIORITY: [ElementKind; 3] = [
    ElementKind::ScreenShare,
    ElementKind::Shape,
    ElementKind::StickyNote,
];

/// The two corners of an in-progress box selection, in drag order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SelectionBox {
    pub start: Point,
    pub end: Point,
}

impl SelectionBox {
    /// A zero-size box anchored at a point.
    pub fn anchored(point: Point) -> Self {
        Self {
            start: point,
            end: point,
        }
    }

    /// Normalize the unordered corners into a min/max rect.
    pub fn normalized(&self) -> Rect {
        Rect::new(
            self.start.x.min(self.end.x),
            self.start.y.min(self.end.y),
            self.start.x.max(self.end.x),
            self.start.y.max(self.end.y),
        )
    }
}

/// Current selection plus at most one sticky note in text-edit mode.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    selected: HashSet<ElementId>,
    editing: Option<ElementId>,
    box_select: Option<SelectionBox>,
}

impl SelectionState {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of the selected elements (order-insensitive).
    pub fn selected(&self) -> &HashSet<ElementId> {
        &self.selected
    }

    /// Whether an element is selected.
    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selected.contains(&id)
    }

    /// Number of selected elements.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Clear the selection.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Replace the selection with the given ids.
    pub fn select(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        self.selected = ids.into_iter().collect();
    }

    /// The note currently in text-edit mode, if any.
    pub fn editing(&self) -> Option<ElementId> {
        self.editing
    }

    /// Enter edit mode for a note. Returns the previously editing note,
    /// whose pending text must be committed by the caller before the switch
    /// takes visible effect.
    pub fn begin_editing(&mut self, id: ElementId) -> Option<ElementId> {
        let previous = self.editing.filter(|&prev| prev != id);
        self.editing = Some(id);
        previous
    }

    /// Leave edit mode, returning the note that was being edited.
    pub fn stop_editing(&mut self) -> Option<ElementId> {
        self.editing.take()
    }

    /// Drop a deleted element from selection and edit state.
    pub fn forget(&mut self, id: ElementId) {
        self.selected.remove(&id);
        if self.editing == Some(id) {
            self.editing = None;
        }
    }

    // --- Box selection ---

    /// The in-progress selection box, if any.
    pub fn selection_box(&self) -> Option<&SelectionBox> {
        self.box_select.as_ref()
    }

    /// Open a selection box: prior selection is cleared and the box anchors
    /// at the start point.
    pub fn begin_box_select(&mut self, point: Point) {
        self.selected.clear();
        self.box_select = Some(SelectionBox::anchored(point));
    }

    /// Move the selection box's free corner.
    pub fn update_box_select(&mut self, point: Point) {
        if let Some(selection_box) = &mut self.box_select {
            selection_box.end = point;
        }
    }

    /// Close the selection box and select the intersecting elements.
    ///
    /// A box below [`MIN_SELECTION_SIZE`] in both dimensions counts as a
    /// click on empty canvas: nothing is selected and the prior selection
    /// stays cleared. Paths select when any of their points lies inside the
    /// box; every other kind selects on partial bounds overlap.
    pub fn end_box_select(&mut self, store: &ElementStore) {
        let Some(selection_box) = self.box_select.take() else {
            return;
        };

        let rect = selection_box.normalized();
        if rect.width() < MIN_SELECTION_SIZE && rect.height() < MIN_SELECTION_SIZE {
            self.selected.clear();
            return;
        }

        let hits: HashSet<ElementId> = store
            .iter_ordered()
            .filter(|element| element_in_box(element, rect))
            .map(Element::id)
            .collect();
        self.selected = hits;
    }

    /// Discard the selection box without selecting anything.
    pub fn cancel_box_select(&mut self) {
        self.box_select = None;
    }

    // --- Click selection ---

    /// Apply a click at the given canvas point. Shift toggles membership in
    /// the existing selection; a plain click replaces it, and a plain miss
    /// clears it. Returns the hit element, if any.
    pub fn click_select(
        &mut self,
        store: &ElementStore,
        point: Point,
        shift: bool,
    ) -> Option<ElementId> {
        match hit_test_click(store, point) {
            Some(id) => {
                if shift {
                    if !self.selected.remove(&id) {
                        self.selected.insert(id);
                    }
                } else {
                    self.selected.clear();
                    self.selected.insert(id);
                }
                Some(id)
            }
            None => {
                if !shift {
                    self.selected.clear();
                }
                None
            }
        }
    }
}

/// Box-intersection policy per element kind.
fn element_in_box(element: &Element, rect: Rect) -> bool {
    match element {
        Element::Path(path) => path.points.iter().any(|&p| point_in_rect(p, rect)),
        Element::StickyNote(_) | Element::Shape(_) | Element::ScreenShare(_) => {
            rects_overlap(element.bounds(), rect)
        }
    }
}

/// Find the click target at a canvas point: kinds are tried in
/// foreground-priority order, and within a kind the last-added element wins.
pub fn hit_test_click(store: &ElementStore, point: Point) -> Option<ElementId> {
    for kind in CLICK_PRIORITY {
        let hit = store
            .z_order()
            .iter()
            .rev()
            .filter_map(|&id| store.get(id))
            .find(|el| el.kind() == kind && point_in_rect(point, el.bounds()));
        if let Some(element) = hit {
            return Some(element.id());
        }
    }
    None
}
