//! Canonical element collection plus ephemeral gesture drafts.

use crate::elements::{
    DrawPath, Element, ElementId, ElementKind, ShapeDraft, ShapeFigure, ShapeKind, StickyNote,
};
use kurbo::Point;
use std::collections::HashMap;

/// The authoritative in-memory collection of canvas elements.
///
/// All mutations except [`ElementStore::replace_all`] express local intent
/// and are expected to be mirrored into the replicated document by the
/// caller. `replace_all` is the single entry point for remote changes: the
/// whole collection is swapped for the replicated map's current values, so
/// any local edit between commit and observed echo is provisional.
#[derive(Debug, Clone, Default)]
pub struct ElementStore {
    elements: HashMap<ElementId, Element>,
    /// Ids back-to-front; the tail is the visual foreground.
    z_order: Vec<ElementId>,
    /// Path gesture in progress, if any.
    current_drawing: Option<Vec<Point>>,
    /// Shape gesture in progress, if any.
    current_shape: Option<ShapeDraft>,
}

impl ElementStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element, placing it at the visual front.
    pub fn add(&mut self, element: Element) {
        let id = element.id();
        self.z_order.push(id);
        self.elements.insert(id, element);
    }

    /// Remove an element, returning it if present.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        self.z_order.retain(|&other| other != id);
        self.elements.remove(&id)
    }

    /// Mutate an element in place. Returns false if the id is unknown.
    pub fn update(&mut self, id: ElementId, f: impl FnOnce(&mut Element)) -> bool {
        match self.elements.get_mut(&id) {
            Some(element) => {
                f(element);
                true
            }
            None => false,
        }
    }

    /// Replace the whole collection with remote values.
    ///
    /// Ephemeral drafts are deliberately untouched: an in-progress drawing
    /// survives a remote refresh.
    pub fn replace_all(&mut self, elements: Vec<Element>) {
        self.elements.clear();
        self.z_order.clear();
        for element in elements {
            self.add(element);
        }
    }

    /// Get an element by id.
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Whether an element with this id exists.
    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    /// Number of committed elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the store holds no committed elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements in z-order (back to front).
    pub fn iter_ordered(&self) -> impl Iterator<Item = &Element> {
        self.z_order.iter().filter_map(|id| self.elements.get(id))
    }

    /// Element ids in z-order (back to front).
    pub fn z_order(&self) -> &[ElementId] {
        &self.z_order
    }

    /// Elements of one kind, in z-order.
    pub fn elements_of_kind(&self, kind: ElementKind) -> impl Iterator<Item = &Element> {
        self.iter_ordered().filter(move |el| el.kind() == kind)
    }

    // --- Drawing draft ---

    /// Begin a path gesture at the given canvas point.
    pub fn start_drawing(&mut self, point: Point) {
        self.current_drawing = Some(vec![point]);
    }

    /// Append a point to the path gesture.
    pub fn extend_drawing(&mut self, point: Point) {
        if let Some(points) = &mut self.current_drawing {
            points.push(point);
        }
    }

    /// The path gesture in progress, if any.
    pub fn current_drawing(&self) -> Option<&[Point]> {
        self.current_drawing.as_deref()
    }

    /// Commit the path gesture. A gesture with fewer than two points is a
    /// silent no-op; the draft is cleared unconditionally.
    pub fn finish_drawing(&mut self, color: &str) -> Option<Element> {
        let points = self.current_drawing.take()?;
        if points.len() < 2 {
            return None;
        }

        let element = Element::Path(DrawPath::new(points, color));
        self.add(element.clone());
        Some(element)
    }

    /// Discard the path gesture.
    pub fn cancel_drawing(&mut self) {
        self.current_drawing = None;
    }

    // --- Shape draft ---

    /// Begin a shape gesture at the given canvas point.
    pub fn start_shape(&mut self, kind: ShapeKind, point: Point) {
        self.current_shape = Some(ShapeDraft {
            kind,
            start: point,
            end: point,
        });
    }

    /// Move the shape gesture's free corner.
    pub fn update_shape(&mut self, point: Point) {
        if let Some(draft) = &mut self.current_shape {
            draft.end = point;
        }
    }

    /// The shape gesture in progress, if any.
    pub fn current_shape(&self) -> Option<&ShapeDraft> {
        self.current_shape.as_ref()
    }

    /// Commit the shape gesture. A zero-size shape (the pointer never moved)
    /// is a silent no-op; the draft is cleared unconditionally.
    pub fn finish_shape(&mut self, color: &str) -> Option<Element> {
        let draft = self.current_shape.take()?;
        if draft.start == draft.end {
            return None;
        }

        let element = Element::Shape(ShapeFigure::new(draft.kind, draft.start, draft.end, color));
        self.add(element.clone());
        Some(element)
    }

    /// Discard the shape gesture.
    pub fn cancel_shape(&mut self) {
        self.current_shape = None;
    }

    // --- Sticky notes ---

    /// Create and add an empty sticky note at the given position.
    pub fn create_sticky_note(&mut self, position: Point, color: &str) -> Element {
        let element = Element::StickyNote(StickyNote::new(position, color));
        self.add(element.clone());
        element
    }

    /// Set a sticky note's text. Returns false if the id is unknown or not a
    /// note.
    pub fn set_note_text(&mut self, id: ElementId, text: &str) -> bool {
        match self.elements.get_mut(&id) {
            Some(Element::StickyNote(note)) => {
                note.text = text.to_string();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ScreenShare;
    use uuid::Uuid;

    #[test]
    fn test_add_remove() {
        let mut store = ElementStore::new();
        let note = store.create_sticky_note(Point::new(0.0, 0.0), "#FFB6C1");
        assert_eq!(store.len(), 1);

        let removed = store.remove(note.id());
        assert!(removed.is_some());
        assert!(store.is_empty());
        assert!(store.z_order().is_empty());
    }

    #[test]
    fn test_single_point_path_is_discarded() {
        let mut store = ElementStore::new();
        store.start_drawing(Point::new(5.0, 5.0));

        let committed = store.finish_drawing("#000000");
        assert!(committed.is_none());
        assert!(store.is_empty());
        assert!(store.current_drawing().is_none());
    }

    #[test]
    fn test_two_point_path_commits_exactly_once() {
        let mut store = ElementStore::new();
        store.start_drawing(Point::new(0.0, 0.0));
        store.extend_drawing(Point::new(10.0, 10.0));

        let committed = store.finish_drawing("#000000").expect("path should commit");
        assert_eq!(store.len(), 1);
        assert!(store.contains(committed.id()));
        assert!(store.current_drawing().is_none());

        // A second finish is a no-op; nothing doubles up.
        assert!(store.finish_drawing("#000000").is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_zero_size_shape_is_discarded() {
        let mut store = ElementStore::new();
        store.start_shape(ShapeKind::Circle, Point::new(3.0, 3.0));

        assert!(store.finish_shape("#000000").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_shape_commit() {
        let mut store = ElementStore::new();
        store.start_shape(ShapeKind::Triangle, Point::new(0.0, 0.0));
        store.update_shape(Point::new(40.0, 30.0));

        let committed = store.finish_shape("#98FB98").expect("shape should commit");
        if let Element::Shape(shape) = committed {
            assert_eq!(shape.kind, ShapeKind::Triangle);
            assert_eq!(shape.end, Point::new(40.0, 30.0));
        } else {
            panic!("expected shape element");
        }
    }

    #[test]
    fn test_replace_all_preserves_drafts() {
        let mut store = ElementStore::new();
        store.create_sticky_note(Point::new(0.0, 0.0), "#FFB6C1");
        store.start_drawing(Point::new(1.0, 1.0));
        store.extend_drawing(Point::new(2.0, 2.0));

        let remote = vec![Element::ScreenShare(ScreenShare::new(
            "stream-9",
            Uuid::new_v4(),
        ))];
        store.replace_all(remote);

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.iter_ordered().next().map(Element::kind),
            Some(ElementKind::ScreenShare)
        );
        // The in-progress drawing survives the remote refresh.
        assert_eq!(store.current_drawing().map(<[Point]>::len), Some(2));
    }

    #[test]
    fn test_update() {
        let mut store = ElementStore::new();
        let note = store.create_sticky_note(Point::new(0.0, 0.0), "#FFB6C1");
        let id = note.id();

        assert!(store.update(id, |el| el.translate(kurbo::Vec2::new(5.0, 0.0))));
        let bounds = store.get(id).unwrap().bounds();
        assert!((bounds.x0 - 5.0).abs() < f64::EPSILON);

        assert!(!store.update(Uuid::new_v4(), |_| {}));
    }

    #[test]
    fn test_elements_of_kind() {
        let mut store = ElementStore::new();
        store.create_sticky_note(Point::new(0.0, 0.0), "#FFB6C1");
        store.start_shape(ShapeKind::Rectangle, Point::new(0.0, 0.0));
        store.update_shape(Point::new(10.0, 10.0));
        store.finish_shape("#000000");

        assert_eq!(store.elements_of_kind(ElementKind::Shape).count(), 1);
        assert_eq!(store.elements_of_kind(ElementKind::StickyNote).count(), 1);
        assert_eq!(store.elements_of_kind(ElementKind::Path).count(), 0);
    }

    #[test]
    fn test_set_note_text() {
        let mut store = ElementStore::new();
        let note = store.create_sticky_note(Point::new(0.0, 0.0), "#FFB6C1");

        assert!(store.set_note_text(note.id(), "hello"));
        if let Some(Element::StickyNote(n)) = store.get(note.id()) {
            assert_eq!(n.text, "hello");
        } else {
            panic!("expected sticky note");
        }
    }
}
