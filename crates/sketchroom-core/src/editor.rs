//! Root state container wiring camera, store, selection and transforms.
//!
//! The editor owns all engine state explicitly (no ambient globals) and
//! turns pointer events into store/selection/camera mutations. Local
//! commits surface as [`EditorEffect`]s for the embedding application to
//! mirror through the sync bridge; everything here is synchronous per input
//! event.

use crate::camera::Camera;
use crate::elements::{point_in_rect, Element, ElementId};
use crate::input::{ClickTracker, Modifiers, MouseButton, PointerEvent};
use crate::selection::SelectionState;
use crate::store::ElementStore;
use crate::tools::ToolKind;
use crate::transform::{Handle, TransformState};
use kurbo::Point;

/// A local mutation the caller must mirror to the sync bridge, or an edit
/// transition it must react to.
#[derive(Debug, Clone)]
pub enum EditorEffect {
    /// A new or updated element to write to the replicated document.
    Commit(Element),
    /// An element to delete from the replicated document.
    Remove(ElementId),
    /// A sticky note entered text-edit mode.
    EditingStarted(ElementId),
    /// A sticky note left text-edit mode; pending debounced text for it
    /// should be flushed.
    EditingEnded(ElementId),
}

/// The gesture currently owning pointer input.
#[derive(Debug, Clone, Default)]
enum Gesture {
    #[default]
    Idle,
    Pan,
    Draw,
    Shape,
    BoxSelect,
    Transform(TransformState),
}

/// The canvas editor root.
#[derive(Debug, Clone)]
pub struct Editor {
    pub camera: Camera,
    pub store: ElementStore,
    pub selection: SelectionState,
    tool: ToolKind,
    gesture: Gesture,
    clicks: ClickTracker,
    space_held: bool,
    user_color: String,
}

impl Editor {
    /// Create an editor drawing in the given user color.
    pub fn new(user_color: impl Into<String>) -> Self {
        Self {
            camera: Camera::new(),
            store: ElementStore::new(),
            selection: SelectionState::new(),
            tool: ToolKind::Select,
            gesture: Gesture::Idle,
            clicks: ClickTracker::new(),
            space_held: false,
            user_color: user_color.into(),
        }
    }

    /// The active tool.
    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    /// Switch tools, abandoning any gesture in progress.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.cancel_gesture();
        self.tool = tool;
    }

    /// The color applied to elements this user creates.
    pub fn user_color(&self) -> &str {
        &self.user_color
    }

    /// Update the user color (assigned asynchronously by the color service).
    pub fn set_user_color(&mut self, color: impl Into<String>) {
        self.user_color = color.into();
    }

    /// Track the spacebar, which forces panning while held.
    pub fn set_space_held(&mut self, held: bool) {
        self.space_held = held;
    }

    /// Route a unified pointer event. Only the left button drives gestures.
    pub fn handle_pointer(&mut self, event: PointerEvent, modifiers: Modifiers) -> Vec<EditorEffect> {
        match event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => self.on_pointer_down(position, modifiers),
            PointerEvent::Down { .. } => Vec::new(),
            PointerEvent::Up { position } => self.on_pointer_up(position),
            PointerEvent::Move { position } => {
                self.on_pointer_move(position);
                Vec::new()
            }
            PointerEvent::Scroll { position, delta_y } => {
                self.on_wheel(position, delta_y);
                Vec::new()
            }
        }
    }

    /// Handle pointer-down at a container-relative screen position.
    pub fn on_pointer_down(&mut self, screen: Point, modifiers: Modifiers) -> Vec<EditorEffect> {
        let canvas = self.camera.screen_to_canvas(screen, Point::ZERO);
        let double_click = self.clicks.click(screen);
        let mut effects = Vec::new();

        // Pointer-down anywhere off the editing note commits its edit.
        if let Some(editing) = self.selection.editing() {
            let on_note = self
                .store
                .get(editing)
                .map(|el| point_in_rect(canvas, el.bounds()))
                .unwrap_or(false);
            if !on_note {
                self.selection.stop_editing();
                effects.push(EditorEffect::EditingEnded(editing));
            }
        }

        if self.space_held || self.tool == ToolKind::Pan {
            self.camera.start_drag(screen);
            self.gesture = Gesture::Pan;
            return effects;
        }

        match self.tool {
            ToolKind::Select => {
                let hit = self
                    .selection
                    .click_select(&self.store, canvas, modifiers.shift);
                match hit {
                    Some(id) => {
                        if double_click
                            && matches!(self.store.get(id), Some(Element::StickyNote(_)))
                        {
                            if let Some(previous) = self.selection.begin_editing(id) {
                                effects.push(EditorEffect::EditingEnded(previous));
                            }
                            effects.push(EditorEffect::EditingStarted(id));
                        }
                    }
                    None => {
                        if !modifiers.shift {
                            self.selection.begin_box_select(canvas);
                            self.gesture = Gesture::BoxSelect;
                        }
                    }
                }
            }
            ToolKind::Draw => {
                self.store.start_drawing(canvas);
                self.gesture = Gesture::Draw;
            }
            ToolKind::StickyNote => {
                let element = self.store.create_sticky_note(canvas, &self.user_color);
                let id = element.id();
                self.selection.select([id]);
                if let Some(previous) = self.selection.begin_editing(id) {
                    effects.push(EditorEffect::EditingEnded(previous));
                }
                effects.push(EditorEffect::Commit(element));
                effects.push(EditorEffect::EditingStarted(id));
            }
            ToolKind::Shape(kind) => {
                self.selection.clear();
                self.store.start_shape(kind, canvas);
                self.gesture = Gesture::Shape;
            }
            ToolKind::Pan => {}
        }

        effects
    }

    /// Handle pointer movement at a container-relative screen position.
    pub fn on_pointer_move(&mut self, screen: Point) {
        let canvas = self.camera.screen_to_canvas(screen, Point::ZERO);
        match &self.gesture {
            Gesture::Pan => self.camera.update_drag(screen),
            Gesture::Draw => self.store.extend_drawing(canvas),
            Gesture::Shape => self.store.update_shape(canvas),
            Gesture::BoxSelect => self.selection.update_box_select(canvas),
            Gesture::Transform(state) => state.update(canvas, &mut self.store),
            Gesture::Idle => {}
        }
    }

    /// Handle pointer-up, committing whatever gesture was in progress.
    pub fn on_pointer_up(&mut self, _screen: Point) -> Vec<EditorEffect> {
        let mut effects = Vec::new();
        match std::mem::take(&mut self.gesture) {
            Gesture::Pan => self.camera.stop_drag(),
            Gesture::Draw => {
                if let Some(element) = self.store.finish_drawing(&self.user_color) {
                    effects.push(EditorEffect::Commit(element));
                }
            }
            Gesture::Shape => {
                if let Some(element) = self.store.finish_shape(&self.user_color) {
                    effects.push(EditorEffect::Commit(element));
                }
            }
            Gesture::BoxSelect => self.selection.end_box_select(&self.store),
            Gesture::Transform(state) => {
                for element in state.finish(&self.store) {
                    effects.push(EditorEffect::Commit(element));
                }
            }
            Gesture::Idle => {}
        }
        effects
    }

    /// Handle a wheel event: zoom about the cursor.
    pub fn on_wheel(&mut self, screen: Point, delta_y: f64) {
        self.camera.handle_wheel(screen, delta_y);
    }

    /// Begin a handle transform on the current selection. Returns false for
    /// an empty selection (handles are only hit-testable when one exists).
    pub fn begin_transform(&mut self, handle: Handle, screen: Point) -> bool {
        let canvas = self.camera.screen_to_canvas(screen, Point::ZERO);
        match TransformState::begin(handle, canvas, &self.store, &self.selection) {
            Some(state) => {
                self.gesture = Gesture::Transform(state);
                true
            }
            None => false,
        }
    }

    /// Delete every selected element.
    pub fn delete_selection(&mut self) -> Vec<EditorEffect> {
        let ids: Vec<ElementId> = self.selection.selected().iter().copied().collect();
        let mut effects = Vec::new();
        for id in ids {
            if self.store.remove(id).is_some() {
                effects.push(EditorEffect::Remove(id));
            }
            self.selection.forget(id);
        }
        effects
    }

    /// Abandon the gesture in progress. Transform cancels keep the last
    /// previewed state; drafts are discarded.
    pub fn cancel_gesture(&mut self) {
        match std::mem::take(&mut self.gesture) {
            Gesture::Pan => self.camera.stop_drag(),
            Gesture::Draw => self.store.cancel_drawing(),
            Gesture::Shape => self.store.cancel_shape(),
            Gesture::BoxSelect => self.selection.cancel_box_select(),
            Gesture::Transform(_) | Gesture::Idle => {}
        }
    }

    /// Apply an optimistic local text edit to a note. The caller mirrors the
    /// edit through [`crate::collaboration::SyncBridge::queue_note_text`] so
    /// the remote write is debounced while the local view updates at once.
    pub fn set_note_text(&mut self, id: ElementId, text: &str) -> bool {
        self.store.set_note_text(id, text)
    }

    /// Leave text-edit mode explicitly (Escape / blur).
    pub fn stop_editing(&mut self) -> Option<EditorEffect> {
        self.selection
            .stop_editing()
            .map(EditorEffect::EditingEnded)
    }
}
