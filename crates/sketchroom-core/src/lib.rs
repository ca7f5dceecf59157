//! Sketchroom Core Library
//!
//! Canvas state and collaborative synchronization engine for the Sketchroom
//! multi-user canvas: viewport math, the element data model, selection and
//! multi-element transforms, and the bridge keeping an optimistic local view
//! consistent with a shared replicated document.

pub mod camera;
pub mod collaboration;
pub mod colors;
pub mod crdt;
pub mod editor;
pub mod elements;
pub mod input;
pub mod presence;
pub mod selection;
pub mod store;
pub mod sync;
pub mod tools;
pub mod transform;

pub use camera::{Camera, MAX_ZOOM, MIN_ZOOM, ZOOM_INTENSITY};
pub use collaboration::{SyncBridge, TextCommitQueue, TEXT_COMMIT_DEBOUNCE};
pub use colors::{fallback_color, fetch_user_color, user_color, ColorError, PASTEL_PALETTE};
pub use crdt::ReplicatedDocument;
pub use editor::{Editor, EditorEffect};
pub use elements::{
    DrawPath, Element, ElementId, ElementKind, ScreenShare, ShapeDraft, ShapeFigure, ShapeKind,
    StickyNote,
};
pub use input::{ClickTracker, Modifiers, MouseButton, PointerEvent};
pub use presence::{Member, PresenceRegistry};
pub use selection::{SelectionBox, SelectionState, MIN_SELECTION_SIZE};
pub use store::ElementStore;
pub use sync::{AwarenessState, ConnectionState, SyncError, SyncEvent, SyncSocket};
pub use tools::ToolKind;
pub use transform::{Handle, TransformState};
