//! Tool identifiers driving pointer-gesture dispatch.

use crate::elements::ShapeKind;
use serde::{Deserialize, Serialize};

/// The active tool decides what a pointer gesture means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    /// Click/box selection and handle transforms.
    #[default]
    Select,
    /// Pan the viewport.
    Pan,
    /// Freehand path drawing.
    Draw,
    /// Place a sticky note.
    StickyNote,
    /// Drag out a shape of the given kind.
    Shape(ShapeKind),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_select() {
        assert_eq!(ToolKind::default(), ToolKind::Select);
    }

    #[test]
    fn test_shape_tool_carries_kind() {
        let tool = ToolKind::Shape(ShapeKind::Triangle);
        assert!(matches!(tool, ToolKind::Shape(ShapeKind::Triangle)));
    }
}
