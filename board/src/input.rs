//! Input model: tools, pointer points, and the gesture state machine.
//!
//! `Gesture` is the active gesture being tracked between pointer-down and
//! pointer-up, carrying the context needed to compute the preview shape on
//! every move and to commit (or discard) on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use protocol::doc::{DEFAULT_COLOR, DEFAULT_STROKE_WIDTH, StrokeTool};

/// A pointer position in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Freehand pen.
    Pen,
    /// Freehand eraser.
    Eraser,
    /// Draw a straight line segment.
    Line,
    /// Draw an axis-aligned rectangle.
    Rectangle,
    /// Draw a circle inscribed in the drag box.
    Circle,
}

impl Tool {
    /// Whether this tool draws freehand strokes.
    #[must_use]
    pub fn is_freehand(self) -> bool {
        matches!(self, Self::Pen | Self::Eraser)
    }

    /// Whether this tool previews a shape between down and up.
    #[must_use]
    pub fn is_shape(self) -> bool {
        matches!(self, Self::Line | Self::Rectangle | Self::Circle)
    }

    /// The stroke tool this maps to, for freehand tools only.
    #[must_use]
    pub fn stroke_tool(self) -> Option<StrokeTool> {
        match self {
            Self::Pen => Some(StrokeTool::Pen),
            Self::Eraser => Some(StrokeTool::Eraser),
            _ => None,
        }
    }
}

/// Color and stroke width applied to newly created strokes and shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolStyle {
    pub color: String,
    pub stroke_width: f64,
}

impl Default for ToolStyle {
    fn default() -> Self {
        Self { color: DEFAULT_COLOR.to_string(), stroke_width: DEFAULT_STROKE_WIDTH }
    }
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Currently active tool.
    pub tool: Tool,
    /// Id of the currently selected shape, if any. Select-tool only.
    pub selected_id: Option<String>,
    /// Style applied to new strokes and shapes.
    pub style: ToolStyle,
}

/// The active gesture between pointer-down and pointer-up.
///
/// Each variant pins the page the gesture started on: a remote snapshot may
/// switch or reshape the document mid-gesture, and the gesture must keep
/// writing to the page it began on (or stop, if that page vanished).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A freehand stroke is being extended on `page_id`.
    Drawing { page_id: u64 },
    /// A shape preview is being dragged out from `start` on `page_id`.
    Previewing { tool: Tool, start: Point, page_id: u64 },
}
