//! Document model: pages, freehand strokes, and the shape union.
//!
//! The document is an ordered sequence of pages; each page carries its
//! strokes (freehand pen/eraser paths) and shapes (discrete objects with
//! position, size, and rotation). The whole document travels over the wire
//! as one snapshot and is always replaced wholesale, never patched.
//!
//! Shape variants are a tagged union discriminated by the wire `type`
//! field. Only the fields a variant actually uses live on that variant;
//! everything common (position, size, stroke width, color, rotation) lives
//! on [`Shape`] itself.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Model constants ─────────────────────────────────────────────

/// Reserved id of the single in-progress preview shape on a page.
pub const TEMP_SHAPE_ID: &str = "temp";

/// Default width/height for a shape that arrives without one.
pub const DEFAULT_SHAPE_SIZE: f64 = 10.0;

/// Default stroke width for a shape that arrives without one.
pub const DEFAULT_STROKE_WIDTH: f64 = 5.0;

/// Default color for a shape that arrives without one.
pub const DEFAULT_COLOR: &str = "#1F1A17";

/// Floor applied to each shape dimension after any resize.
pub const MIN_SHAPE_DIM: f64 = 5.0;

/// Generate a fresh shape id. Guaranteed to never collide with
/// [`TEMP_SHAPE_ID`].
#[must_use]
pub fn fresh_shape_id() -> String {
    Uuid::new_v4().to_string()
}

// ── Document / Page ─────────────────────────────────────────────

/// The entire shared board state: ordered pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub pages: Vec<Page>,
}

impl Document {
    /// A document with a single empty page `1`, the state a fresh server
    /// starts from.
    #[must_use]
    pub fn initial() -> Self {
        Self { pages: vec![Page::new(1)] }
    }

    /// Highest page id currently in use, or 0 for an empty document.
    #[must_use]
    pub fn max_page_id(&self) -> u64 {
        self.pages.iter().map(|p| p.id).max().unwrap_or(0)
    }

    /// The id the next added page receives: `max + 1`.
    #[must_use]
    pub fn next_page_id(&self) -> u64 {
        self.max_page_id() + 1
    }

    #[must_use]
    pub fn page(&self, id: u64) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    pub fn page_mut(&mut self, id: u64) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| p.id == id)
    }
}

/// One canvas surface. Pages are created with monotonically assigned ids
/// and never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: u64,
    #[serde(default)]
    pub strokes: Vec<Stroke>,
    #[serde(default)]
    pub shapes: Vec<Shape>,
}

impl Page {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self { id, strokes: Vec::new(), shapes: Vec::new() }
    }

    /// The in-progress preview shape, if one exists. At most one per page.
    #[must_use]
    pub fn temp_shape(&self) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.is_temp())
    }

    /// Drop the preview shape, returning it if it was present.
    pub fn take_temp_shape(&mut self) -> Option<Shape> {
        let idx = self.shapes.iter().position(Shape::is_temp)?;
        Some(self.shapes.remove(idx))
    }

    /// Insert or replace the preview shape. Upholds the at-most-one
    /// invariant regardless of what the page held before.
    pub fn put_temp_shape(&mut self, shape: Shape) {
        self.shapes.retain(|s| !s.is_temp());
        self.shapes.push(shape);
    }

    pub fn shape_mut(&mut self, id: &str) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id == id)
    }
}

// ── Stroke ──────────────────────────────────────────────────────

/// Which freehand tool produced a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeTool {
    Pen,
    Eraser,
}

/// How a stroke composites onto the page when painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositeMode {
    Normal,
    Erase,
}

/// A freehand path: flat `[x0, y0, x1, y1, ..]` coordinate pairs,
/// append-only while the gesture is in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    pub tool: StrokeTool,
    #[serde(default)]
    pub points: Vec<f64>,
    pub color: String,
    pub stroke_width: f64,
    pub compositing_mode: CompositeMode,
}

impl Stroke {
    /// Start a stroke at one point with the compositing mode implied by
    /// the tool.
    #[must_use]
    pub fn begin(tool: StrokeTool, x: f64, y: f64, color: String, stroke_width: f64) -> Self {
        let compositing_mode = match tool {
            StrokeTool::Pen => CompositeMode::Normal,
            StrokeTool::Eraser => CompositeMode::Erase,
        };
        Self { tool, points: vec![x, y], color, stroke_width, compositing_mode }
    }
}

// ── Shape ───────────────────────────────────────────────────────

/// Variant payload of a shape, discriminated by the wire `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeKind {
    /// Straight segment `[x1, y1, x2, y2]` relative to the shape origin.
    Line {
        #[serde(default)]
        points: Vec<f64>,
    },
    Rectangle,
    Circle,
    /// Embedded bitmap. The data URI is the sole persisted representation;
    /// decoded handles are per-client caches and never serialized.
    #[serde(rename_all = "camelCase")]
    Image { image_data: String },
}

impl ShapeKind {
    /// Wire name of the variant, matching the serde `type` tag.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Line { .. } => "line",
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::Image { .. } => "image",
        }
    }
}

/// A discrete object on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    /// Unique within the page, except the reserved preview id
    /// [`TEMP_SHAPE_ID`].
    pub id: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default = "default_size")]
    pub width: f64,
    #[serde(default = "default_size")]
    pub height: f64,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    #[serde(default = "default_color")]
    pub color: String,
    /// Clockwise degrees around the shape origin.
    #[serde(default)]
    pub rotation: f64,
    #[serde(flatten)]
    pub kind: ShapeKind,
}

fn default_size() -> f64 {
    DEFAULT_SHAPE_SIZE
}

fn default_stroke_width() -> f64 {
    DEFAULT_STROKE_WIDTH
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

impl Shape {
    /// Whether this is the in-progress preview shape.
    #[must_use]
    pub fn is_temp(&self) -> bool {
        self.id == TEMP_SHAPE_ID
    }

    /// Whether the shape has any visible extent. A line counts as extended
    /// when its two endpoints differ; box shapes when either dimension is
    /// non-zero.
    #[must_use]
    pub fn has_extent(&self) -> bool {
        if let ShapeKind::Line { points } = &self.kind {
            if let [x1, y1, x2, y2] = points[..] {
                return (x1, y1) != (x2, y2);
            }
            return false;
        }
        self.width > 0.0 || self.height > 0.0
    }
}
