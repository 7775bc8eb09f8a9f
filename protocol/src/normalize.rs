//! Shape normalizer: untrusted page payloads in, valid documents out.
//!
//! Inbound `pages` arrive as raw JSON from arbitrary clients; missing and
//! malformed fields are expected. Normalization is total — it never
//! errors and never rejects a frame, trading correctness-by-rejection for
//! availability. The functions here are the smart constructors for the
//! typed model: nothing becomes authoritative state without passing
//! through them.
//!
//! The one open policy decision — repair a shape whose geometry is
//! missing, or drop it — is configurable via [`MalformedShapePolicy`].

#[cfg(test)]
#[path = "normalize_test.rs"]
mod normalize_test;

use serde_json::Value;

use crate::doc::{
    CompositeMode, DEFAULT_COLOR, DEFAULT_SHAPE_SIZE, DEFAULT_STROKE_WIDTH, Document, Page, Shape,
    ShapeKind, Stroke, StrokeTool, fresh_shape_id,
};

/// What to do with a shape record that is missing geometry fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedShapePolicy {
    /// Fill `x=0, y=0, width=10, height=10` and keep the shape. Silently
    /// changes the shape's geometry, but every client converges on it.
    #[default]
    FillDefaults,
    /// Drop a shape missing any of `x`, `y`, `width`, `height` instead of
    /// inventing a position for it.
    Drop,
}

/// Normalize a raw `pages` payload into a typed [`Document`].
///
/// Total: any input produces a document. Pages missing an `id` are
/// assigned their 1-based position. Shapes whose `type` matches no known
/// variant are dropped under either policy — there is no variant to hold
/// them.
#[must_use]
pub fn normalize_pages(pages: &[Value], policy: MalformedShapePolicy) -> Document {
    let pages = pages
        .iter()
        .enumerate()
        .map(|(idx, raw)| normalize_page(raw, idx as u64 + 1, policy))
        .collect();
    Document { pages }
}

fn normalize_page(raw: &Value, fallback_id: u64, policy: MalformedShapePolicy) -> Page {
    let id = raw.get("id").and_then(Value::as_u64).unwrap_or(fallback_id);
    // Non-array (or absent) collections coerce to empty.
    let strokes = raw
        .get("strokes")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(normalize_stroke).collect())
        .unwrap_or_default();
    let shapes = raw
        .get("shapes")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| normalize_shape(item, policy))
                .collect()
        })
        .unwrap_or_default();
    Page { id, strokes, shapes }
}

fn normalize_stroke(raw: &Value) -> Option<Stroke> {
    let obj = raw.as_object()?;
    let tool = match obj.get("tool").and_then(Value::as_str) {
        Some("eraser") => StrokeTool::Eraser,
        _ => StrokeTool::Pen,
    };
    let mut points = number_list(obj.get("points"));
    // Points are coordinate pairs; a trailing odd coordinate is garbage.
    if points.len() % 2 != 0 {
        points.pop();
    }
    let compositing_mode = match obj.get("compositingMode").and_then(Value::as_str) {
        Some("erase") => CompositeMode::Erase,
        Some("normal") => CompositeMode::Normal,
        _ => match tool {
            StrokeTool::Pen => CompositeMode::Normal,
            StrokeTool::Eraser => CompositeMode::Erase,
        },
    };
    let stroke_width = obj
        .get("strokeWidth")
        .and_then(Value::as_f64)
        .filter(|w| *w > 0.0)
        .unwrap_or(DEFAULT_STROKE_WIDTH);
    Some(Stroke {
        tool,
        points,
        color: string_or(obj.get("color"), DEFAULT_COLOR),
        stroke_width,
        compositing_mode,
    })
}

fn normalize_shape(raw: &Value, policy: MalformedShapePolicy) -> Option<Shape> {
    let obj = raw.as_object()?;

    let kind = match obj.get("type").and_then(Value::as_str) {
        Some("line") => ShapeKind::Line { points: number_list(obj.get("points")) },
        Some("rectangle") => ShapeKind::Rectangle,
        Some("circle") => ShapeKind::Circle,
        Some("image") => ShapeKind::Image { image_data: string_or(obj.get("imageData"), "") },
        _ => return None,
    };

    let x = obj.get("x").and_then(Value::as_f64);
    let y = obj.get("y").and_then(Value::as_f64);
    let width = obj.get("width").and_then(Value::as_f64);
    let height = obj.get("height").and_then(Value::as_f64);
    if policy == MalformedShapePolicy::Drop
        && (x.is_none() || y.is_none() || width.is_none() || height.is_none())
    {
        return None;
    }

    let id = obj
        .get("id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map_or_else(fresh_shape_id, ToString::to_string);

    Some(Shape {
        id,
        x: x.unwrap_or(0.0),
        y: y.unwrap_or(0.0),
        width: width.unwrap_or(DEFAULT_SHAPE_SIZE),
        height: height.unwrap_or(DEFAULT_SHAPE_SIZE),
        stroke_width: obj
            .get("strokeWidth")
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_STROKE_WIDTH),
        color: string_or(obj.get("color"), DEFAULT_COLOR),
        rotation: obj.get("rotation").and_then(Value::as_f64).unwrap_or(0.0),
        kind,
    })
}

/// Collect the numeric entries of an array value; anything else is empty.
fn number_list(value: Option<&Value>) -> Vec<f64> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_f64).collect())
        .unwrap_or_default()
}

fn string_or(value: Option<&Value>, fallback: &str) -> String {
    value
        .and_then(Value::as_str)
        .map_or_else(|| fallback.to_string(), ToString::to_string)
}
