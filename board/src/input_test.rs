use protocol::doc::StrokeTool;

use super::*;

// =============================================================
// Tool
// =============================================================

#[test]
fn tool_default_is_select() {
    assert_eq!(Tool::default(), Tool::Select);
}

#[test]
fn freehand_and_shape_predicates_partition_the_tools() {
    let all = [Tool::Select, Tool::Pen, Tool::Eraser, Tool::Line, Tool::Rectangle, Tool::Circle];
    for tool in all {
        assert!(
            !(tool.is_freehand() && tool.is_shape()),
            "{tool:?} cannot be both freehand and shape"
        );
    }
    assert!(Tool::Pen.is_freehand());
    assert!(Tool::Eraser.is_freehand());
    assert!(Tool::Line.is_shape());
    assert!(Tool::Rectangle.is_shape());
    assert!(Tool::Circle.is_shape());
    assert!(!Tool::Select.is_freehand());
    assert!(!Tool::Select.is_shape());
}

#[test]
fn stroke_tool_mapping() {
    assert_eq!(Tool::Pen.stroke_tool(), Some(StrokeTool::Pen));
    assert_eq!(Tool::Eraser.stroke_tool(), Some(StrokeTool::Eraser));
    assert_eq!(Tool::Rectangle.stroke_tool(), None);
    assert_eq!(Tool::Select.stroke_tool(), None);
}

// =============================================================
// Style / state defaults
// =============================================================

#[test]
fn default_style_matches_wire_defaults() {
    let style = ToolStyle::default();
    assert_eq!(style.stroke_width, protocol::doc::DEFAULT_STROKE_WIDTH);
    assert_eq!(style.color, protocol::doc::DEFAULT_COLOR);
}

#[test]
fn ui_state_default_has_no_selection() {
    let ui = UiState::default();
    assert_eq!(ui.tool, Tool::Select);
    assert!(ui.selected_id.is_none());
}

#[test]
fn gesture_default_is_idle() {
    assert_eq!(Gesture::default(), Gesture::Idle);
}

#[test]
fn point_construction() {
    let p = Point::new(1.5, -2.0);
    assert!((p.x - 1.5).abs() < f64::EPSILON);
    assert!((p.y + 2.0).abs() < f64::EPSILON);
}
