//! The client engine: pointer events in, draft mutations and actions out.
//!
//! `Engine` ties the draft, the gesture state machine, the throttle, and
//! the image cache together. Every handler mutates the local draft first
//! (optimistic, zero-latency feedback) and returns [`Action`]s telling the
//! host what to do next: repaint, and/or put the current document on the
//! wire. The engine never touches a socket or a canvas, which is what
//! keeps it testable without a browser or a server.
//!
//! The preview/commit lifecycle:
//!
//! ```text
//! Idle --down(line/rect/circle)--> Previewing --up--> Idle   (promote or discard)
//! Idle --down(pen/eraser)-------> Drawing ----up--> Idle     (always emit)
//! ```
//!
//! A remote snapshot may land mid-gesture and replace the draft wholesale,
//! in-progress work included. That is accepted last-writer-wins behavior;
//! nothing here tries to merge.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use protocol::doc::{Document, MIN_SHAPE_DIM, Shape, ShapeKind, Stroke, TEMP_SHAPE_ID, fresh_shape_id};

use crate::draft::Draft;
use crate::images::{ImageCache, ImageDecoder, ImageHandle, NoopDecoder};
use crate::input::{Gesture, Point, Tool, UiState};
use crate::throttle::EmitThrottle;

/// What the host must do after a handler ran.
#[derive(Debug, Clone)]
pub enum Action {
    /// Send this document to the server as a `draw-update`.
    Emit(Document),
    /// Repaint the rendering surface from the current draft.
    Render,
}

/// The headless client core.
pub struct Engine {
    draft: Draft,
    ui: UiState,
    gesture: Gesture,
    throttle: EmitThrottle,
    images: ImageCache,
    decoder: Box<dyn ImageDecoder>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// An engine with no image decoding (headless hosts, tests).
    #[must_use]
    pub fn new() -> Self {
        Self::with_decoder(Box::new(NoopDecoder))
    }

    /// An engine using the host's image decoder to rebuild bitmap handles
    /// from received snapshots.
    #[must_use]
    pub fn with_decoder(decoder: Box<dyn ImageDecoder>) -> Self {
        Self {
            draft: Draft::new(),
            ui: UiState::default(),
            gesture: Gesture::default(),
            throttle: EmitThrottle::default(),
            images: ImageCache::new(),
            decoder,
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.draft.doc
    }

    #[must_use]
    pub fn current_page_id(&self) -> u64 {
        self.draft.current_page_id
    }

    #[must_use]
    pub fn tool(&self) -> Tool {
        self.ui.tool
    }

    #[must_use]
    pub fn selection(&self) -> Option<&str> {
        self.ui.selected_id.as_deref()
    }

    #[must_use]
    pub fn image_handle(&self, shape_id: &str) -> Option<ImageHandle> {
        self.images.get(shape_id)
    }

    // --- Settings ---

    /// Switch tools. An in-flight preview is discarded; an in-flight
    /// stroke simply stops extending.
    pub fn set_tool(&mut self, tool: Tool) {
        if matches!(self.gesture, Gesture::Previewing { .. }) {
            if let Some(page) = self.draft.current_page_mut() {
                page.take_temp_shape();
            }
        }
        self.gesture = Gesture::Idle;
        self.ui.tool = tool;
        if tool != Tool::Select {
            self.ui.selected_id = None;
        }
    }

    pub fn set_color(&mut self, color: String) {
        self.ui.style.color = color;
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        self.ui.style.stroke_width = width;
    }

    /// Override the stroke emission period (flattened coordinates).
    pub fn set_emit_period(&mut self, period: usize) {
        self.throttle = EmitThrottle::new(period);
    }

    // --- Remote apply ---

    /// Apply a broadcast snapshot: wholesale replacement of the draft,
    /// image handles rebuilt from `imageData`. May clobber an in-flight
    /// local gesture; that race resolves last-writer-wins by design.
    pub fn apply_snapshot(&mut self, doc: Document) -> Vec<Action> {
        self.draft.replace(doc);
        self.images.rebuild(&self.draft.doc, self.decoder.as_ref());
        if let Some(selected) = &self.ui.selected_id {
            let still_there = self
                .draft
                .current_page()
                .is_some_and(|p| p.shapes.iter().any(|s| &s.id == selected));
            if !still_there {
                self.ui.selected_id = None;
            }
        }
        vec![Action::Render]
    }

    // --- Pages ---

    /// Add a page (`id = max + 1`), switch to it, and share it.
    pub fn add_page(&mut self) -> Vec<Action> {
        self.draft.add_page();
        vec![Action::Render, self.emit()]
    }

    /// Switch the edited page. Client-local; nothing is emitted.
    pub fn set_current_page(&mut self, id: u64) -> Vec<Action> {
        if self.draft.set_current_page(id) {
            vec![Action::Render]
        } else {
            vec![]
        }
    }

    // --- Pointer lifecycle ---

    pub fn on_pointer_down(&mut self, p: Point) -> Vec<Action> {
        let tool = self.ui.tool;
        let page_id = self.draft.current_page_id;
        if let Some(stroke_tool) = tool.stroke_tool() {
            let style = self.ui.style.clone();
            let Some(page) = self.draft.current_page_mut() else {
                return vec![];
            };
            page.strokes
                .push(Stroke::begin(stroke_tool, p.x, p.y, style.color, style.stroke_width));
            self.gesture = Gesture::Drawing { page_id };
            return vec![Action::Render];
        }
        if tool.is_shape() {
            let temp = self.preview_shape(tool, p, p);
            let Some(page) = self.draft.current_page_mut() else {
                return vec![];
            };
            page.put_temp_shape(temp);
            self.gesture = Gesture::Previewing { tool, start: p, page_id };
            return vec![Action::Render];
        }
        // Select: hits are reported by the renderer via on_shape_pointer_down.
        vec![]
    }

    pub fn on_pointer_move(&mut self, p: Point) -> Vec<Action> {
        match self.gesture.clone() {
            Gesture::Idle => vec![],
            Gesture::Drawing { page_id } => self.extend_stroke(page_id, p),
            Gesture::Previewing { tool, start, page_id } => {
                let temp = self.preview_shape(tool, start, p);
                let Some(page) = self.draft.doc.page_mut(page_id) else {
                    // The page vanished under a remote snapshot; the
                    // gesture has nothing left to write to.
                    self.gesture = Gesture::Idle;
                    return vec![];
                };
                page.put_temp_shape(temp);
                vec![Action::Render, self.emit()]
            }
        }
    }

    pub fn on_pointer_up(&mut self, _p: Point) -> Vec<Action> {
        match self.gesture.clone() {
            Gesture::Idle => vec![],
            Gesture::Drawing { .. } => {
                // Unconditional emit: the last segment must never be lost
                // to the throttle.
                self.gesture = Gesture::Idle;
                vec![Action::Render, self.emit()]
            }
            Gesture::Previewing { page_id, .. } => {
                self.gesture = Gesture::Idle;
                if let Some(page) = self.draft.doc.page_mut(page_id) {
                    if let Some(mut shape) = page.take_temp_shape() {
                        if shape.has_extent() {
                            shape.id = fresh_shape_id();
                            page.shapes.push(shape);
                        }
                        // Zero-extent click: discarded, no shape.
                    }
                }
                vec![Action::Render, self.emit()]
            }
        }
    }

    // --- Selection / transforms (renderer-reported) ---

    /// The renderer hit a shape on pointer-down while the select tool is
    /// active.
    pub fn on_shape_pointer_down(&mut self, id: &str) {
        if self.ui.tool == Tool::Select && id != TEMP_SHAPE_ID {
            self.ui.selected_id = Some(id.to_string());
        }
    }

    pub fn clear_selection(&mut self) {
        self.ui.selected_id = None;
    }

    /// A drag gesture on a shape finished: new position and rotation.
    pub fn on_drag_end(&mut self, id: &str, x: f64, y: f64, rotation: f64) -> Vec<Action> {
        let Some(shape) = self.draft.current_page_mut().and_then(|pg| pg.shape_mut(id)) else {
            return vec![];
        };
        shape.x = x;
        shape.y = y;
        shape.rotation = rotation;
        vec![Action::Render, self.emit()]
    }

    /// A resize/rotate gesture on a shape finished.
    ///
    /// Dimensions are floored at [`MIN_SHAPE_DIM`]. For lines, the stored
    /// two-point segment is rescaled by the dimension ratio — the endpoint
    /// is derived from the segment, not recomputed from the bounding box.
    pub fn on_transform_end(
        &mut self,
        id: &str,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rotation: f64,
    ) -> Vec<Action> {
        let Some(shape) = self.draft.current_page_mut().and_then(|pg| pg.shape_mut(id)) else {
            return vec![];
        };
        let width = width.max(MIN_SHAPE_DIM);
        let height = height.max(MIN_SHAPE_DIM);
        if let ShapeKind::Line { points } = &mut shape.kind {
            let sx = if shape.width > 0.0 { width / shape.width } else { 1.0 };
            let sy = if shape.height > 0.0 { height / shape.height } else { 1.0 };
            for (i, coord) in points.iter_mut().enumerate() {
                *coord *= if i % 2 == 0 { sx } else { sy };
            }
        }
        shape.x = x;
        shape.y = y;
        shape.width = width;
        shape.height = height;
        shape.rotation = rotation;
        vec![Action::Render, self.emit()]
    }

    // --- Images ---

    /// Insert an image shape from a host-decoded file: the data URI is the
    /// persisted representation, the natural dimensions size the shape,
    /// and the handle goes straight into the cache.
    pub fn insert_image(&mut self, data_uri: &str, width: u32, height: u32) -> Vec<Action> {
        let id = fresh_shape_id();
        let shape = Shape {
            id: id.clone(),
            x: 0.0,
            y: 0.0,
            width: f64::from(width),
            height: f64::from(height),
            stroke_width: self.ui.style.stroke_width,
            color: self.ui.style.color.clone(),
            rotation: 0.0,
            kind: ShapeKind::Image { image_data: data_uri.to_string() },
        };
        let Some(page) = self.draft.current_page_mut() else {
            return vec![];
        };
        page.shapes.push(shape);
        self.images.insert(id, ImageHandle { width, height });
        vec![Action::Render, self.emit()]
    }

    // --- Internals ---

    fn emit(&self) -> Action {
        Action::Emit(self.draft.doc.clone())
    }

    /// Append a point pair to the in-progress stroke, restarting the
    /// stroke if a remote snapshot wiped it mid-gesture.
    fn extend_stroke(&mut self, page_id: u64, p: Point) -> Vec<Action> {
        let Some(stroke_tool) = self.ui.tool.stroke_tool() else {
            self.gesture = Gesture::Idle;
            return vec![];
        };
        let style = self.ui.style.clone();
        let coord_count;
        {
            let Some(page) = self.draft.doc.page_mut(page_id) else {
                self.gesture = Gesture::Idle;
                return vec![];
            };
            if let Some(stroke) = page.strokes.last_mut() {
                stroke.points.push(p.x);
                stroke.points.push(p.y);
                coord_count = stroke.points.len();
            } else {
                page.strokes
                    .push(Stroke::begin(stroke_tool, p.x, p.y, style.color, style.stroke_width));
                coord_count = 2;
            }
        }
        let mut actions = vec![Action::Render];
        if self.throttle.should_emit(coord_count) {
            actions.push(self.emit());
        }
        actions
    }

    /// Compute the preview shape for a drag from `start` to `cur`.
    ///
    /// Rectangle/circle: axis-aligned box from the min/max of the two
    /// points. Line: the literal segment, stored relative to `start`.
    fn preview_shape(&self, tool: Tool, start: Point, cur: Point) -> Shape {
        let kind = match tool {
            Tool::Line => {
                ShapeKind::Line { points: vec![0.0, 0.0, cur.x - start.x, cur.y - start.y] }
            }
            Tool::Circle => ShapeKind::Circle,
            _ => ShapeKind::Rectangle,
        };
        let (x, y) = if tool == Tool::Line {
            (start.x, start.y)
        } else {
            (start.x.min(cur.x), start.y.min(cur.y))
        };
        Shape {
            id: TEMP_SHAPE_ID.to_string(),
            x,
            y,
            width: (cur.x - start.x).abs(),
            height: (cur.y - start.y).abs(),
            stroke_width: self.ui.style.stroke_width,
            color: self.ui.style.color.clone(),
            rotation: 0.0,
            kind,
        }
    }
}
