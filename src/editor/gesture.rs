//! Drag and resize gesture sessions.
//!
//! A gesture borrows the editor mutably from pointer-down to pointer-up, so
//! no other mutation can interleave with it. Live pointer moves update the
//! working copy without notifying the owning form; `release` commits through
//! [`EditorSurface::update_widget`]. A gesture dropped without `release`
//! (pointer lost, window blurred) puts the widget back where it started.

use tracing::debug;

use super::{ChangeSink, EditorSurface, WidgetPatch};
use crate::document::{Dimension, WidgetId, WidgetType};

/// Narrowest width a resize can produce.
pub const MIN_WIDGET_WIDTH: f64 = 50.0;

/// Width an `auto`-width widget is resized from.
fn auto_start_width(widget_type: WidgetType) -> f64 {
    match widget_type {
        WidgetType::Image => 300.0,
        WidgetType::Text | WidgetType::Button => 200.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A client-space rectangle, as measured from the page.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }
}

/// Geometry of the canvas container at the moment of measurement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContainerMetrics {
    /// Border-box rectangle in client space.
    pub rect: Rect,
    pub border: Edges,
    pub padding: Edges,
    /// Current scroll offset of the container.
    pub scroll: Point,
}

impl ContainerMetrics {
    /// Client-space position of canvas coordinate (0, 0).
    pub fn content_origin(&self) -> Point {
        Point {
            x: self.rect.left + self.border.left + self.padding.left - self.scroll.x,
            y: self.rect.top + self.border.top + self.padding.top - self.scroll.y,
        }
    }

    /// Canvas coordinates of a widget's top-left corner.
    pub fn relative_position(&self, widget: &Rect) -> Point {
        let origin = self.content_origin();
        Point {
            x: widget.left - origin.x,
            y: widget.top - origin.y,
        }
    }
}

/// An in-progress drag of one widget.
pub struct DragGesture<'a, S: ChangeSink> {
    editor: &'a mut EditorSurface<S>,
    id: WidgetId,
    origin: Point,
    pointer_start: Point,
    finished: bool,
}

impl<'a, S: ChangeSink> DragGesture<'a, S> {
    pub(super) fn start(editor: &'a mut EditorSurface<S>, id: &WidgetId, pointer: Point) -> Option<Self> {
        let widget = editor.document.get(id)?;
        let origin = Point::new(widget.x, widget.y);
        debug!("drag start {} at ({}, {})", id, origin.x, origin.y);
        Some(Self {
            editor,
            id: id.clone(),
            origin,
            pointer_start: pointer,
            finished: false,
        })
    }

    pub fn id(&self) -> &WidgetId {
        &self.id
    }

    /// Follow the pointer. Returns the widget's live position.
    pub fn move_to(&mut self, pointer: Point) -> Point {
        let position = Point {
            x: self.origin.x + (pointer.x - self.pointer_start.x),
            y: self.origin.y + (pointer.y - self.pointer_start.y),
        };
        self.set_position(position);
        position
    }

    /// Live position of the widget.
    pub fn position(&self) -> Point {
        self.editor
            .document
            .get(&self.id)
            .map(|w| Point::new(w.x, w.y))
            .unwrap_or(self.origin)
    }

    /// End the drag, recording the widget's measured on-screen position
    /// relative to the container's content box.
    pub fn release(mut self, widget_rect: Rect, container: &ContainerMetrics) -> bool {
        let position = container.relative_position(&widget_rect);
        self.commit_at(position)
    }

    /// End the drag at the position tracked from pointer deltas.
    pub fn commit(mut self) -> bool {
        let position = self.position();
        self.commit_at(position)
    }

    fn commit_at(&mut self, position: Point) -> bool {
        self.finished = true;
        self.editor.update_widget(
            &self.id,
            WidgetPatch {
                x: Some(position.x),
                y: Some(position.y),
                ..Default::default()
            },
        )
    }

    fn set_position(&mut self, position: Point) {
        if let Some(widget) = self.editor.document.get_mut(&self.id) {
            widget.x = position.x;
            widget.y = position.y;
        }
    }
}

impl<S: ChangeSink> Drop for DragGesture<'_, S> {
    fn drop(&mut self) {
        if !self.finished {
            debug!("drag of {} abandoned, restoring position", self.id);
            let origin = self.origin;
            self.set_position(origin);
        }
    }
}

/// An in-progress horizontal resize of one widget.
pub struct ResizeGesture<'a, S: ChangeSink> {
    editor: &'a mut EditorSurface<S>,
    id: WidgetId,
    original: Dimension,
    start_width: f64,
    pointer_start_x: f64,
    finished: bool,
}

impl<'a, S: ChangeSink> ResizeGesture<'a, S> {
    pub(super) fn start(editor: &'a mut EditorSurface<S>, id: &WidgetId, pointer_x: f64) -> Option<Self> {
        let widget = editor.document.get(id)?;
        let original = widget.width;
        let start_width = original
            .px()
            .unwrap_or_else(|| auto_start_width(widget.widget_type()));
        Some(Self {
            editor,
            id: id.clone(),
            original,
            start_width,
            pointer_start_x: pointer_x,
            finished: false,
        })
    }

    pub fn id(&self) -> &WidgetId {
        &self.id
    }

    /// Follow the pointer horizontally. Returns the live width.
    pub fn move_to(&mut self, pointer_x: f64) -> f64 {
        let width = (self.start_width + (pointer_x - self.pointer_start_x)).max(MIN_WIDGET_WIDTH);
        self.set_width(Dimension::Px(width));
        width
    }

    /// End the resize, committing the live width.
    pub fn release(mut self) -> bool {
        self.finished = true;
        let width = self
            .editor
            .document
            .get(&self.id)
            .map(|w| w.width)
            .unwrap_or(self.original);
        self.editor.update_widget(
            &self.id,
            WidgetPatch {
                width: Some(width),
                ..Default::default()
            },
        )
    }

    fn set_width(&mut self, width: Dimension) {
        if let Some(widget) = self.editor.document.get_mut(&self.id) {
            widget.width = width;
        }
    }
}

impl<S: ChangeSink> Drop for ResizeGesture<'_, S> {
    fn drop(&mut self) {
        if !self.finished {
            debug!("resize of {} abandoned, restoring width", self.id);
            let original = self.original;
            self.set_width(original);
        }
    }
}
