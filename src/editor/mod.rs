//! # Editor Surface
//!
//! The only way to mutate a [`CanvasDocument`]. Every committed mutation
//! re-serializes the document and hands the string to the owning form
//! through a [`ChangeSink`]; persisting it is the form's business.
//!
//! ```
//! use kioskboard::editor::{EditorSurface, FormField, WidgetPatch};
//! use kioskboard::document::WidgetType;
//!
//! let mut editor = EditorSurface::open(None, FormField::default());
//! let id = editor.add_widget(WidgetType::Text, WidgetPatch::content("hi"));
//! editor.update_widget(&id, WidgetPatch::position(120.0, 80.0));
//! assert_eq!(editor.sink().changes(), 2);
//! assert!(editor.sink().value().unwrap().contains("\"x\":120"));
//! ```

pub mod gesture;
mod upload;

pub use gesture::{ContainerMetrics, DragGesture, Edges, MIN_WIDGET_WIDTH, Point, Rect, ResizeGesture};
pub use upload::UploadTicket;

use tracing::{debug, info, warn};

use crate::document::{CanvasDocument, Dimension, Widget, WidgetId, WidgetKind, WidgetType};
use crate::error::{KioskError, StorageError};
use crate::storage::{ObjectStorage, StoredObject, UploadFile};
use upload::UploadQueue;

/// Where a newly added widget is placed.
pub const DEFAULT_POSITION: (f64, f64) = (50.0, 50.0);

/// Receives the serialized document after every committed mutation.
pub trait ChangeSink {
    fn content_changed(&mut self, serialized: &str);
}

impl<F> ChangeSink for F
where
    F: FnMut(&str),
{
    fn content_changed(&mut self, serialized: &str) {
        self(serialized)
    }
}

/// A form field holding the latest serialized content.
#[derive(Debug, Clone, Default)]
pub struct FormField {
    value: Option<String>,
    changes: usize,
}

impl FormField {
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Number of change notifications received.
    pub fn changes(&self) -> usize {
        self.changes
    }
}

impl ChangeSink for FormField {
    fn content_changed(&mut self, serialized: &str) {
        self.value = Some(serialized.to_string());
        self.changes += 1;
    }
}

/// Partial widget fields, merged over an existing widget.
///
/// `type` is absent: it is fixed at creation. `url` only
/// applies to buttons and is ignored elsewhere.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidgetPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<Dimension>,
    pub height: Option<Dimension>,
    pub content: Option<String>,
    pub url: Option<String>,
}

impl WidgetPatch {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn width(width: f64) -> Self {
        Self {
            width: Some(Dimension::from_px(width)),
            ..Default::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    fn apply(self, widget: &mut Widget) {
        if let Some(x) = self.x.filter(|v| v.is_finite()) {
            widget.x = x;
        }
        if let Some(y) = self.y.filter(|v| v.is_finite()) {
            widget.y = y;
        }
        if let Some(width) = self.width {
            widget.width = width.normalized();
        }
        if let Some(height) = self.height {
            widget.height = height.normalized();
        }
        if let Some(content) = self.content {
            widget.kind.set_content(content);
        }
        if let Some(url) = self.url
            && !widget.kind.set_url(url)
        {
            debug!("ignoring url on {} widget {}", widget.widget_type(), widget.id);
        }
    }
}

/// Interactive editing session over one canvas document.
pub struct EditorSurface<S: ChangeSink> {
    document: CanvasDocument,
    sink: S,
    uploads: UploadQueue,
    notice: Option<String>,
}

impl<S: ChangeSink> EditorSurface<S> {
    /// Open a content field for editing. Anything that is not a canvas
    /// document starts an empty canvas.
    pub fn open(raw: Option<&str>, sink: S) -> Self {
        Self::new(CanvasDocument::parse(raw), sink)
    }

    pub fn new(document: CanvasDocument, sink: S) -> Self {
        Self {
            document,
            sink,
            uploads: UploadQueue::default(),
            notice: None,
        }
    }

    pub fn document(&self) -> &CanvasDocument {
        &self.document
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn serialized(&self) -> String {
        self.document.serialize()
    }

    /// End the session, handing back the document and the sink.
    /// Uploads still in flight are abandoned.
    pub fn into_parts(mut self) -> (CanvasDocument, S) {
        let abandoned = self.uploads.cancel_all();
        if abandoned > 0 {
            debug!("editor closed with {} uploads in flight", abandoned);
        }
        (self.document, self.sink)
    }

    fn notify(&mut self) {
        let serialized = self.document.serialize();
        self.sink.content_changed(&serialized);
    }

    /// Append a new widget with default geometry, merged with `extra`.
    pub fn add_widget(&mut self, widget_type: WidgetType, extra: WidgetPatch) -> WidgetId {
        let id = self.document.next_id();
        let (x, y) = DEFAULT_POSITION;
        let mut widget = Widget {
            id: id.clone(),
            kind: WidgetKind::empty(widget_type),
            x,
            y,
            width: Dimension::Px(widget_type.default_width()),
            height: Dimension::Auto,
            extra: Default::default(),
        };
        extra.apply(&mut widget);
        debug!("added {} widget {}", widget_type, id);
        self.document.push(widget);
        self.notify();
        id
    }

    pub fn add_text(&mut self, content: impl Into<String>) -> WidgetId {
        self.add_widget(WidgetType::Text, WidgetPatch::content(content))
    }

    /// Add a button. Both the label and the link are required.
    pub fn add_button(&mut self, label: &str, url: &str) -> Option<WidgetId> {
        if label.is_empty() || url.is_empty() {
            return None;
        }
        Some(self.add_widget(WidgetType::Button, WidgetPatch::content(label).with_url(url)))
    }

    pub fn add_image(&mut self, url: impl Into<String>) -> WidgetId {
        self.add_widget(WidgetType::Image, WidgetPatch::content(url))
    }

    /// Merge `patch` into the widget with `id`. Unknown ids are ignored
    /// without notifying. Returns whether the widget exists.
    pub fn update_widget(&mut self, id: &WidgetId, patch: WidgetPatch) -> bool {
        match self.document.get_mut(id) {
            Some(widget) => {
                patch.apply(widget);
                self.notify();
                true
            }
            None => {
                debug!("update of unknown widget {} ignored", id);
                false
            }
        }
    }

    /// Delete the widget with `id`. Unknown ids are ignored without notifying.
    pub fn remove_widget(&mut self, id: &WidgetId) -> bool {
        match self.document.remove(id) {
            Some(_) => {
                debug!("removed widget {}", id);
                self.notify();
                true
            }
            None => false,
        }
    }

    /// Start dragging a widget from the given pointer position.
    pub fn begin_drag(&mut self, id: &WidgetId, pointer: Point) -> Option<DragGesture<'_, S>> {
        DragGesture::start(self, id, pointer)
    }

    /// Start resizing a widget's width from the given pointer x.
    pub fn begin_resize(&mut self, id: &WidgetId, pointer_x: f64) -> Option<ResizeGesture<'_, S>> {
        ResizeGesture::start(self, id, pointer_x)
    }

    /// Register an upload about to be sent to object storage.
    pub fn begin_upload(&mut self) -> UploadTicket {
        self.uploads.issue()
    }

    /// Drop an in-flight upload; its response will be ignored.
    pub fn cancel_upload(&mut self, ticket: UploadTicket) -> bool {
        self.uploads.cancel(ticket)
    }

    pub fn pending_uploads(&self) -> usize {
        self.uploads.pending()
    }

    /// Apply the outcome of an upload.
    ///
    /// Success appends an image widget to the current document. Failure
    /// leaves the document untouched and sets a [`notice`](Self::notice).
    /// A cancelled or unknown ticket is discarded and yields `Ok(None)`.
    pub fn finish_upload(
        &mut self,
        ticket: UploadTicket,
        result: Result<StoredObject, StorageError>,
    ) -> Result<Option<WidgetId>, KioskError> {
        if !self.uploads.complete(ticket) {
            debug!("discarding response for upload {}", ticket.token());
            return Ok(None);
        }
        match result {
            Ok(stored) => {
                info!("upload {} stored at {}", ticket.token(), stored.url);
                Ok(Some(self.add_image(stored.url)))
            }
            Err(e) => {
                warn!("upload {} failed: {}", ticket.token(), e);
                self.notice = Some(format!("Image upload failed: {}", e));
                Err(e.into())
            }
        }
    }

    /// Upload a file and add it as an image widget.
    pub async fn upload_image<O>(
        &mut self,
        storage: &O,
        file: UploadFile,
    ) -> Result<Option<WidgetId>, KioskError>
    where
        O: ObjectStorage + ?Sized,
    {
        let ticket = self.begin_upload();
        let result = storage.put(file).await;
        self.finish_upload(ticket, result)
    }

    /// The current user-visible error message, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}
