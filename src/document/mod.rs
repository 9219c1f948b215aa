//! # Canvas Document
//!
//! An ordered sequence of [`Widget`]s plus the rules for reading and writing
//! it as the JSON text stored in a post's `content` field.
//!
//! ```
//! use kioskboard::document::{CanvasDocument, Content};
//!
//! let doc = CanvasDocument::parse(Some(r#"[{"id":"1","type":"text","content":"hi","x":50,"y":50}]"#));
//! assert_eq!(doc.len(), 1);
//! assert_eq!(CanvasDocument::parse(Some("{\"a\":1}")).len(), 0);
//!
//! // The renderer distinguishes legacy markup from an empty canvas
//! assert!(matches!(Content::classify(Some("<p>old post</p>")), Content::Legacy(_)));
//! ```
//!
//! Insertion order is kept: it decides stacking (later widgets on top) and
//! serialization order, never layout.
//!
//! Array elements this version cannot read as a [`Widget`] (a newer widget
//! type, a missing `id`, a numeric `content`) are kept as
//! [`Entry::Opaque`] values in their original position and written back
//! unchanged, so editing a document never loses content.

pub mod types;

pub use types::*;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, warn};

/// What a persisted `content` string turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// Null or empty string.
    Empty,
    /// A JSON array of widgets.
    Canvas(CanvasDocument),
    /// Anything else: free-form markup from before the canvas editor existed.
    Legacy(String),
}

impl Content {
    /// Classify a persisted content string. Never fails.
    pub fn classify(raw: Option<&str>) -> Self {
        let raw = match raw {
            Some(r) if !r.is_empty() => r,
            _ => return Content::Empty,
        };
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Array(items)) => Content::Canvas(CanvasDocument::from_values(items)),
            Ok(_) => {
                debug!("content is JSON but not an array, treating as legacy markup");
                Content::Legacy(raw.to_string())
            }
            Err(e) => {
                debug!("content is not JSON ({}), treating as legacy markup", e);
                Content::Legacy(raw.to_string())
            }
        }
    }
}

/// One element of the persisted array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entry {
    Widget(Widget),
    /// An element that is not a well-formed widget, kept verbatim.
    Opaque(Value),
}

impl Entry {
    pub fn as_widget(&self) -> Option<&Widget> {
        match self {
            Entry::Widget(w) => Some(w),
            Entry::Opaque(_) => None,
        }
    }

    fn as_widget_mut(&mut self) -> Option<&mut Widget> {
        match self {
            Entry::Widget(w) => Some(w),
            Entry::Opaque(_) => None,
        }
    }

    /// The entry's id, when it has a readable one.
    pub fn id(&self) -> Option<WidgetId> {
        match self {
            Entry::Widget(w) => Some(w.id.clone()),
            Entry::Opaque(v) => v.get("id").and_then(|id| WidgetId::deserialize(id).ok()),
        }
    }
}

/// Iterator over the widgets of a document, skipping opaque entries.
pub struct Widgets<'a>(std::slice::Iter<'a, Entry>);

impl<'a> Iterator for Widgets<'a> {
    type Item = &'a Widget;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.by_ref().find_map(Entry::as_widget)
    }
}

/// Ordered collection of entries with unique widget ids.
#[derive(Debug, Clone, Default)]
pub struct CanvasDocument {
    entries: Vec<Entry>,
    /// Highest millisecond id issued or parsed so far.
    last_id: i64,
}

impl CanvasDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a persisted content string for editing.
    ///
    /// Null, empty, unparsable and non-array content all yield an empty
    /// document. Array entries that are not well-formed widgets are kept as
    /// opaque entries.
    pub fn parse(raw: Option<&str>) -> Self {
        match Content::classify(raw) {
            Content::Canvas(doc) => doc,
            Content::Empty | Content::Legacy(_) => Self::new(),
        }
    }

    /// Build a document from an already-validated widget list.
    ///
    /// Duplicate ids are reassigned so the uniqueness invariant holds.
    pub fn from_widgets(widgets: impl IntoIterator<Item = Widget>) -> Self {
        Self::from_entries(widgets.into_iter().map(Entry::Widget))
    }

    fn from_entries(entries: impl IntoIterator<Item = Entry>) -> Self {
        let mut doc = Self::new();
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();

        for entry in entries {
            if let Some(id) = entry.id() {
                if let Some(ms) = id.as_millis() {
                    doc.last_id = doc.last_id.max(ms);
                }
                if !seen.insert(id) && matches!(entry, Entry::Widget(_)) {
                    duplicates.push(doc.entries.len());
                }
            }
            doc.entries.push(entry);
        }

        for index in duplicates {
            let fresh = doc.next_id();
            if let Some(widget) = doc.entries[index].as_widget_mut() {
                warn!("duplicate widget id {} reassigned to {}", widget.id, fresh);
                widget.id = fresh;
            }
        }

        doc
    }

    fn from_values(items: Vec<Value>) -> Self {
        let entries = items.into_iter().enumerate().map(|(i, item)| {
            match Widget::deserialize(&item) {
                Ok(w) => Entry::Widget(w),
                Err(e) => {
                    debug!("keeping entry {} as opaque: {}", i, e);
                    Entry::Opaque(item)
                }
            }
        });
        Self::from_entries(entries)
    }

    /// Serialize to the persisted form: a compact JSON array in insertion order.
    pub fn serialize(&self) -> String {
        // Entry serialization cannot fail: string keys, finite numbers.
        serde_json::to_string(&self.entries).unwrap_or_else(|_| "[]".to_string())
    }

    /// Every entry, opaque ones included, in document order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn widgets(&self) -> Vec<&Widget> {
        self.iter().collect()
    }

    pub fn iter(&self) -> Widgets<'_> {
        Widgets(self.entries.iter())
    }

    /// Number of editable widgets.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// True when the document has no entries at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &WidgetId) -> Option<&Widget> {
        self.iter().find(|w| &w.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &WidgetId) -> Option<&mut Widget> {
        self.entries
            .iter_mut()
            .filter_map(Entry::as_widget_mut)
            .find(|w| &w.id == id)
    }

    pub(crate) fn push(&mut self, widget: Widget) {
        if let Some(ms) = widget.id.as_millis() {
            self.last_id = self.last_id.max(ms);
        }
        self.entries.push(Entry::Widget(widget));
    }

    pub(crate) fn remove(&mut self, id: &WidgetId) -> Option<Widget> {
        let index = self
            .entries
            .iter()
            .position(|e| e.as_widget().is_some_and(|w| &w.id == id))?;
        match self.entries.remove(index) {
            Entry::Widget(w) => Some(w),
            Entry::Opaque(_) => None,
        }
    }

    /// A fresh id: the current millisecond timestamp, bumped past every
    /// numeric id this document has seen.
    pub fn next_id(&mut self) -> WidgetId {
        let now = chrono::Utc::now().timestamp_millis();
        let mut candidate = now.max(self.last_id + 1);
        while self
            .entries
            .iter()
            .any(|e| e.id().is_some_and(|id| id.as_str() == candidate.to_string()))
        {
            candidate += 1;
        }
        self.last_id = candidate;
        WidgetId::new(candidate.to_string())
    }
}

/// Two documents are equal when their entries are, in order.
impl PartialEq for CanvasDocument {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<'a> IntoIterator for &'a CanvasDocument {
    type Item = &'a Widget;
    type IntoIter = Widgets<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(id: &str, content: &str, x: f64, y: f64) -> Widget {
        Widget {
            id: WidgetId::new(id),
            kind: WidgetKind::Text {
                content: content.into(),
            },
            x,
            y,
            width: Dimension::Px(200.0),
            height: Dimension::Auto,
            extra: Default::default(),
        }
    }

    #[test]
    fn parse_null_and_empty_yield_empty_document() {
        assert!(CanvasDocument::parse(None).is_empty());
        assert!(CanvasDocument::parse(Some("")).is_empty());
    }

    #[test]
    fn parse_invalid_or_non_array_yields_empty_document() {
        assert!(CanvasDocument::parse(Some("{not valid json")).is_empty());
        assert!(CanvasDocument::parse(Some(r#"{"a":1}"#)).is_empty());
        assert!(CanvasDocument::parse(Some("42")).is_empty());
    }

    #[test]
    fn classify_distinguishes_legacy_from_empty() {
        assert_eq!(Content::classify(None), Content::Empty);
        assert_eq!(Content::classify(Some("")), Content::Empty);
        assert_eq!(
            Content::classify(Some("{not valid json")),
            Content::Legacy("{not valid json".into())
        );
        assert_eq!(
            Content::classify(Some(r#"{"a":1}"#)),
            Content::Legacy(r#"{"a":1}"#.into())
        );
        assert!(matches!(Content::classify(Some("[]")), Content::Canvas(d) if d.is_empty()));
    }

    #[test]
    fn round_trip_preserves_fields_and_order() {
        let widgets = vec![
            text("3", "third", -20.0, 1000.5),
            Widget {
                id: WidgetId::new("1"),
                kind: WidgetKind::Button {
                    content: "Go".into(),
                    url: "https://example.com/?a=1&b=\"2\"".into(),
                },
                x: 10.0,
                y: 20.0,
                width: Dimension::Px(160.0),
                height: Dimension::Auto,
                extra: Default::default(),
            },
            Widget {
                id: WidgetId::new("2"),
                kind: WidgetKind::Image {
                    content: "/api/uploads/a.png".into(),
                },
                x: 0.25,
                y: 0.0,
                width: Dimension::Auto,
                height: Dimension::Px(90.0),
                extra: Default::default(),
            },
        ];
        let doc = CanvasDocument::from_widgets(widgets.clone());
        let reparsed = CanvasDocument::parse(Some(&doc.serialize()));
        let reparsed: Vec<Widget> = reparsed.iter().cloned().collect();
        assert_eq!(reparsed, widgets);
    }

    #[test]
    fn malformed_entries_are_kept_opaque() {
        let raw = r#"[
            {"id":"1","type":"text","content":"ok"},
            {"id":"2","content":"no type"},
            {"id":"3","type":"carousel"},
            "not an object",
            {"id":"4","type":"image","content":"/a.png","width":"300px"}
        ]"#;
        let doc = CanvasDocument::parse(Some(raw));
        let ids: Vec<&str> = doc.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);
        assert_eq!(doc.widgets()[1].width, Dimension::Px(300.0));
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.entries().len(), 5);
        assert_eq!(doc.entries()[2].id(), Some(WidgetId::new("3")));
        assert!(matches!(&doc.entries()[3], Entry::Opaque(Value::String(s)) if s == "not an object"));
    }

    #[test]
    fn opaque_entries_are_written_back_in_place() {
        let doc = CanvasDocument::parse(Some(
            r#"[{"id":"1","type":"video","src":"/a.mp4","y":10},{"id":"2","type":"text","content":"hi","x":1,"y":2,"width":200,"height":"auto"}]"#,
        ));
        assert_eq!(
            doc.serialize(),
            r#"[{"id":"1","src":"/a.mp4","type":"video","y":10},{"id":"2","type":"text","content":"hi","x":1,"y":2,"width":200,"height":"auto"}]"#
        );
    }

    #[test]
    fn next_id_skips_opaque_ids() {
        let mut doc = CanvasDocument::parse(Some(r#"[{"id":99999999999999,"type":"video"}]"#));
        assert_eq!(doc.next_id().as_str(), "100000000000000");
    }

    #[test]
    fn duplicate_ids_are_reassigned_in_place() {
        let doc = CanvasDocument::from_widgets(vec![
            text("5", "a", 0.0, 0.0),
            text("5", "b", 0.0, 0.0),
            text("6", "c", 0.0, 0.0),
        ]);
        let contents: Vec<&str> = doc.iter().map(|w| w.content()).collect();
        assert_eq!(contents, vec!["a", "b", "c"]);
        assert_eq!(doc.widgets()[0].id.as_str(), "5");
        assert_ne!(doc.widgets()[1].id.as_str(), "5");
        assert_ne!(doc.widgets()[1].id.as_str(), "6");
    }

    #[test]
    fn next_id_is_unique_and_increasing() {
        let far_future = "99999999999999";
        let mut doc = CanvasDocument::from_widgets(vec![text(far_future, "x", 0.0, 0.0)]);
        let a = doc.next_id();
        let b = doc.next_id();
        assert_eq!(a.as_str(), "100000000000000");
        assert_eq!(b.as_str(), "100000000000001");
    }

    #[test]
    fn empty_document_serializes_to_empty_array() {
        assert_eq!(CanvasDocument::new().serialize(), "[]");
    }
}
