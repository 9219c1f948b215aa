//! # Renderer
//!
//! Read-only layout of persisted canvas content for display.
//!
//! Layout is a pure function of the content string: widgets keep their
//! stored coordinates and the container grows to fit the lowest entry.
//!
//! Display is more forgiving than editing. Every array element counts
//! toward the container height, and an element the editor keeps opaque
//! (no `id`, a numeric `content`, a string `x`) is still drawn as long as
//! its `type` is one of the known ones.
//!
//! ```
//! use kioskboard::render::{Renderer, RenderedContent};
//! use kioskboard::document::Content;
//!
//! let content = Content::classify(Some(r#"[{"id":"1","type":"image","content":"/a.png","y":500}]"#));
//! match Renderer::default().layout(&content) {
//!     RenderedContent::Canvas(layout) => assert_eq!(layout.height, 1000.0),
//!     RenderedContent::Legacy { .. } => unreachable!(),
//! }
//! ```

mod html;

pub use html::render_html;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::document::types::{format_px, serialize_px};
use crate::document::{Content, Dimension, Entry, Widget, WidgetId, WidgetKind, WidgetType};

/// Container sizing rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Renderer {
    /// Lowest bottom edge considered, before padding.
    pub min_extent: f64,
    /// Space added below the lowest widget.
    pub bottom_padding: f64,
    /// Smallest container height.
    pub min_height: f64,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            min_extent: 400.0,
            bottom_padding: 200.0,
            min_height: 600.0,
        }
    }
}

/// Layout result for one content string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RenderedContent {
    /// Markup to be shown as-is.
    Legacy { markup: String },
    Canvas(CanvasLayout),
}

/// Positioned widgets and the height of the box holding them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanvasLayout {
    #[serde(serialize_with = "serialize_px")]
    pub height: f64,
    pub widgets: Vec<PlacedWidget>,
}

/// One widget ready to be drawn, in stacking order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedWidget {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<WidgetId>,
    #[serde(flatten)]
    pub kind: WidgetKind,
    #[serde(serialize_with = "serialize_px")]
    pub x: f64,
    #[serde(serialize_with = "serialize_px")]
    pub y: f64,
    pub width: Dimension,
    /// CSS transform placing the widget: `translate(Xpx, Ypx)`.
    pub transform: String,
}

impl PlacedWidget {
    fn new(id: Option<WidgetId>, kind: WidgetKind, x: f64, y: f64, width: Dimension) -> Self {
        Self {
            id,
            kind,
            x,
            y,
            width,
            transform: format!("translate({}px, {}px)", format_px(x), format_px(y)),
        }
    }

    fn from_widget(widget: &Widget) -> Self {
        Self::new(
            Some(widget.id.clone()),
            widget.kind.clone(),
            widget.x,
            widget.y,
            widget.width,
        )
    }

    /// Best-effort reading of an element that is not a well-formed widget.
    /// `None` when its type is missing or unknown.
    fn from_value(value: &Value) -> Option<Self> {
        let widget_type = known_type(value)?;
        let content = display_text(value.get("content"));
        let kind = match widget_type {
            WidgetType::Text => WidgetKind::Text { content },
            WidgetType::Button => WidgetKind::Button {
                content,
                url: display_text(value.get("url")),
            },
            WidgetType::Image => WidgetKind::Image { content },
        };
        let id = value.get("id").and_then(|id| WidgetId::deserialize(id).ok());
        let width = value
            .get("width")
            .and_then(|w| Dimension::deserialize(w).ok())
            .unwrap_or_default();
        Some(Self::new(
            id,
            kind,
            coordinate(value.get("x")),
            coordinate(value.get("y")),
            width,
        ))
    }
}

fn known_type(value: &Value) -> Option<WidgetType> {
    value
        .get("type")
        .and_then(|t| WidgetType::deserialize(t).ok())
}

/// Strings as-is, numbers and booleans printed, anything else empty.
fn display_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
        _ => String::new(),
    }
}

/// A number or numeric string; anything else is 0.
fn coordinate(value: Option<&Value>) -> f64 {
    let n = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    n.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Lowest edge of an entry, with the type-default height for `auto`.
fn bottom_edge(entry: &Entry) -> f64 {
    match entry {
        Entry::Widget(w) => w.y + w.effective_height(),
        Entry::Opaque(value) => {
            let height = value
                .get("height")
                .and_then(|h| Dimension::deserialize(h).ok())
                .and_then(|h| h.px())
                .unwrap_or_else(|| {
                    known_type(value)
                        .map(|t| t.default_render_height())
                        .unwrap_or(100.0)
                });
            coordinate(value.get("y")) + height
        }
    }
}

impl Renderer {
    /// Container height for a set of entries:
    /// `max(min_height, max(min_extent, lowest bottom edge) + bottom_padding)`.
    pub fn container_height<'a>(&self, entries: impl IntoIterator<Item = &'a Entry>) -> f64 {
        let lowest = entries
            .into_iter()
            .map(bottom_edge)
            .fold(self.min_extent, f64::max);
        (lowest + self.bottom_padding).max(self.min_height)
    }

    pub fn layout(&self, content: &Content) -> RenderedContent {
        match content {
            Content::Legacy(markup) => RenderedContent::Legacy {
                markup: markup.clone(),
            },
            // nothing stored: nothing to show
            Content::Empty => RenderedContent::Legacy {
                markup: String::new(),
            },
            Content::Canvas(doc) => RenderedContent::Canvas(CanvasLayout {
                height: self.container_height(doc.entries()),
                widgets: doc
                    .entries()
                    .iter()
                    .enumerate()
                    .filter_map(|(i, entry)| match entry {
                        Entry::Widget(w) => Some(PlacedWidget::from_widget(w)),
                        Entry::Opaque(value) => {
                            let placed = PlacedWidget::from_value(value);
                            if placed.is_none() {
                                debug!("entry {} has no known type, not drawn", i);
                            }
                            placed
                        }
                    })
                    .collect(),
            }),
        }
    }

    /// Classify and lay out a raw content string.
    pub fn layout_str(&self, raw: Option<&str>) -> RenderedContent {
        self.layout(&Content::classify(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn canvas(raw: &str) -> CanvasLayout {
        match Renderer::default().layout_str(Some(raw)) {
            RenderedContent::Canvas(layout) => layout,
            other => panic!("expected canvas, got {:?}", other),
        }
    }

    #[test]
    fn single_auto_image_at_500() {
        let layout = canvas(r#"[{"id":"1","type":"image","content":"/a.png","y":500,"height":"auto"}]"#);
        assert_eq!(layout.height, 1000.0);
    }

    #[test]
    fn empty_array_uses_minimum_height() {
        assert_eq!(canvas("[]").height, 600.0);
        assert_eq!(
            Renderer::default().layout_str(None),
            RenderedContent::Legacy {
                markup: String::new()
            }
        );
    }

    #[test]
    fn small_widgets_stay_at_minimum() {
        // bottom 150 < 400 floor, 400 + 200 = 600
        let layout = canvas(r#"[{"id":"1","type":"text","content":"hi","y":50}]"#);
        assert_eq!(layout.height, 600.0);
    }

    #[test]
    fn numeric_heights_are_used() {
        let layout = canvas(
            r#"[{"id":"1","type":"text","content":"a","y":700,"height":120},
                {"id":"2","type":"button","content":"b","url":"/","y":100,"height":"900px"}]"#,
        );
        // max(820, 1000) + 200
        assert_eq!(layout.height, 1200.0);
    }

    #[test]
    fn non_array_content_is_legacy() {
        assert_eq!(
            Renderer::default().layout_str(Some("<p>hello</p>")),
            RenderedContent::Legacy {
                markup: "<p>hello</p>".into()
            }
        );
        assert!(matches!(
            Renderer::default().layout_str(Some(r#"{"a":1}"#)),
            RenderedContent::Legacy { .. }
        ));
    }

    #[test]
    fn unknown_types_extend_height_but_are_not_placed() {
        let layout = canvas(
            r#"[{"id":"1","type":"marquee","y":5000},{"id":"2","type":"text","content":"ok"}]"#,
        );
        assert_eq!(layout.widgets.len(), 1);
        assert_eq!(layout.widgets[0].id, Some(WidgetId::new("2")));
        // 5000 + 100 default + 200 padding
        assert_eq!(layout.height, 5300.0);
    }

    #[test]
    fn loosely_typed_entries_are_still_drawn() {
        let layout = canvas(
            r#"[{"id":"1","type":"marquee","y":2000},
                {"type":"text","content":"no id","y":10},
                {"id":"3","type":"text","content":42,"x":"15","y":10}]"#,
        );
        assert_eq!(layout.height, 2300.0);
        assert_eq!(layout.widgets.len(), 2);
        assert_eq!(layout.widgets[0].id, None);
        assert_eq!(layout.widgets[0].kind.content(), "no id");
        assert_eq!(layout.widgets[1].kind.content(), "42");
        assert_eq!(layout.widgets[1].transform, "translate(15px, 10px)");
    }

    #[test]
    fn placement_uses_translate() {
        let layout = canvas(r#"[{"id":"1","type":"text","content":"a","x":12.5,"y":-4,"width":200}]"#);
        assert_eq!(layout.widgets[0].transform, "translate(12.5px, -4px)");
    }

    #[test]
    fn layout_serializes_with_kind_tag() {
        let layout = Renderer::default()
            .layout_str(Some(r#"[{"id":"1","type":"text","content":"a","x":1,"y":2,"width":200}]"#));
        let json = serde_json::to_value(&layout).unwrap();
        assert_eq!(json["kind"], "canvas");
        assert_eq!(json["height"], 600);
        assert_eq!(json["widgets"][0]["type"], "text");
        assert_eq!(json["widgets"][0]["width"], 200);

        let legacy = serde_json::to_value(Renderer::default().layout_str(Some("<b>x</b>"))).unwrap();
        assert_eq!(legacy, serde_json::json!({"kind": "legacy", "markup": "<b>x</b>"}));
    }
}
