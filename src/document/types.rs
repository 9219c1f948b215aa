//! Widget types for the canvas content model.
//!
//! All types derive `Serialize + Deserialize` so the same values work for
//! Rust construction and for the JSON array persisted in a post's `content`
//! field.
//!
//! A widget is a tagged sum type: the common positional fields live on
//! [`Widget`] and the per-type payload lives in [`WidgetKind`], flattened into
//! the same JSON object under the `type` key.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Serialize a pixel value the way a browser's `JSON.stringify` would:
/// integral values as integers, everything else as a float.
pub(crate) fn serialize_px<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Format a pixel value for CSS (`50`, `12.5`).
pub(crate) fn format_px(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Leading-integer parse: optional whitespace, optional sign, then digits.
/// `"250px"` → 250, `"12.5"` → 12, `"px"` → None.
fn parse_leading_int(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => (-1.0, &s[1..]),
        Some(b'+') => (1.0, &s[1..]),
        _ => (1.0, s),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<f64>().ok().map(|n| sign * n)
}

// ============================================================================
// WIDGET ID
// ============================================================================

/// Opaque widget identifier, unique within one canvas document.
///
/// Persisted content written by older editors may carry numeric ids
/// (`1717171717171` rather than `"1717171717171"`); both forms deserialize
/// to the same string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct WidgetId(String);

impl WidgetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id as a millisecond timestamp, when it is one.
    pub(crate) fn as_millis(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WidgetId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl<'de> Deserialize<'de> for WidgetId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Integer(i64),
            Float(f64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => WidgetId(s),
            RawId::Integer(n) => WidgetId(n.to_string()),
            RawId::Float(n) => WidgetId(format_px(n)),
        })
    }
}

// ============================================================================
// DIMENSION
// ============================================================================

/// A widget width or height: a positive pixel count, or `"auto"` (fit content).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Dimension {
    Px(f64),
    #[default]
    Auto,
}

impl Dimension {
    /// Build a pixel dimension. Non-positive and non-finite values become `Auto`.
    pub fn from_px(value: f64) -> Self {
        if value.is_finite() && value > 0.0 {
            Dimension::Px(value)
        } else {
            Dimension::Auto
        }
    }

    /// Re-apply the positivity invariant to a value built directly from the variant.
    pub fn normalized(self) -> Self {
        match self {
            Dimension::Px(v) => Dimension::from_px(v),
            Dimension::Auto => Dimension::Auto,
        }
    }

    pub fn px(&self) -> Option<f64> {
        match self {
            Dimension::Px(v) => Some(*v),
            Dimension::Auto => None,
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Dimension::Auto)
    }

    /// CSS value: `200px` or `auto`.
    pub fn css(&self) -> String {
        match self {
            Dimension::Px(v) => format!("{}px", format_px(*v)),
            Dimension::Auto => "auto".to_string(),
        }
    }
}

impl Serialize for Dimension {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Dimension::Px(v) => serialize_px(v, serializer),
            Dimension::Auto => serializer.serialize_str("auto"),
        }
    }
}

/// Accepts a number, `"auto"`, a numeric string (`"250"`, `"250px"`) or null.
impl<'de> Deserialize<'de> for Dimension {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawDimension {
            Number(f64),
            Text(String),
        }

        Ok(match Option::<RawDimension>::deserialize(deserializer)? {
            None => Dimension::Auto,
            Some(RawDimension::Number(n)) => Dimension::from_px(n),
            Some(RawDimension::Text(s)) => parse_leading_int(&s)
                .map(Dimension::from_px)
                .unwrap_or(Dimension::Auto),
        })
    }
}

// ============================================================================
// WIDGET TYPE
// ============================================================================

/// The closed set of widget types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetType {
    Text,
    Button,
    Image,
}

impl WidgetType {
    pub fn name(&self) -> &'static str {
        match self {
            WidgetType::Text => "text",
            WidgetType::Button => "button",
            WidgetType::Image => "image",
        }
    }

    /// Width given to a freshly added widget.
    pub fn default_width(&self) -> f64 {
        match self {
            WidgetType::Image => 300.0,
            WidgetType::Button => 150.0,
            WidgetType::Text => 200.0,
        }
    }

    /// Height assumed by the renderer for an `auto`-height widget.
    pub fn default_render_height(&self) -> f64 {
        match self {
            WidgetType::Image => 300.0,
            WidgetType::Button | WidgetType::Text => 100.0,
        }
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// WIDGET
// ============================================================================

/// Per-type payload of a widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WidgetKind {
    /// Literal text block.
    Text {
        #[serde(default)]
        content: String,
    },
    /// Pill button linking to `url`, labelled with `content`.
    Button {
        #[serde(default)]
        content: String,
        #[serde(default)]
        url: String,
    },
    /// Image whose source URL is `content`.
    Image {
        #[serde(default)]
        content: String,
    },
}

impl WidgetKind {
    /// An empty payload of the given type.
    pub fn empty(widget_type: WidgetType) -> Self {
        match widget_type {
            WidgetType::Text => WidgetKind::Text {
                content: String::new(),
            },
            WidgetType::Button => WidgetKind::Button {
                content: String::new(),
                url: String::new(),
            },
            WidgetType::Image => WidgetKind::Image {
                content: String::new(),
            },
        }
    }

    pub fn widget_type(&self) -> WidgetType {
        match self {
            WidgetKind::Text { .. } => WidgetType::Text,
            WidgetKind::Button { .. } => WidgetType::Button,
            WidgetKind::Image { .. } => WidgetType::Image,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            WidgetKind::Text { content }
            | WidgetKind::Button { content, .. }
            | WidgetKind::Image { content } => content,
        }
    }

    pub(crate) fn set_content(&mut self, value: String) {
        match self {
            WidgetKind::Text { content }
            | WidgetKind::Button { content, .. }
            | WidgetKind::Image { content } => *content = value,
        }
    }

    /// JSON keys read into this payload.
    fn field_names(&self) -> &'static [&'static str] {
        match self {
            WidgetKind::Button { .. } => &["content", "url"],
            WidgetKind::Text { .. } | WidgetKind::Image { .. } => &["content"],
        }
    }

    /// Link target; only buttons have one.
    pub fn url(&self) -> Option<&str> {
        match self {
            WidgetKind::Button { url, .. } => Some(url),
            _ => None,
        }
    }

    /// Set the link target. Returns false for non-button widgets.
    pub(crate) fn set_url(&mut self, value: String) -> bool {
        match self {
            WidgetKind::Button { url, .. } => {
                *url = value;
                true
            }
            _ => false,
        }
    }
}

/// Keys every widget reads into its typed fields.
const COMMON_FIELDS: [&str; 6] = ["id", "type", "x", "y", "width", "height"];

/// One positioned content item on a canvas.
///
/// ## Example (JSON)
///
/// ```json
/// {"id":"1717171717171","type":"button","content":"Book now","url":"https://example.com",
///  "x":50,"y":50,"width":150,"height":"auto"}
/// ```
///
/// Keys this version does not know (written by a newer editor, or a `url`
/// on a text widget) are kept in [`extra`](Self::extra) and written back
/// after the typed fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    pub id: WidgetId,
    pub kind: WidgetKind,
    /// Offset from the canvas's left edge. Unclamped.
    pub x: f64,
    /// Offset from the canvas's top edge. Unclamped.
    pub y: f64,
    pub width: Dimension,
    pub height: Dimension,
    /// Untyped keys, carried verbatim. Must not repeat a typed key.
    pub extra: Map<String, Value>,
}

#[derive(Serialize)]
struct WidgetRef<'a> {
    id: &'a WidgetId,
    #[serde(flatten)]
    kind: &'a WidgetKind,
    #[serde(serialize_with = "serialize_px")]
    x: f64,
    #[serde(serialize_with = "serialize_px")]
    y: f64,
    width: Dimension,
    height: Dimension,
    #[serde(flatten)]
    extra: &'a Map<String, Value>,
}

#[derive(Deserialize)]
struct WidgetFields {
    id: WidgetId,
    #[serde(flatten)]
    kind: WidgetKind,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
    #[serde(default)]
    width: Dimension,
    #[serde(default)]
    height: Dimension,
}

impl Serialize for Widget {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        WidgetRef {
            id: &self.id,
            kind: &self.kind,
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            extra: &self.extra,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Widget {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut extra = Map::<String, Value>::deserialize(deserializer)?;
        let fields: WidgetFields =
            serde_json::from_value(Value::Object(extra.clone())).map_err(de::Error::custom)?;

        let known = fields.kind.field_names();
        extra.retain(|key, _| !COMMON_FIELDS.contains(&key.as_str()) && !known.contains(&key.as_str()));

        Ok(Widget {
            id: fields.id,
            kind: fields.kind,
            x: fields.x,
            y: fields.y,
            width: fields.width,
            height: fields.height,
            extra,
        })
    }
}

impl Widget {
    pub fn widget_type(&self) -> WidgetType {
        self.kind.widget_type()
    }

    pub fn content(&self) -> &str {
        self.kind.content()
    }

    pub fn url(&self) -> Option<&str> {
        self.kind.url()
    }

    /// Height used for layout: the numeric height, or the type default for `auto`.
    pub fn effective_height(&self) -> f64 {
        self.height
            .px()
            .unwrap_or_else(|| self.widget_type().default_render_height())
    }
}
