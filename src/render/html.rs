//! HTML markup for rendered content.
//!
//! Widgets are absolutely positioned with a `translate` transform rather
//! than `top`/`left`. Text and attribute values are escaped; legacy markup is
//! emitted verbatim.

use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write;

use super::{CanvasLayout, PlacedWidget, RenderedContent, Renderer};
use crate::document::WidgetKind;
use crate::document::types::format_px;

/// Render a persisted content string to HTML.
pub fn render_html(raw: Option<&str>) -> String {
    Renderer::default().layout_str(raw).to_html()
}

impl RenderedContent {
    pub fn to_html(&self) -> String {
        match self {
            RenderedContent::Legacy { markup } => {
                format!("<div class=\"legacy-content\">{}</div>", markup)
            }
            RenderedContent::Canvas(layout) => layout.to_html(),
        }
    }
}

impl CanvasLayout {
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            "<div class=\"canvas-content\" style=\"position: relative; width: 100%; height: {}px; overflow: hidden;\">",
            format_px(self.height)
        );
        for widget in &self.widgets {
            widget.write_html(&mut out);
        }
        out.push_str("</div>");
        out
    }
}

impl PlacedWidget {
    fn write_html(&self, out: &mut String) {
        out.push_str("<div class=\"canvas-widget\"");
        if let Some(id) = &self.id {
            let _ = write!(out, " data-widget-id=\"{}\"", encode_double_quoted_attribute(id.as_str()));
        }
        let _ = write!(
            out,
            " style=\"position: absolute; top: 0; left: 0; width: {}; transform: {};\">",
            self.width.css(),
            self.transform
        );
        match &self.kind {
            WidgetKind::Text { content } => {
                let _ = write!(out, "<div class=\"canvas-text\">{}</div>", encode_text(content));
            }
            WidgetKind::Button { content, url } => {
                let _ = write!(
                    out,
                    "<div class=\"canvas-button\"><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a></div>",
                    encode_double_quoted_attribute(url),
                    encode_text(content)
                );
            }
            WidgetKind::Image { content } => {
                let _ = write!(
                    out,
                    "<img class=\"canvas-image\" src=\"{}\" alt=\"post content\">",
                    encode_double_quoted_attribute(content)
                );
            }
        }
        out.push_str("</div>");
    }
}
