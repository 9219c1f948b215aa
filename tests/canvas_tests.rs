//! # Canvas Content Tests
//!
//! End-to-end editing sessions: open a content field, mutate it through the
//! editor, persist the serialized string, then read it back the way the
//! public page does.

use kioskboard::document::{CanvasDocument, Content, Dimension, WidgetType};
use kioskboard::editor::{ContainerMetrics, EditorSurface, Edges, FormField, Point, Rect, WidgetPatch};
use kioskboard::render::{render_html, RenderedContent, Renderer};
use pretty_assertions::assert_eq;

/// Content written by the browser editor before this crate existed.
const BROWSER_CONTENT: &str = r#"[{"id":"1717000000001","type":"text","x":50,"y":50,"content":"Welcome","width":200,"height":"auto"},{"id":"1717000000002","type":"button","x":312.5,"y":90,"content":"Menu","width":160,"height":"auto","url":"https://example.com/menu"},{"id":1717000000003,"type":"image","x":40,"y":480,"content":"/api/uploads/1717-42.jpg","width":300,"height":"auto"}]"#;

#[test]
fn text_widget_survives_persist_and_reload() {
    let mut editor = EditorSurface::open(None, FormField::default());
    editor.add_widget(WidgetType::Text, WidgetPatch::content("hi"));

    let stored = editor.sink().value().unwrap().to_string();
    let reloaded = CanvasDocument::parse(Some(&stored));

    assert_eq!(reloaded.len(), 1);
    let widget = reloaded.iter().next().unwrap();
    assert_eq!(widget.widget_type(), WidgetType::Text);
    assert_eq!(widget.content(), "hi");
    assert_eq!((widget.x, widget.y), (50.0, 50.0));
    assert_eq!(widget.width, Dimension::Px(200.0));
}

#[test]
fn add_then_remove_button_serializes_to_empty_array() {
    let mut editor = EditorSurface::open(None, FormField::default());
    let id = editor
        .add_button("Click", "https://x.com")
        .expect("label and url given");
    assert!(editor.remove_widget(&id));
    assert_eq!(editor.serialized(), "[]");
    assert_eq!(editor.sink().value(), Some("[]"));
}

#[test]
fn browser_content_round_trips() {
    let doc = CanvasDocument::parse(Some(BROWSER_CONTENT));
    assert_eq!(doc.len(), 3);
    assert_eq!(doc.widgets()[2].id.as_str(), "1717000000003");

    let again = CanvasDocument::parse(Some(&doc.serialize()));
    assert_eq!(again.widgets(), doc.widgets());
    assert_eq!(again.serialize(), doc.serialize());
}

#[test]
fn editing_existing_content_keeps_other_widgets() {
    let mut editor = EditorSurface::open(Some(BROWSER_CONTENT), FormField::default());
    let button = editor.document().widgets()[1].id.clone();

    let container = ContainerMetrics {
        rect: Rect {
            left: 20.0,
            top: 300.0,
            width: 900.0,
            height: 600.0,
        },
        border: Edges::uniform(2.0),
        ..Default::default()
    };
    {
        let mut drag = editor.begin_drag(&button, Point::new(400.0, 400.0)).unwrap();
        drag.move_to(Point::new(420.0, 500.0));
        let measured = Rect {
            left: 352.5,
            top: 492.0,
            width: 160.0,
            height: 48.0,
        };
        assert!(drag.release(measured, &container));
    }
    {
        let mut resize = editor.begin_resize(&button, 0.0).unwrap();
        resize.move_to(40.0);
        assert!(resize.release());
    }

    let doc = CanvasDocument::parse(editor.sink().value());
    let moved = doc.get(&button).unwrap();
    assert_eq!((moved.x, moved.y), (330.5, 190.0));
    assert_eq!(moved.width, Dimension::Px(200.0));
    assert_eq!(doc.widgets()[0].content(), "Welcome");
    assert_eq!(doc.widgets()[2].content(), "/api/uploads/1717-42.jpg");
    assert_eq!(editor.sink().changes(), 2);
}

#[test]
fn legacy_html_opens_as_empty_canvas_but_renders_as_markup() {
    let legacy = "<h2>Our services</h2><p>Open daily.</p>";

    let editor = EditorSurface::open(Some(legacy), FormField::default());
    assert!(editor.document().is_empty());

    assert!(matches!(Content::classify(Some(legacy)), Content::Legacy(_)));
    assert_eq!(
        render_html(Some(legacy)),
        format!("<div class=\"legacy-content\">{}</div>", legacy)
    );
}

#[test]
fn renderer_sizes_container_to_lowest_widget() {
    match Renderer::default().layout_str(Some(BROWSER_CONTENT)) {
        RenderedContent::Canvas(layout) => {
            // image at y=480 with auto height: 480 + 300 + 200
            assert_eq!(layout.height, 980.0);
            assert_eq!(layout.widgets.len(), 3);
            assert_eq!(layout.widgets[1].transform, "translate(312.5px, 90px)");
        }
        other => panic!("expected canvas layout, got {:?}", other),
    }
}
