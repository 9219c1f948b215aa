//! # Kioskboard - Canvas Content for a Kiosk/Blog CMS
//!
//! Kioskboard implements the positioned-widget content format used by the
//! post editor and the public front end. It provides:
//!
//! - **Document model**: text, button and image widgets stored as a JSON array
//! - **Editor surface**: add, update, remove, drag and resize with change notifications
//! - **Renderer**: container sizing and HTML output, with legacy-markup fallback
//! - **Object storage**: upload-and-get-URL backends for images
//! - **Server**: upload endpoint, uploaded-file serving and render API
//!
//! ## Quick Start
//!
//! ```
//! use kioskboard::{
//!     document::CanvasDocument,
//!     editor::{EditorSurface, FormField},
//!     render::render_html,
//! };
//!
//! // Open a post's content field for editing
//! let mut editor = EditorSurface::open(None, FormField::default());
//! editor.add_text("Opening hours: 9-17");
//! let button = editor.add_button("Book now", "https://example.com/book");
//! assert!(button.is_some());
//!
//! // The owning form holds the serialized content
//! let content = editor.sink().value().unwrap().to_string();
//! assert_eq!(CanvasDocument::parse(Some(&content)).len(), 2);
//!
//! // Public page
//! let html = render_html(Some(&content));
//! assert!(html.contains("Book now"));
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`document`] | Widget types, parse/serialize |
//! | [`editor`] | Mutation surface and gesture sessions |
//! | [`render`] | Layout and HTML |
//! | [`storage`] | Object storage backends |
//! | [`server`] | HTTP API |
//! | [`error`] | Error types |

pub mod document;
pub mod editor;
pub mod error;
pub mod render;
pub mod server;
pub mod storage;

// Re-exports for convenience
pub use document::{CanvasDocument, Content, Entry, Widget, WidgetId, WidgetKind, WidgetType};
pub use editor::EditorSurface;
pub use error::{KioskError, StorageError};
pub use render::{render_html, Renderer};
