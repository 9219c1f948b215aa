//! Canvas rendering handlers.

use axum::{extract::State, response::Html, Json};
use serde::Deserialize;
use std::sync::Arc;

use crate::render::RenderedContent;

use super::super::state::AppState;

/// Request body carrying a persisted `content` field.
#[derive(Debug, Deserialize)]
pub struct ContentRequest {
    #[serde(default)]
    pub content: Option<String>,
}

/// POST /api/canvas/render - render content as HTML.
pub async fn render(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ContentRequest>,
) -> Html<String> {
    Html(state.renderer.layout_str(req.content.as_deref()).to_html())
}

/// POST /api/canvas/layout - widget placement and container height.
pub async fn layout(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ContentRequest>,
) -> Json<RenderedContent> {
    Json(state.renderer.layout_str(req.content.as_deref()))
}
