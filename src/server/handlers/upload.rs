//! File upload handler.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::StorageError;
use crate::storage::{StoredObject, UploadFile};

use super::super::state::AppState;
use super::{api_error, ApiError};

/// POST /api/upload - store the multipart field `file` and return its URL.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<StoredObject>, ApiError> {
    let mut file: Option<UploadFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, format!("Multipart error: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| {
            api_error(StatusCode::BAD_REQUEST, format!("Failed to read file: {}", e))
        })?;
        file = Some(UploadFile {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
        break;
    }

    let file = file.ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "No file uploaded"))?;
    debug!("upload of {} ({} bytes)", file.file_name, file.bytes.len());

    match state.storage.put(file).await {
        Ok(stored) => Ok(Json(stored)),
        Err(StorageError::Empty) => Err(api_error(StatusCode::BAD_REQUEST, "No file uploaded")),
        Err(e) => {
            warn!("upload failed: {}", e);
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Upload failed: {}", e),
            ))
        }
    }
}
