//! Object storage reached over HTTP.
//!
//! Posts the file as multipart field `file` and expects `{"url": "..."}`
//! back. Any non-2xx answer counts as a failed upload.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

use super::{ObjectStorage, StoredObject, UploadFile};
use crate::error::StorageError;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpObjectStorage {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpObjectStorage {
    /// `endpoint` is the full upload URL, e.g. `http://localhost:3000/api/upload`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ObjectStorage for HttpObjectStorage {
    async fn put(&self, file: UploadFile) -> Result<StoredObject, StorageError> {
        if file.bytes.is_empty() {
            return Err(StorageError::Empty);
        }
        let mime = file.content_type.clone().unwrap_or_else(|| {
            mime_guess::from_path(&file.file_name)
                .first_or_octet_stream()
                .to_string()
        });
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&mime)?;
        let form = Form::new().part("file", part);

        let response = self.client.post(&self.endpoint).multipart(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!("upload to {} answered {}", self.endpoint, status);
            return Err(StorageError::Rejected(status.as_u16()));
        }

        let body: UploadResponse = response.json().await?;
        body.url
            .map(|url| StoredObject { url })
            .ok_or(StorageError::MissingUrl)
    }
}
