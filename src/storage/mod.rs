//! # Object Storage
//!
//! Upload-and-get-URL backends for images placed on a canvas.
//!
//! | Backend | Use |
//! |---------|-----|
//! | [`LocalDiskStorage`] | server side: writes files under a directory served at a public prefix |
//! | [`HttpObjectStorage`] | client side: posts the file to a running server's upload endpoint |

mod http;
mod local;

pub use http::HttpObjectStorage;
pub use local::LocalDiskStorage;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// A file about to be stored.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Original file name; only its extension is kept.
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Where a stored file can be fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    pub url: String,
}

/// Accepts a file and returns a URL for it.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn put(&self, file: UploadFile) -> Result<StoredObject, StorageError>;
}
