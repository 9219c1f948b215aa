//! Directory-backed object storage.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

use super::{ObjectStorage, StoredObject, UploadFile};
use crate::error::StorageError;

/// Stores files as `<root>/<millis>-<random><ext>` and returns
/// `<public_prefix>/<name>`.
#[derive(Debug, Clone)]
pub struct LocalDiskStorage {
    root: PathBuf,
    public_prefix: String,
}

impl LocalDiskStorage {
    pub fn new(root: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        let public_prefix = public_prefix.into().trim_end_matches('/').to_string();
        Self {
            root: root.into(),
            public_prefix,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn public_prefix(&self) -> &str {
        &self.public_prefix
    }
}

/// Extension of the original file name, with its dot. Empty when the name
/// has none or it is not plain alphanumeric.
fn extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default()
}

fn stored_name(file_name: &str) -> String {
    format!(
        "{}-{}{}",
        chrono::Utc::now().timestamp_millis(),
        rand::random_range(0..1_000_000_000u32),
        extension(file_name)
    )
}

#[async_trait]
impl ObjectStorage for LocalDiskStorage {
    async fn put(&self, file: UploadFile) -> Result<StoredObject, StorageError> {
        if file.bytes.is_empty() {
            return Err(StorageError::Empty);
        }
        tokio::fs::create_dir_all(&self.root).await?;

        let name = stored_name(&file.file_name);
        let path = self.root.join(&name);
        tokio::fs::write(&path, &file.bytes).await?;
        info!(
            "stored {} ({} bytes) as {}",
            file.file_name,
            file.bytes.len(),
            path.display()
        );

        Ok(StoredObject {
            url: format!("{}/{}", self.public_prefix, name),
        })
    }
}
