//! # Error Types
//!
//! This module defines error types used throughout the kioskboard library.

use thiserror::Error;

/// Main error type for kioskboard operations
#[derive(Debug, Error)]
pub enum KioskError {
    /// HTTP server errors (bind, serve)
    #[error("Server error: {0}")]
    Server(String),

    /// Object storage failures, including rejected uploads
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// JSON encoding/decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors reported by an [`ObjectStorage`](crate::storage::ObjectStorage) backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The uploaded payload had no bytes.
    #[error("No file uploaded")]
    Empty,

    /// The storage endpoint answered with a non-2xx status.
    #[error("Upload rejected with HTTP {0}")]
    Rejected(u16),

    /// The storage endpoint answered 2xx but without a `url`.
    #[error("Upload response did not contain a url")]
    MissingUrl,

    /// Network or protocol failure talking to a remote store
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Local filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
