//! Server state and configuration.

use std::path::PathBuf;
use std::sync::Arc;

use super::API_ROUTES;
use crate::error::KioskError;
use crate::render::Renderer;
use crate::storage::{LocalDiskStorage, ObjectStorage};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:3000")
    pub listen_addr: String,
    /// Directory uploaded files are written to
    pub upload_dir: PathBuf,
    /// URL path uploaded files are served under (e.g., "/api/uploads")
    pub public_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3000".to_string(),
            upload_dir: PathBuf::from("api/uploads"),
            public_prefix: DEFAULT_PUBLIC_PREFIX.to_string(),
        }
    }
}

/// Default URL path uploaded files are served under.
pub const DEFAULT_PUBLIC_PREFIX: &str = "/api/uploads";

impl ServerConfig {
    /// Check the configuration and put the public prefix in canonical form:
    /// a leading `/`, no trailing `/`. An empty prefix means the default.
    pub fn validated(mut self) -> Result<Self, KioskError> {
        self.public_prefix = normalize_public_prefix(&self.public_prefix)?;
        Ok(self)
    }
}

fn normalize_public_prefix(raw: &str) -> Result<String, KioskError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(DEFAULT_PUBLIC_PREFIX.to_string());
    }
    let invalid = |reason: &str| KioskError::Server(format!("Invalid public prefix {:?}: {}", raw, reason));

    if !raw.starts_with('/') {
        return Err(invalid("must start with '/'"));
    }
    let prefix = raw.trim_end_matches('/');
    if prefix.is_empty() {
        return Err(invalid("uploads cannot be served at the site root"));
    }
    if prefix[1..].split('/').any(str::is_empty) {
        return Err(invalid("empty path segment"));
    }
    if !prefix
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '_' | '.' | '~'))
    {
        return Err(invalid("only letters, digits and '-', '_', '.', '~' are allowed"));
    }
    let nested = format!("{}/", prefix);
    if API_ROUTES.iter().any(|route| *route == prefix || route.starts_with(&nested)) {
        return Err(invalid("overlaps an API route"));
    }
    Ok(prefix.to_string())
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub storage: Arc<dyn ObjectStorage>,
    pub renderer: Renderer,
}

impl AppState {
    /// State backed by on-disk storage under `config.upload_dir`.
    pub fn new(config: ServerConfig) -> Result<Self, KioskError> {
        let config = config.validated()?;
        let storage = LocalDiskStorage::new(config.upload_dir.clone(), config.public_prefix.clone());
        Self::with_storage(config, Arc::new(storage))
    }

    pub fn with_storage(config: ServerConfig, storage: Arc<dyn ObjectStorage>) -> Result<Self, KioskError> {
        Ok(Self {
            config: config.validated()?,
            storage,
            renderer: Renderer::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_normalized() {
        assert_eq!(normalize_public_prefix("").unwrap(), "/api/uploads");
        assert_eq!(normalize_public_prefix("/media/").unwrap(), "/media");
        assert_eq!(normalize_public_prefix(" /a/b ").unwrap(), "/a/b");
    }

    #[test]
    fn bad_prefixes_are_errors() {
        for raw in ["uploads", "/", "//", "/a//b", "/files/*rest", "/:name", "/api/upload", "/api"] {
            assert!(
                matches!(normalize_public_prefix(raw), Err(KioskError::Server(_))),
                "{raw} should be rejected"
            );
        }
    }
}
