//! # HTTP Server for Canvas Content
//!
//! Accepts image uploads for the canvas editor, serves the uploaded files,
//! and renders persisted content for display.
//!
//! ## Usage
//!
//! ```bash
//! kioskboard serve --listen 0.0.0.0:3000 --upload-dir api/uploads
//! ```

mod handlers;
mod state;

pub use state::{AppState, DEFAULT_PUBLIC_PREFIX, ServerConfig};

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::signal;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::error::KioskError;

/// Largest accepted upload body.
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

const HEALTH_ROUTE: &str = "/api/health";
const UPLOAD_ROUTE: &str = "/api/upload";
const RENDER_ROUTE: &str = "/api/canvas/render";
const LAYOUT_ROUTE: &str = "/api/canvas/layout";

/// Paths the router registers itself; the uploads prefix may not shadow them.
const API_ROUTES: [&str; 4] = [HEALTH_ROUTE, UPLOAD_ROUTE, RENDER_ROUTE, LAYOUT_ROUTE];

/// Build the application router.
///
/// Uploaded files are served under the state's public prefix, which
/// [`AppState`] has already validated.
pub fn router(state: Arc<AppState>) -> Router {
    let uploads = ServeDir::new(&state.config.upload_dir);
    let prefix = state.config.public_prefix.clone();

    Router::new()
        .route(HEALTH_ROUTE, get(handlers::health))
        // Upload API
        .route(
            UPLOAD_ROUTE,
            post(handlers::upload::upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .nest_service(&prefix, uploads)
        // Canvas API
        .route(RENDER_ROUTE, post(handlers::canvas::render))
        .route(LAYOUT_ROUTE, post(handlers::canvas::layout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use kioskboard::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), kioskboard::error::KioskError> {
/// serve(ServerConfig::default()).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), KioskError> {
    let state = Arc::new(AppState::new(config)?);
    let config = state.config.clone();
    let app = router(state);

    info!("kioskboard HTTP server starting");
    info!("upload directory: {}", config.upload_dir.display());
    info!("uploads served at: {}", config.public_prefix);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| KioskError::Server(format!("Failed to bind to {}: {}", config.listen_addr, e)))?;
    info!("listening on {}", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| KioskError::Server(format!("Server error: {}", e)))?;

    info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_ok() {
            info!("received Ctrl+C, shutting down");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
