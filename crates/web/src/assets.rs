//! Static file serving for the chat UI.

use axum::Router;
use std::path::{Path, PathBuf};
use tower_http::services::{ServeDir, ServeFile};
use tracing::info;

/// Serve the static front end.
///
/// The UI is a single page, so unknown paths fall back to `index.html`.
pub fn static_files_service() -> Router {
    let dir = frontend_dir();
    info!("Serving front end from {}", dir.display());

    let index = ServeFile::new(dir.join("index.html"));
    let serve_dir = ServeDir::new(&dir).not_found_service(index);

    Router::new().fallback_service(serve_dir)
}

/// Resolve the front-end directory.
///
/// `PARLEY_FRONTEND_DIR` overrides; otherwise a built `frontend/dist` next
/// to the crate wins over the checked-in `frontend/public`.
pub fn frontend_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PARLEY_FRONTEND_DIR") {
        let trimmed = dir.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    let frontend = Path::new(env!("CARGO_MANIFEST_DIR")).join("frontend");
    let dist = frontend.join("dist");
    if dist.is_dir() {
        dist
    } else {
        frontend.join("public")
    }
}
