use axum::{Router, http::StatusCode};
use std::path::Path;
use tower_http::services::{ServeDir, ServeFile};
use tracing::{info, warn};

const NOT_BUILT: &str = "Web app not built. Run 'npm run build' in mem0-webapp directory";

/// Serves the single-page app for every path no API route matched.
pub fn fallback(dist_dir: &Path) -> Router {
    if dist_dir.is_dir() {
        info!("Serving web app from {}", dist_dir.display());
        let index = ServeFile::new(dist_dir.join("index.html"));
        Router::new().fallback_service(ServeDir::new(dist_dir).fallback(index))
    } else {
        warn!(
            "Web app directory {} not found; serving a placeholder",
            dist_dir.display()
        );
        Router::new().fallback(|| async { (StatusCode::NOT_FOUND, NOT_BUILT) })
    }
}
