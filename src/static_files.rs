//! Serving the built site
//!
//! When `server.static_dir` is set, every path that is not an API route is
//! looked up in that directory. Unknown paths get `index.html` so that
//! client-side routes (`/services`, `/contact`) survive a reload.

use std::path::Path;
use tower_http::services::{ServeDir, ServeFile};

pub const INDEX_FILE: &str = "index.html";

/// File service for `dir` with the SPA fallback
pub fn site_service(dir: &Path) -> ServeDir<ServeFile> {
    ServeDir::new(dir)
        .append_index_html_on_directories(true)
        .fallback(ServeFile::new(dir.join(INDEX_FILE)))
}
