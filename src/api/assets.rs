//! Embedded static assets for the story page
//!
//! In development, falls back to serving from filesystem.

use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use rust_embed::Embed;
use std::path::PathBuf;

#[derive(Embed)]
#[folder = "ui/dist"]
struct Assets;

const DEV_ASSET_DIR: &str = "ui/dist";

/// Serve embedded static files, with filesystem fallback for development
pub async fn serve_static(Path(path): Path<String>) -> Response {
    let path = format!("assets/{}", path.trim_start_matches('/'));

    match load_asset(&path) {
        Some(content) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.to_string())], content).into_response()
        }
        None => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

/// Get the index.html content (embedded or from filesystem)
#[must_use]
pub fn get_index_html() -> Option<String> {
    load_asset("index.html").and_then(|bytes| String::from_utf8(bytes).ok())
}

fn load_asset(path: &str) -> Option<Vec<u8>> {
    // Reject traversal before touching the filesystem fallback
    if path.split('/').any(|segment| segment == "..") {
        return None;
    }

    if let Some(content) = Assets::get(path) {
        return Some(content.data.into_owned());
    }

    std::fs::read(PathBuf::from(DEV_ASSET_DIR).join(path)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_is_embedded() {
        let html = get_index_html().expect("index.html should be embedded");
        assert!(html.contains("/assets/story.js"));
    }

    #[test]
    fn test_script_asset_present() {
        let script = load_asset("assets/story.js").expect("story.js should be embedded");
        let script = String::from_utf8(script).unwrap();
        assert!(script.contains("/api/chat"));
    }

    #[test]
    fn test_traversal_rejected() {
        assert!(load_asset("assets/../../Cargo.toml").is_none());
    }
}
