//! Embedded index page and static assets.
//!
//! In release mode: Assets are embedded into the binary at compile time.
//! In debug mode: rust-embed reads from filesystem (static/) at runtime.

use axum::{
    body::Body,
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

/// Index page plus the script and stylesheet it loads.
#[derive(RustEmbed)]
#[folder = "static/"]
#[include = "*.html"]
#[include = "*.js"]
#[include = "*.css"]
struct StaticAssets;

/// Serve `/` as the index page and `/static/{file}` as embedded files.
///
/// Everything else is a 404, so unknown `/api/...` paths never fall back
/// to the page.
pub async fn serve_static(uri: Uri) -> Response {
    let path = uri.path();

    let asset_path = if path == "/" || path == "/index.html" {
        "index.html"
    } else if let Some(file) = path.strip_prefix("/static/") {
        file
    } else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match StaticAssets::get(asset_path) {
        Some(content) => {
            let mime = mime_guess::from_path(asset_path).first_or_octet_stream();

            (
                [
                    (header::CONTENT_TYPE, mime.as_ref().to_string()),
                    (header::CACHE_CONTROL, "no-cache".to_string()),
                ],
                Body::from(content.data),
            )
                .into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
