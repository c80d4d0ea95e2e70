//! Static file serving
//!
//! The public site and the admin bundle are served from disk:
//! - `/{admin_mount}/*` from `site.admin_dir`
//! - everything else from `site.public_dir`
//!
//! HTML is revalidated on every load; other assets are cached for an hour.

use axum::{
    extract::State,
    http::{header, Uri},
    response::{IntoResponse, Response},
};
use std::path::{Component, Path, PathBuf};
use tokio::fs;

use crate::api::middleware::{cache_control_no_cache, cache_control_static, ApiError, AppState};

/// Max-age for non-HTML assets
const ASSET_MAX_AGE: u32 = 3600;

/// Serve the public site, used as the router fallback
pub async fn serve_public(State(state): State<AppState>, uri: Uri) -> Response {
    match serve_from(&state.site.public_dir, uri.path()).await {
        Some(response) => response,
        None => not_found(uri.path()),
    }
}

/// Serve the admin bundle; the mount prefix is already stripped
pub async fn serve_admin(State(state): State<AppState>, uri: Uri) -> Response {
    match serve_from(&state.site.admin_dir, uri.path()).await {
        Some(response) => response,
        None => not_found(uri.path()),
    }
}

/// Serve a percent-encoded URL path under `root`
pub async fn serve_from(root: &Path, request_path: &str) -> Option<Response> {
    let decoded = urlencoding::decode(request_path).ok()?;
    serve_file(root, &decoded).await
}

/// Serve an already decoded path under `root`, or `None` when there is no such file
///
/// Directories serve their `index.html`.
pub async fn serve_file(root: &Path, relative: &str) -> Option<Response> {
    let mut path = safe_join(root, relative)?;

    let metadata = fs::metadata(&path).await.ok()?;
    if metadata.is_dir() {
        path = path.join("index.html");
    }

    let contents = fs::read(&path).await.ok()?;
    let name = path.to_string_lossy();
    Some(build_response(&name, contents))
}

/// Join a URL path onto `root`, refusing anything that could escape it
pub fn safe_join(root: &Path, request_path: &str) -> Option<PathBuf> {
    let relative = Path::new(request_path.trim_start_matches('/'));
    let mut joined = root.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => joined.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(joined)
}

/// Build HTTP response with proper headers
pub fn build_response(path: &str, data: Vec<u8>) -> Response {
    let content_type = get_content_type(path);
    let cache_control = if content_type.starts_with("text/html") {
        cache_control_no_cache().to_string()
    } else {
        cache_control_static(ASSET_MAX_AGE)
    };

    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CACHE_CONTROL, cache_control),
        ],
        data,
    )
        .into_response()
}

/// 404 response
pub fn not_found(path: &str) -> Response {
    tracing::info!("404 - Not found: {}", path);
    ApiError::not_found("Not found").into_response()
}

/// Get content type from file extension
pub fn get_content_type(path: &str) -> &'static str {
    let extension = path.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
    match extension.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css",
        "js" | "mjs" => "application/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}
