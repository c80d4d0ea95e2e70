//! Page routes: the home page and single-segment slugs
//!
//! `/{slug}` resolves in this order:
//! 1. a file of that name in the public directory
//! 2. reserved segments (`api`, the admin mount, the page templates): 404
//! 3. a category slug: the listing template, anything else: the article template

use axum::{
    extract::{Path, State},
    response::Response,
};

use crate::api::middleware::AppState;
use crate::api::static_files::{not_found, safe_join, serve_file};
use crate::services::slug::{is_reserved, HOME_PAGE};

/// GET /
pub async fn home(State(state): State<AppState>) -> Response {
    match serve_file(&state.site.public_dir, HOME_PAGE).await {
        Some(response) => response,
        None => not_found("/"),
    }
}

/// GET /{slug}
pub async fn slug_page(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let public_dir = &state.site.public_dir;

    if let Some(path) = safe_join(public_dir, &slug) {
        if tokio::fs::metadata(&path).await.is_ok_and(|m| m.is_file()) {
            if let Some(response) = serve_file(public_dir, &slug).await {
                return response;
            }
        }
    }

    if is_reserved(&slug, &state.site.admin_mount) {
        tracing::debug!("Skipping reserved slug: {}", slug);
        return not_found(&format!("/{}", slug));
    }

    let template = state.slugs.resolve(&slug).await;
    tracing::debug!("Slug '{}' -> {}", slug, template.file_name());

    match serve_file(public_dir, template.file_name()).await {
        Some(response) => response,
        None => {
            tracing::error!("Page template missing: {}", template.file_name());
            not_found(&format!("/{}", slug))
        }
    }
}
