//! API layer - HTTP handlers and routing
//!
//! This module contains every HTTP endpoint of the Bongdaha server:
//! - Football data proxy endpoints (`/api/leagues`, `/api/live`, ...)
//! - News headlines (`/api/news`)
//! - Site config for browser scripts (`/api/config`)
//! - Tracking beacon relay (`/api/track`)
//! - Cache debugging (`/api/cache/*`)
//! - Pages, slug classification and static files

pub mod cache;
pub mod football;
pub mod middleware;
pub mod news;
pub mod pages;
pub mod site;
pub mod static_files;
pub mod track;

use axum::{routing::get, Router};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

pub use middleware::{
    cache_control_no_cache, cache_control_static, ApiError, AppState, OriginPolicy, PublicConfig,
    CACHE_CONTROL_FIXTURES, CACHE_CONTROL_LIVE, CACHE_CONTROL_NEWS,
};

/// Build the `/api` router
pub fn build_api_router() -> Router<AppState> {
    Router::new()
        .merge(football::router())
        .merge(news::router())
        .merge(site::router())
        .merge(track::router())
        .merge(cache::router())
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, origins: OriginPolicy) -> Router {
    let mut router = Router::new()
        .nest("/api", build_api_router())
        .route("/", get(pages::home))
        .route("/{slug}", get(pages::slug_page));

    let mount = state.site.admin_mount.trim_matches('/').to_string();
    if !mount.is_empty() {
        router = router.nest_service(
            &format!("/{}", mount),
            get(static_files::serve_admin).with_state(state.clone()),
        );
    }

    router
        .fallback(static_files::serve_public)
        .layer(CompressionLayer::new())
        .layer(origins.layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
