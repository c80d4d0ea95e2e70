//! Cache debugging endpoints

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cache/stats", get(cache_stats))
        .route("/cache/clear", get(clear_cache))
}

#[derive(Debug, Serialize)]
pub struct CacheStatsResponse {
    pub size: u64,
    pub keys: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClearQuery {
    /// Glob pattern; everything is cleared when absent
    pub pattern: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub message: String,
    pub size: u64,
}

/// GET /api/cache/stats
async fn cache_stats(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    let size = state.cache.size().await;
    Json(CacheStatsResponse {
        size,
        keys: state.cache.keys(),
    })
}

/// GET /api/cache/clear[?pattern=]
async fn clear_cache(State(state): State<AppState>, Query(q): Query<ClearQuery>) -> Json<ClearResponse> {
    let message = match q.pattern.as_deref().filter(|p| !p.is_empty()) {
        Some(pattern) => {
            let removed = state.cache.delete_pattern(pattern).await;
            tracing::info!("Cleared {} cache entries matching '{}'", removed, pattern);
            format!("Cleared {} entries matching '{}'", removed, pattern)
        }
        None => {
            state.cache.clear().await;
            tracing::info!("Cache cleared");
            "Cache cleared".to_string()
        }
    };

    Json(ClearResponse {
        message,
        size: state.cache.size().await,
    })
}
