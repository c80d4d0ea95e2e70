//! News API endpoint

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::middleware::{AppState, CACHE_CONTROL_NEWS};
use crate::upstream::NewsItem;

pub fn router() -> Router<AppState> {
    Router::new().route("/news", get(latest_news))
}

#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    pub limit: Option<String>,
}

/// GET /api/news?limit=
async fn latest_news(State(state): State<AppState>, Query(q): Query<NewsQuery>) -> Response {
    let limit = state.news.effective_limit(q.limit.as_deref());
    match state.news.latest(limit).await {
        Ok(items) => ([(header::CACHE_CONTROL, CACHE_CONTROL_NEWS)], Json(items)).into_response(),
        Err(e) => {
            tracing::error!("news error: {}", e);
            Json(Vec::<NewsItem>::new()).into_response()
        }
    }
}
