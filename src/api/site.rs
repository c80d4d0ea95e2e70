//! Site configuration endpoint for browser scripts

use axum::{extract::State, routing::get, Json, Router};

use crate::api::middleware::{AppState, PublicConfig};

pub fn router() -> Router<AppState> {
    Router::new().route("/config", get(get_config))
}

/// GET /api/config
async fn get_config(State(state): State<AppState>) -> Json<PublicConfig> {
    Json(state.public_config.as_ref().clone())
}
