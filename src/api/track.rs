//! Tracking beacon relay
//!
//! Browsers post page-view, heartbeat and leave beacons here; they are
//! relayed to the admin API in the background and the browser gets an
//! immediate 204.

use axum::{
    body::Bytes,
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Router,
};
use std::net::{IpAddr, SocketAddr};

use crate::api::middleware::AppState;
use crate::upstream::ForwardedTrack;

pub fn router() -> Router<AppState> {
    Router::new().route("/track", post(relay_track))
}

/// Client address: first `X-Forwarded-For` hop, else the peer address
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr) -> IpAddr {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|ip| ip.trim().parse::<IpAddr>().ok())
        .unwrap_or_else(|| peer.ip())
}

/// POST /api/track
async fn relay_track(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let header_text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let track = ForwardedTrack {
        body,
        content_type: header_text(header::CONTENT_TYPE),
        client_ip: Some(client_ip(&headers, peer)),
        user_agent: header_text(header::USER_AGENT),
    };

    let admin = state.admin_api.clone();
    tokio::spawn(async move {
        if let Err(e) = admin.forward_track(track).await {
            tracing::warn!("Failed to relay tracking beacon: {}", e);
        }
    });

    StatusCode::NO_CONTENT
}
