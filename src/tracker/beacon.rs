//! Delivery of tracking events to the admin backend

use once_cell::sync::OnceCell;
use std::time::Duration;

use super::event::TrackEvent;

const SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Fire-and-forget event sink
pub trait Beacon: Send + Sync {
    fn send(&self, event: &TrackEvent);
}

/// Posts events as JSON to `{admin}/api/track`
///
/// Inside a tokio runtime the request is spawned onto it; outside one it is
/// sent with a blocking client. Failures are logged and otherwise ignored.
pub struct HttpBeacon {
    endpoint: String,
    client: reqwest::Client,
    blocking: OnceCell<reqwest::blocking::Client>,
}

impl HttpBeacon {
    pub fn new(admin_api_url: &str) -> Self {
        Self {
            endpoint: format!("{}/api/track", admin_api_url.trim_end_matches('/')),
            client: reqwest::Client::new(),
            blocking: OnceCell::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn send_blocking(&self, body: Vec<u8>) {
        let client = match self.blocking.get_or_try_init(|| {
            reqwest::blocking::Client::builder()
                .timeout(SEND_TIMEOUT)
                .build()
        }) {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!("Failed to build tracking client: {}", e);
                return;
            }
        };

        let result = client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send();
        if let Err(e) = result {
            tracing::debug!("Tracking beacon failed: {}", e);
        }
    }
}

impl std::fmt::Debug for HttpBeacon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBeacon")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl Drop for HttpBeacon {
    /// The blocking client owns its own runtime, which may not be shut
    /// down from async context; inside a runtime it is released on a
    /// plain thread instead.
    fn drop(&mut self) {
        if let Some(client) = self.blocking.take() {
            if tokio::runtime::Handle::try_current().is_ok() {
                std::thread::spawn(move || drop(client));
            }
        }
    }
}

impl Beacon for HttpBeacon {
    fn send(&self, event: &TrackEvent) {
        let body = match serde_json::to_vec(event) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Failed to encode tracking event: {}", e);
                return;
            }
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let request = self
                    .client
                    .post(&self.endpoint)
                    .header(reqwest::header::CONTENT_TYPE, "application/json")
                    .timeout(SEND_TIMEOUT)
                    .body(body);
                handle.spawn(async move {
                    if let Err(e) = request.send().await {
                        tracing::debug!("Tracking beacon failed: {}", e);
                    }
                });
            }
            Err(_) => self.send_blocking(body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::event::{EventExtras, PageContext, TrackAction};
    use axum::{routing::post, Json, Router};
    use serde_json::Value;
    use tokio::sync::mpsc;

    fn event() -> TrackEvent {
        TrackEvent::new(
            TrackAction::Pageview,
            "v_test".to_string(),
            "s_test".to_string(),
            &PageContext::new("/", "ua"),
            EventExtras::default(),
        )
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            HttpBeacon::new("http://localhost:8080/").endpoint(),
            "http://localhost:8080/api/track"
        );
    }

    #[tokio::test]
    async fn test_send_inside_runtime_reaches_server() {
        let (tx, mut rx) = mpsc::unbounded_channel::<Value>();
        let app = Router::new().route(
            "/api/track",
            post(move |Json(body): Json<Value>| {
                let tx = tx.clone();
                async move {
                    let _ = tx.send(body);
                    axum::http::StatusCode::NO_CONTENT
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        HttpBeacon::new(&format!("http://{}", addr)).send(&event());

        let body = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(body["visitor_id"], "v_test");
        assert_eq!(body["action"], "pageview");
    }

    #[test]
    fn test_send_without_runtime_swallows_errors() {
        // Nothing listens on port 9; the blocking path must not panic
        HttpBeacon::new("http://127.0.0.1:9").send(&event());
    }

    #[test]
    fn test_drop_inside_runtime_after_blocking_send() {
        let beacon = HttpBeacon::new("http://127.0.0.1:9");
        beacon.send(&event());
        assert!(beacon.blocking.get().is_some());

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async move {
            drop(beacon);
        });
    }
}
