#![allow(dead_code)]

use axum::{
    extract::{ConnectInfo, Query},
    http::{header, HeaderMap},
    routing::{get, post},
    Json, Router,
};
use bongdaha::api::{build_router, AppState, OriginPolicy};
use bongdaha::config::Config;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc;
use tower::Layer;

pub const INDEX_HTML: &str = "<html><body>home</body></html>";
pub const ARTICLE_HTML: &str = "<html><body>article template</body></html>";
pub const LISTING_HTML: &str = "<html><body>listing template</body></html>";
pub const ADMIN_HTML: &str = "<html><body>admin panel</body></html>";
pub const STYLE_CSS: &str = "body { color: #111; }";

pub const CATEGORY_SLUG: &str = "ngoai-hang-anh";

pub const RSS_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel>
  <title>The thao</title><link>https://example.com</link><description>news</description>
  <item><title>Tin 1</title><link>https://example.com/1</link><pubDate>Sat, 01 Mar 2025 10:00:00 +0700</pubDate></item>
  <item><title>Tin 2</title><link>https://example.com/2</link></item>
  <item><title>Tin 3</title><link>https://example.com/3</link></item>
</channel></rss>"#;

/// A tracking beacon as received by the fake admin API
#[derive(Debug, Clone)]
pub struct ReceivedTrack {
    pub forwarded_for: Option<String>,
    pub user_agent: Option<String>,
    pub body: Value,
}

/// Fake upstream services bound to a local port
pub struct Upstream {
    pub base_url: String,
    pub football_hits: Arc<AtomicUsize>,
    pub tracks: mpsc::UnboundedReceiver<ReceivedTrack>,
}

impl Upstream {
    pub fn football_hits(&self) -> usize {
        self.football_hits.load(Ordering::SeqCst)
    }
}

/// Serve `app` on 127.0.0.1 and return its base URL
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// One server playing API-Football, the RSS feed and the admin API
pub async fn spawn_upstream() -> Upstream {
    let hits = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = mpsc::unbounded_channel();

    let fixtures_hits = hits.clone();
    let leagues_hits = hits.clone();
    let app = Router::new()
        .route(
            "/fixtures",
            get(move |headers: HeaderMap, Query(q): Query<HashMap<String, String>>| {
                let hits = fixtures_hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    if headers.get("x-apisports-key").is_none() {
                        return Json(json!({"errors": {"token": "missing"}, "response": []}));
                    }
                    Json(json!({
                        "response": [{
                            "fixture": {"id": 1035037, "status": {"short": "NS"}},
                            "query": q
                        }]
                    }))
                }
            }),
        )
        .route(
            "/leagues",
            get(move || {
                let hits = leagues_hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Json(json!({"response": [{"league": {"id": 39, "name": "Premier League"}}]}))
                }
            }),
        )
        .route(
            "/rss",
            get(|| async { ([(header::CONTENT_TYPE, "application/rss+xml")], RSS_FEED) }),
        )
        .route(
            "/api/public/categories",
            get(|| async {
                Json(json!({
                    "success": true,
                    "data": [{"id": 1, "name": "Ngoại hạng Anh", "slug": CATEGORY_SLUG, "article_count": 12}]
                }))
            }),
        )
        .route(
            "/api/track",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let tx = tx.clone();
                async move {
                    let text = |name: &str| {
                        headers
                            .get(name)
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string)
                    };
                    let _ = tx.send(ReceivedTrack {
                        forwarded_for: text("x-forwarded-for"),
                        user_agent: text("user-agent"),
                        body,
                    });
                    Json(json!({"success": true}))
                }
            }),
        );

    Upstream {
        base_url: serve(app).await,
        football_hits: hits,
        tracks: rx,
    }
}

/// Public and admin directories with the page templates
pub fn site_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let public = dir.path().join("public");
    let admin = dir.path().join("admin-bundle");
    std::fs::create_dir_all(public.join("css")).unwrap();
    std::fs::create_dir_all(&admin).unwrap();

    std::fs::write(public.join("index.html"), INDEX_HTML).unwrap();
    std::fs::write(public.join("article.html"), ARTICLE_HTML).unwrap();
    std::fs::write(public.join("articles.html"), LISTING_HTML).unwrap();
    std::fs::write(public.join("css/style.css"), STYLE_CSS).unwrap();
    std::fs::write(public.join("robots.txt"), "User-agent: *").unwrap();
    std::fs::write(admin.join("index.html"), ADMIN_HTML).unwrap();
    dir
}

/// Config pointing every upstream at `upstream_url`
pub fn test_config(site: &TempDir, upstream_url: &str, api_key: Option<&str>) -> Config {
    let mut config = Config::default();
    config.football.api_key = api_key.map(str::to_string);
    config.football.base_url = upstream_url.to_string();
    config.news.feed_url = format!("{}/rss", upstream_url);
    config.admin.api_url = upstream_url.to_string();
    config.admin.frontend_domain = "https://bongdaha.example".to_string();
    config.site.public_dir = site.path().join("public");
    config.site.admin_dir = site.path().join("admin-bundle");
    config.site.admin_mount = "admin".to_string();
    config
}

/// The full application router with a fixed peer address
pub fn app(config: &Config, origins: Vec<String>) -> Router {
    let state = AppState::from_config(config).unwrap();
    build_router(state, OriginPolicy::new(origins)).layer(MockConnectInfoLayer)
}

/// An address nothing listens on
pub fn dead_url() -> String {
    "http://127.0.0.1:9".to_string()
}

pub const PEER_ADDR: &str = "127.0.0.1:12345";

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = PEER_ADDR.parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

pub fn assert_not_found_body(body: &Value) {
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(body["error"]["message"], "Not found");
}

