//! API middleware and shared HTTP types
//!
//! Contains:
//! - Application state shared by every handler
//! - The JSON error body used for 4xx/5xx responses
//! - The CORS origin policy
//! - Cache-Control header builders

use axum::{
    http::{header, request::Parts, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::cache::{create_cache, MemoryCache};
use crate::config::{Config, SiteConfig};
use crate::services::{FootballService, NewsService, SlugClassifier};
use crate::upstream::{AdminApi, FootballClient, NewsFeed};

/// Values handed to browser scripts by `GET /api/config`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicConfig {
    pub admin_api_url: String,
    pub frontend_domain: String,
}

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub football: Arc<FootballService>,
    pub news: Arc<NewsService>,
    pub slugs: Arc<SlugClassifier>,
    pub admin_api: Arc<AdminApi>,
    pub cache: Arc<MemoryCache>,
    pub site: Arc<SiteConfig>,
    pub public_config: Arc<PublicConfig>,
}

impl AppState {
    /// Wire every service from configuration
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let cache = create_cache(&config.cache);
        let admin_api = AdminApi::new(config.admin.api_url.clone())?;

        let football = FootballService::new(
            FootballClient::new(&config.football)?,
            cache.clone(),
            config.cache.ttl.clone(),
        );
        let news = NewsService::new(
            NewsFeed::new(config.news.feed_url.clone())?,
            cache.clone(),
            config.cache.ttl.clone(),
            config.news.default_limit,
        );

        Ok(Self {
            football: Arc::new(football),
            news: Arc::new(news),
            slugs: Arc::new(SlugClassifier::new(admin_api.clone())),
            admin_api: Arc::new(admin_api),
            cache,
            site: Arc::new(config.site.clone()),
            public_config: Arc::new(PublicConfig {
                admin_api_url: config.admin.api_url.clone(),
                frontend_domain: config.admin.frontend_domain.clone(),
            }),
        })
    }
}

/// Error response for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.error.code.as_str() {
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

// ============================================================================
// CORS
// ============================================================================

/// Which browser origins may call the API
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OriginPolicy {
    allowed: Vec<String>,
}

impl OriginPolicy {
    /// An empty list allows every origin
    pub fn new(allowed: Vec<String>) -> Self {
        Self { allowed }
    }

    /// Whether a request with this `Origin` header is allowed
    ///
    /// Requests without an origin (curl, same-origin navigation) always are.
    pub fn allows(&self, origin: Option<&str>) -> bool {
        match origin {
            None => true,
            Some(_) if self.allowed.is_empty() => true,
            Some(origin) => self.allowed.iter().any(|o| o == origin),
        }
    }

    /// tower-http layer enforcing this policy
    pub fn layer(self) -> CorsLayer {
        let policy = Arc::new(self);
        CorsLayer::new()
            .allow_origin(AllowOrigin::predicate(
                move |origin: &HeaderValue, _parts: &Parts| {
                    let allowed = policy.allows(origin.to_str().ok());
                    if !allowed {
                        tracing::warn!("CORS blocked origin: {:?}", origin);
                    }
                    allowed
                },
            ))
            .allow_credentials(true)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
                Method::PATCH,
            ])
            .allow_headers([
                header::CONTENT_TYPE,
                header::AUTHORIZATION,
                header::HeaderName::from_static("x-requested-with"),
                header::ACCEPT,
                header::ORIGIN,
            ])
            .expose_headers([header::CONTENT_LENGTH, header::CONTENT_TYPE])
            .max_age(Duration::from_secs(86_400))
    }
}

// ============================================================================
// HTTP Cache Headers
// ============================================================================

/// Cache-Control for live scores
pub const CACHE_CONTROL_LIVE: &str = "public, s-maxage=15, stale-while-revalidate=60";
/// Cache-Control for fixtures by date
pub const CACHE_CONTROL_FIXTURES: &str = "public, s-maxage=60, stale-while-revalidate=300";
/// Cache-Control for news headlines
pub const CACHE_CONTROL_NEWS: &str = "public, s-maxage=600, stale-while-revalidate=3600";

/// Build Cache-Control header for static assets
pub fn cache_control_static(max_age: u32) -> String {
    format!("public, max-age={}", max_age)
}

/// Cache-Control for HTML pages
pub fn cache_control_no_cache() -> &'static str {
    "no-cache"
}
