//! Authenticated client for the admin API
//!
//! Every call goes to `{admin}/api/...` with the bearer token from the
//! [`TokenStore`]. A `401` on an authenticated call clears the stored
//! token and surfaces as [`AdminError::Unauthorized`].

use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;

use crate::models::{
    image_mime, Article, ArticleInput, ArticleList, ArticleQuery, BlacklistEntry, BlacklistInput,
    Category, CategoryInput, Dashboard, Envelope, ImageFilter, ImageList, ImageRecord, ImageStats,
    SystemInfo, TrendPoint, UploadedImage, VisitorList, VisitorStats, WhitelistEntry,
    WhitelistInput, MAX_IMAGE_BYTES,
};
use crate::tracker::{Storage, StorageError};
use crate::upstream::{build_http_client, DEFAULT_TIMEOUT};

const TOKEN_KEY: &str = "admin_token";
const USER_KEY: &str = "admin_user";

/// Minimum length the admin API accepts for a new password
pub const MIN_PASSWORD_LEN: usize = 6;

/// Error type for admin API calls
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("Session expired, please log in again")]
    Unauthorized,
    #[error("{0}")]
    Api(String),
    #[error("{0}")]
    Invalid(String),
    #[error("Request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Unexpected response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
    #[error("Failed to read {path}: {source}")]
    File {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AdminError {
    fn http(endpoint: &str, source: reqwest::Error) -> Self {
        Self::Http {
            endpoint: endpoint.to_string(),
            source,
        }
    }

    fn decode(endpoint: &str, message: impl ToString) -> Self {
        Self::Decode {
            endpoint: endpoint.to_string(),
            message: message.to_string(),
        }
    }
}

/// Logged-in admin user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
}

/// Bearer token and user kept in storage between runs
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn Storage>,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn user(&self) -> Option<AdminUser> {
        self.storage
            .get(USER_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
    }

    pub fn save(&self, token: &str, user: &AdminUser) -> Result<(), StorageError> {
        self.storage.set(TOKEN_KEY, token)?;
        let user = serde_json::to_string(user).unwrap_or_default();
        self.storage.set(USER_KEY, &user)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(TOKEN_KEY)?;
        self.storage.remove(USER_KEY)
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("logged_in", &self.token().is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    Bearer,
    Anonymous,
}

#[derive(Debug, Clone)]
pub struct AdminClient {
    http: reqwest::Client,
    base_url: String,
    tokens: TokenStore,
}

impl AdminClient {
    /// `admin_api_url` is the admin service root; `/api` is appended
    pub fn new(admin_api_url: &str, tokens: TokenStore) -> Result<Self, reqwest::Error> {
        Ok(Self {
            http: build_http_client(DEFAULT_TIMEOUT)?,
            base_url: format!("{}/api", admin_api_url.trim_end_matches('/')),
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn is_logged_in(&self) -> bool {
        self.tokens.token().is_some()
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, endpoint))
    }

    /// Send a request and unwrap the `{success, data, error}` envelope
    async fn execute<T: DeserializeOwned>(
        &self,
        mut request: RequestBuilder,
        endpoint: &str,
        auth: Auth,
    ) -> Result<Envelope<T>, AdminError> {
        if auth == Auth::Bearer {
            if let Some(token) = self.tokens.token() {
                request = request.header(AUTHORIZATION, format!("Bearer {}", token));
            }
        }

        let response = request
            .send()
            .await
            .map_err(|e| AdminError::http(endpoint, e))?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED && auth == Auth::Bearer {
            tracing::info!("Admin session rejected by {}, clearing token", endpoint);
            self.tokens.clear()?;
            return Err(AdminError::Unauthorized);
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AdminError::http(endpoint, e))?;

        let envelope: Envelope<T> = match serde_json::from_slice(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(AdminError::Api(format!("{} returned HTTP {}", endpoint, status)))
            }
            Err(e) => return Err(AdminError::decode(endpoint, e)),
        };

        if !status.is_success() || !envelope.success {
            return Err(AdminError::Api(envelope.failure_reason()));
        }

        Ok(envelope)
    }

    async fn fetch_data<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> Result<T, AdminError> {
        self.execute::<T>(request, endpoint, Auth::Bearer)
            .await?
            .data
            .ok_or_else(|| AdminError::decode(endpoint, "missing data"))
    }

    /// Send a mutation, returning the envelope's message
    async fn mutate(&self, request: RequestBuilder, endpoint: &str) -> Result<String, AdminError> {
        let envelope = self.execute::<Value>(request, endpoint, Auth::Bearer).await?;
        Ok(envelope.message.unwrap_or_else(|| "OK".to_string()))
    }

    /// Send a create call, returning the new row's id
    async fn create(&self, request: RequestBuilder, endpoint: &str) -> Result<i64, AdminError> {
        let envelope = self.execute::<Value>(request, endpoint, Auth::Bearer).await?;
        envelope
            .extra
            .get("id")
            .and_then(Value::as_i64)
            .ok_or_else(|| AdminError::decode(endpoint, "missing id"))
    }

    // ---- Auth ----

    /// `POST /login`; stores the token on success
    pub async fn login(&self, username: &str, password: &str) -> Result<AdminUser, AdminError> {
        let endpoint = "/login";
        let request = self
            .request(Method::POST, endpoint)
            .json(&json!({ "username": username, "password": password }));
        let envelope = self.execute::<Value>(request, endpoint, Auth::Anonymous).await?;

        let token = envelope
            .extra
            .get("token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AdminError::decode(endpoint, "missing token"))?;
        let user: AdminUser = envelope
            .extra
            .get("user")
            .cloned()
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| AdminError::decode(endpoint, e))?
            .unwrap_or_else(|| AdminUser {
                id: 0,
                username: username.to_string(),
            });

        self.tokens.save(token, &user)?;
        tracing::info!("Logged in as {}", user.username);
        Ok(user)
    }

    pub fn logout(&self) -> Result<(), AdminError> {
        self.tokens.clear()?;
        Ok(())
    }

    pub async fn change_password(&self, old: &str, new: &str) -> Result<String, AdminError> {
        if new.chars().count() < MIN_PASSWORD_LEN {
            return Err(AdminError::Invalid(format!(
                "New password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        let endpoint = "/change-password";
        let request = self
            .request(Method::POST, endpoint)
            .json(&json!({ "old_password": old, "new_password": new }));
        self.mutate(request, endpoint).await
    }

    pub async fn dashboard(&self) -> Result<Dashboard, AdminError> {
        let endpoint = "/dashboard";
        self.fetch_data(self.request(Method::GET, endpoint), endpoint)
            .await
    }

    // ---- Articles ----

    pub async fn articles(&self, query: &ArticleQuery) -> Result<ArticleList, AdminError> {
        let endpoint = "/articles";
        let request = self.request(Method::GET, endpoint).query(query);
        self.fetch_data(request, endpoint).await
    }

    pub async fn article(&self, id: i64) -> Result<Article, AdminError> {
        let endpoint = format!("/articles/{}", id);
        self.fetch_data(self.request(Method::GET, &endpoint), &endpoint)
            .await
    }

    pub async fn create_article(&self, input: &ArticleInput) -> Result<i64, AdminError> {
        input.validate().map_err(AdminError::Invalid)?;
        let endpoint = "/articles";
        let request = self.request(Method::POST, endpoint).json(input);
        self.create(request, endpoint).await
    }

    pub async fn update_article(&self, id: i64, input: &ArticleInput) -> Result<String, AdminError> {
        input.validate().map_err(AdminError::Invalid)?;
        let endpoint = format!("/articles/{}", id);
        let request = self.request(Method::PUT, &endpoint).json(input);
        self.mutate(request, &endpoint).await
    }

    pub async fn delete_article(&self, id: i64) -> Result<String, AdminError> {
        let endpoint = format!("/articles/{}", id);
        self.mutate(self.request(Method::DELETE, &endpoint), &endpoint)
            .await
    }

    pub async fn batch_delete_articles(&self, ids: &[i64]) -> Result<String, AdminError> {
        if ids.is_empty() {
            return Err(AdminError::Invalid("No articles selected".to_string()));
        }
        let endpoint = "/articles/batch-delete";
        let request = self
            .request(Method::POST, endpoint)
            .json(&json!({ "ids": ids }));
        self.mutate(request, endpoint).await
    }

    pub async fn batch_publish_articles(
        &self,
        ids: &[i64],
        is_published: bool,
    ) -> Result<String, AdminError> {
        if ids.is_empty() {
            return Err(AdminError::Invalid("No articles selected".to_string()));
        }
        let endpoint = "/articles/batch-status";
        let request = self
            .request(Method::POST, endpoint)
            .json(&json!({ "ids": ids, "is_published": is_published }));
        self.mutate(request, endpoint).await
    }

    // ---- Categories ----

    pub async fn categories(&self) -> Result<Vec<Category>, AdminError> {
        let endpoint = "/categories";
        let categories: Option<Vec<Category>> = self
            .execute(self.request(Method::GET, endpoint), endpoint, Auth::Bearer)
            .await?
            .data;
        Ok(categories.unwrap_or_default())
    }

    pub async fn create_category(&self, input: &CategoryInput) -> Result<i64, AdminError> {
        if input.name.trim().is_empty() {
            return Err(AdminError::Invalid("Category name is required".to_string()));
        }
        let endpoint = "/categories";
        let request = self.request(Method::POST, endpoint).json(input);
        self.create(request, endpoint).await
    }

    pub async fn update_category(&self, id: i64, input: &CategoryInput) -> Result<String, AdminError> {
        let endpoint = format!("/categories/{}", id);
        let request = self.request(Method::PUT, &endpoint).json(input);
        self.mutate(request, &endpoint).await
    }

    pub async fn delete_category(&self, id: i64) -> Result<String, AdminError> {
        let endpoint = format!("/categories/{}", id);
        self.mutate(self.request(Method::DELETE, &endpoint), &endpoint)
            .await
    }

    // ---- Images ----

    pub async fn image_stats(&self) -> Result<ImageStats, AdminError> {
        let endpoint = "/images/stats";
        self.fetch_data(self.request(Method::GET, endpoint), endpoint)
            .await
    }

    pub async fn images(
        &self,
        page: u64,
        page_size: u64,
        filter: ImageFilter,
    ) -> Result<ImageList, AdminError> {
        let endpoint = "/images/list";
        let mut params = vec![("page", page.to_string()), ("page_size", page_size.to_string())];
        if let Some(is_used) = filter.as_query() {
            params.push(("is_used", is_used.to_string()));
        }
        let request = self.request(Method::GET, endpoint).query(&params);
        let envelope = self
            .execute::<Vec<ImageRecord>>(request, endpoint, Auth::Bearer)
            .await?;

        let number = |key: &str, default: u64| {
            envelope
                .extra
                .get(key)
                .and_then(Value::as_u64)
                .unwrap_or(default)
        };
        Ok(ImageList {
            total: number("total", 0),
            page: number("page", page),
            page_size: number("page_size", page_size),
            images: envelope.data.clone().unwrap_or_default(),
        })
    }

    /// Upload an image file as multipart field `file`
    pub async fn upload_image(&self, path: &Path) -> Result<UploadedImage, AdminError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        let mime = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(image_mime)
            .ok_or_else(|| {
                AdminError::Invalid(format!(
                    "{} is not an image (jpg, jpeg, png, gif, webp, bmp)",
                    file_name
                ))
            })?;

        let bytes = tokio::fs::read(path).await.map_err(|e| AdminError::File {
            path: path.display().to_string(),
            source: e,
        })?;
        if bytes.len() as u64 > MAX_IMAGE_BYTES {
            return Err(AdminError::Invalid(format!(
                "{} is larger than 10MB",
                file_name
            )));
        }

        let endpoint = "/images/upload";
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime)
            .map_err(|e| AdminError::http(endpoint, e))?;
        let request = self
            .request(Method::POST, endpoint)
            .multipart(Form::new().part("file", part));
        self.fetch_data(request, endpoint).await
    }

    pub async fn mark_image_used(&self, id: i64) -> Result<String, AdminError> {
        let endpoint = format!("/images/mark-used/{}", id);
        self.mutate(self.request(Method::POST, &endpoint), &endpoint)
            .await
    }

    pub async fn mark_image_unused(&self, id: i64) -> Result<String, AdminError> {
        let endpoint = format!("/images/mark-unused/{}", id);
        self.mutate(self.request(Method::POST, &endpoint), &endpoint)
            .await
    }

    pub async fn delete_image(&self, id: i64) -> Result<String, AdminError> {
        let endpoint = format!("/images/{}", id);
        self.mutate(self.request(Method::DELETE, &endpoint), &endpoint)
            .await
    }

    // ---- IP lists ----

    pub async fn blacklist(&self) -> Result<Vec<BlacklistEntry>, AdminError> {
        let endpoint = "/blacklist";
        let entries: Option<Vec<BlacklistEntry>> = self
            .execute(self.request(Method::GET, endpoint), endpoint, Auth::Bearer)
            .await?
            .data;
        Ok(entries.unwrap_or_default())
    }

    pub async fn add_to_blacklist(&self, input: &BlacklistInput) -> Result<i64, AdminError> {
        require_ip(&input.ip_address)?;
        let endpoint = "/blacklist";
        let request = self.request(Method::POST, endpoint).json(input);
        self.create(request, endpoint).await
    }

    pub async fn remove_from_blacklist(&self, id: i64) -> Result<String, AdminError> {
        let endpoint = format!("/blacklist/{}", id);
        self.mutate(self.request(Method::DELETE, &endpoint), &endpoint)
            .await
    }

    pub async fn whitelist(&self) -> Result<Vec<WhitelistEntry>, AdminError> {
        let endpoint = "/whitelist";
        let entries: Option<Vec<WhitelistEntry>> = self
            .execute(self.request(Method::GET, endpoint), endpoint, Auth::Bearer)
            .await?
            .data;
        Ok(entries.unwrap_or_default())
    }

    pub async fn add_to_whitelist(&self, input: &WhitelistInput) -> Result<i64, AdminError> {
        require_ip(&input.ip_address)?;
        let endpoint = "/whitelist";
        let request = self.request(Method::POST, endpoint).json(input);
        self.create(request, endpoint).await
    }

    pub async fn remove_from_whitelist(&self, id: i64) -> Result<String, AdminError> {
        let endpoint = format!("/whitelist/{}", id);
        self.mutate(self.request(Method::DELETE, &endpoint), &endpoint)
            .await
    }

    // ---- Visitors ----

    pub async fn visitor_stats(&self) -> Result<VisitorStats, AdminError> {
        let endpoint = "/visitors/stats";
        self.fetch_data(self.request(Method::GET, endpoint), endpoint)
            .await
    }

    /// `date` filters to one day, `YYYY-MM-DD`
    pub async fn visitors(
        &self,
        page: u64,
        page_size: u64,
        date: Option<&str>,
    ) -> Result<VisitorList, AdminError> {
        let endpoint = "/visitors/list";
        let mut params = vec![("page", page.to_string()), ("page_size", page_size.to_string())];
        if let Some(date) = date.filter(|d| !d.is_empty()) {
            params.push(("date", date.to_string()));
        }
        let request = self.request(Method::GET, endpoint).query(&params);
        self.fetch_data(request, endpoint).await
    }

    /// Daily totals for the last `days` days (1..=90)
    pub async fn visitor_trend(&self, days: u32) -> Result<Vec<TrendPoint>, AdminError> {
        let endpoint = "/visitors/trend";
        let request = self
            .request(Method::GET, endpoint)
            .query(&[("days", days.clamp(1, 90).to_string())]);
        let trend: Option<Vec<TrendPoint>> = self
            .execute(request, endpoint, Auth::Bearer)
            .await?
            .data;
        Ok(trend.unwrap_or_default())
    }

    // ---- System ----

    pub async fn system_info(&self) -> Result<SystemInfo, AdminError> {
        let endpoint = "/system/info";
        self.fetch_data(self.request(Method::GET, endpoint), endpoint)
            .await
    }

    /// The caller's IP as the admin API sees it
    pub async fn client_ip(&self) -> Result<String, AdminError> {
        let endpoint = "/system/client-ip";
        let envelope = self
            .execute::<Value>(self.request(Method::GET, endpoint), endpoint, Auth::Bearer)
            .await?;
        envelope
            .extra
            .get("client_ip")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| AdminError::decode(endpoint, "missing client_ip"))
    }

    pub async fn clear_visitors(&self) -> Result<String, AdminError> {
        let endpoint = "/system/clear-visitors";
        self.mutate(self.request(Method::POST, endpoint), endpoint)
            .await
    }

    pub async fn clear_stats(&self) -> Result<String, AdminError> {
        let endpoint = "/system/clear-stats";
        self.mutate(self.request(Method::POST, endpoint), endpoint)
            .await
    }
}

fn require_ip(ip: &str) -> Result<(), AdminError> {
    if ip.trim().is_empty() {
        return Err(AdminError::Invalid("IP address is required".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleStatus;
    use crate::tracker::MemoryStorage;
    use axum::{
        extract::{Multipart, Query},
        http::{HeaderMap, StatusCode as AxumStatus},
        routing::{delete, get, post},
        Json, Router,
    };
    use std::collections::HashMap;
    use tempfile::TempDir;

    const TOKEN: &str = "jwt-token";

    fn authorized(headers: &HeaderMap) -> bool {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| v == format!("Bearer {}", TOKEN))
            .unwrap_or(false)
    }

    fn guarded(headers: &HeaderMap, body: Value) -> (AxumStatus, Json<Value>) {
        if authorized(headers) {
            (AxumStatus::OK, Json(body))
        } else {
            (
                AxumStatus::UNAUTHORIZED,
                Json(json!({"error": "Authorization header required"})),
            )
        }
    }

    fn fake_admin() -> Router {
        Router::new()
            .route(
                "/api/login",
                post(|Json(body): Json<Value>| async move {
                    if body["password"] == "secret" {
                        (
                            AxumStatus::OK,
                            Json(json!({
                                "success": true,
                                "token": TOKEN,
                                "user": {"id": 1, "username": body["username"]}
                            })),
                        )
                    } else {
                        (
                            AxumStatus::UNAUTHORIZED,
                            Json(json!({"error": "Invalid username or password"})),
                        )
                    }
                }),
            )
            .route(
                "/api/articles",
                get(|headers: HeaderMap, Query(q): Query<HashMap<String, String>>| async move {
                    guarded(
                        &headers,
                        json!({
                            "success": true,
                            "data": {
                                "articles": [{"id": 7, "title": "Derby", "slug": "derby", "is_published": q.get("status").map(|s| s == "published").unwrap_or(false)}],
                                "total": 41,
                                "page": q.get("page").and_then(|p| p.parse::<u64>().ok()).unwrap_or(1),
                                "pageSize": 20
                            }
                        }),
                    )
                })
                .post(|headers: HeaderMap| async move {
                    guarded(&headers, json!({"success": true, "id": 99, "message": "Article created successfully"}))
                }),
            )
            .route(
                "/api/articles/batch-status",
                post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                    let ok = body["ids"] == json!([1, 2]) && body["is_published"] == json!(true);
                    guarded(&headers, json!({"success": ok, "message": "Articles updated successfully"}))
                }),
            )
            .route(
                "/api/categories",
                get(|headers: HeaderMap| async move { guarded(&headers, json!({"success": true, "data": null})) }),
            )
            .route(
                "/api/categories/{id}",
                delete(|| async {
                    (
                        AxumStatus::BAD_REQUEST,
                        Json(json!({"error": "Cannot delete category with articles"})),
                    )
                }),
            )
            .route(
                "/api/images/list",
                get(|headers: HeaderMap, Query(q): Query<HashMap<String, String>>| async move {
                    let used = q.get("is_used").cloned().unwrap_or_default() == "false";
                    guarded(
                        &headers,
                        json!({
                            "success": true,
                            "data": [{"id": 3, "file_url": "/uploads/a.png", "is_used": !used}],
                            "total": 1,
                            "page": 1,
                            "page_size": 20
                        }),
                    )
                }),
            )
            .route(
                "/api/images/upload",
                post(|mut multipart: Multipart| async move {
                    let mut name = String::new();
                    let mut size = 0;
                    while let Some(field) = multipart.next_field().await.unwrap() {
                        if field.name() == Some("file") {
                            name = field.file_name().unwrap_or_default().to_string();
                            size = field.bytes().await.unwrap().len();
                        }
                    }
                    Json(json!({
                        "success": true,
                        "data": {"id": 5, "file_name": name, "file_url": "/uploads/x.png", "file_size": size}
                    }))
                }),
            )
            .route(
                "/api/system/client-ip",
                get(|headers: HeaderMap| async move {
                    guarded(&headers, json!({"success": true, "client_ip": "203.0.113.9"}))
                }),
            )
    }

    async fn spawn_admin() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, fake_admin()).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(base: &str) -> AdminClient {
        let tokens = TokenStore::new(Arc::new(MemoryStorage::new()));
        AdminClient::new(base, tokens).unwrap()
    }

    #[test]
    fn test_base_url() {
        let client = client("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080/api");
        assert!(!client.is_logged_in());
    }

    #[tokio::test]
    async fn test_login_stores_token() {
        let client = client(&spawn_admin().await);
        let user = client.login("admin", "secret").await.unwrap();

        assert_eq!(user, AdminUser { id: 1, username: "admin".to_string() });
        assert_eq!(client.tokens().token().as_deref(), Some(TOKEN));
        assert_eq!(client.tokens().user(), Some(user));
    }

    #[tokio::test]
    async fn test_bad_login_is_an_api_error() {
        let client = client(&spawn_admin().await);
        let err = client.login("admin", "wrong").await.unwrap_err();
        assert!(matches!(err, AdminError::Api(ref m) if m == "Invalid username or password"));
        assert!(!client.is_logged_in());
    }

    #[tokio::test]
    async fn test_unauthorized_clears_token() {
        let client = client(&spawn_admin().await);
        client
            .tokens()
            .save("stale", &AdminUser { id: 1, username: "admin".to_string() })
            .unwrap();

        let err = client.articles(&ArticleQuery::default()).await.unwrap_err();
        assert!(matches!(err, AdminError::Unauthorized));
        assert!(!client.is_logged_in());
        assert!(client.tokens().user().is_none());
    }

    #[tokio::test]
    async fn test_article_list_and_create() {
        let client = client(&spawn_admin().await);
        client.login("admin", "secret").await.unwrap();

        let query = ArticleQuery {
            page: 3,
            status: Some(ArticleStatus::Published),
            ..Default::default()
        };
        let list = client.articles(&query).await.unwrap();
        assert_eq!(list.page.total, 41);
        assert_eq!(list.page.page, 3);
        assert_eq!(list.page.page_size, 20);
        assert_eq!(list.articles[0].slug, "derby");
        assert!(list.articles[0].is_published);

        let input = ArticleInput {
            title: "Derby".to_string(),
            slug: "derby".to_string(),
            ..Default::default()
        };
        assert_eq!(client.create_article(&input).await.unwrap(), 99);
    }

    #[tokio::test]
    async fn test_invalid_article_is_rejected_locally() {
        let client = client("http://127.0.0.1:9");
        let err = client.create_article(&ArticleInput::default()).await.unwrap_err();
        assert!(matches!(err, AdminError::Invalid(_)));
    }

    #[tokio::test]
    async fn test_batch_status_body() {
        let client = client(&spawn_admin().await);
        client.login("admin", "secret").await.unwrap();
        let message = client.batch_publish_articles(&[1, 2], true).await.unwrap();
        assert_eq!(message, "Articles updated successfully");

        let err = client.batch_delete_articles(&[]).await.unwrap_err();
        assert!(matches!(err, AdminError::Invalid(_)));
    }

    #[tokio::test]
    async fn test_null_category_list_is_empty() {
        let client = client(&spawn_admin().await);
        client.login("admin", "secret").await.unwrap();
        assert!(client.categories().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_error_body_becomes_api_error() {
        let client = client(&spawn_admin().await);
        client.login("admin", "secret").await.unwrap();
        let err = client.delete_category(4).await.unwrap_err();
        assert_eq!(err.to_string(), "Cannot delete category with articles");
        assert!(client.is_logged_in());
    }

    #[tokio::test]
    async fn test_image_list_paging_beside_data() {
        let client = client(&spawn_admin().await);
        client.login("admin", "secret").await.unwrap();
        let list = client.images(1, 20, ImageFilter::Unused).await.unwrap();
        assert_eq!(list.total, 1);
        assert_eq!(list.page_size, 20);
        assert!(!list.images[0].is_used);
    }

    #[tokio::test]
    async fn test_upload_image() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("crest.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let client = client(&spawn_admin().await);
        let uploaded = client.upload_image(&path).await.unwrap();
        assert_eq!(uploaded.file_name, "crest.png");
        assert_eq!(uploaded.file_size, 4);
    }

    #[tokio::test]
    async fn test_upload_rejects_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hi").unwrap();

        let err = client("http://127.0.0.1:9").upload_image(&path).await.unwrap_err();
        assert!(matches!(err, AdminError::Invalid(_)));
    }

    #[tokio::test]
    async fn test_client_ip() {
        let client = client(&spawn_admin().await);
        client.login("admin", "secret").await.unwrap();
        assert_eq!(client.client_ip().await.unwrap(), "203.0.113.9");
    }

    #[tokio::test]
    async fn test_short_password_rejected_locally() {
        let err = client("http://127.0.0.1:9")
            .change_password("old", "12345")
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::Invalid(_)));
    }
}
