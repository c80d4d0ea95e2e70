mod common;

use axum::http::{header, StatusCode};
use axum_test::TestServer;
use common::*;
use serde_json::Value;

fn cache_control(response: &axum_test::TestResponse) -> String {
    response
        .headers()
        .get(header::CACHE_CONTROL)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn test_home_page() {
    let upstream = spawn_upstream().await;
    let site = site_dir();
    let config = test_config(&site, &upstream.base_url, None);
    let server = TestServer::new(app(&config, vec![])).unwrap();

    let response = server.get("/").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), INDEX_HTML);
    assert_eq!(cache_control(&response), "no-cache");
    assert!(response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/html"));
}

#[tokio::test]
async fn test_category_slug_serves_listing() {
    let upstream = spawn_upstream().await;
    let site = site_dir();
    let config = test_config(&site, &upstream.base_url, None);
    let server = TestServer::new(app(&config, vec![])).unwrap();

    let response = server.get(&format!("/{}", CATEGORY_SLUG)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), LISTING_HTML);
}

#[tokio::test]
async fn test_other_slug_serves_article() {
    let upstream = spawn_upstream().await;
    let site = site_dir();
    let config = test_config(&site, &upstream.base_url, None);
    let server = TestServer::new(app(&config, vec![])).unwrap();

    let response = server.get("/messi-lap-cu-dup-123456").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), ARTICLE_HTML);
    assert_eq!(cache_control(&response), "no-cache");
}

#[tokio::test]
async fn test_slug_falls_back_to_article_when_admin_down() {
    let site = site_dir();
    let config = test_config(&site, &dead_url(), None);
    let server = TestServer::new(app(&config, vec![])).unwrap();

    let response = server.get(&format!("/{}", CATEGORY_SLUG)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), ARTICLE_HTML);
}

#[tokio::test]
async fn test_reserved_segments_are_not_found() {
    let upstream = spawn_upstream().await;
    let site = site_dir();
    let config = test_config(&site, &upstream.base_url, None);
    let server = TestServer::new(app(&config, vec![])).unwrap();

    let response = server.get("/api").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = server.get("/api/does-not-exist").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_public_file_served_before_slug() {
    let upstream = spawn_upstream().await;
    let site = site_dir();
    let config = test_config(&site, &upstream.base_url, None);
    let server = TestServer::new(app(&config, vec![])).unwrap();

    let response = server.get("/robots.txt").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "User-agent: *");
    assert_eq!(cache_control(&response), "public, max-age=3600");
}

#[tokio::test]
async fn test_static_asset_headers() {
    let upstream = spawn_upstream().await;
    let site = site_dir();
    let config = test_config(&site, &upstream.base_url, None);
    let server = TestServer::new(app(&config, vec![])).unwrap();

    let response = server.get("/css/style.css").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), STYLE_CSS);
    assert_eq!(cache_control(&response), "public, max-age=3600");
    assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "text/css");
}

#[tokio::test]
async fn test_missing_file_is_json_not_found() {
    let upstream = spawn_upstream().await;
    let site = site_dir();
    let config = test_config(&site, &upstream.base_url, None);
    let server = TestServer::new(app(&config, vec![])).unwrap();

    let response = server.get("/css/missing.css").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_not_found_body(&response.json::<Value>());
}

#[tokio::test]
async fn test_path_traversal_rejected() {
    let upstream = spawn_upstream().await;
    let site = site_dir();
    let config = test_config(&site, &upstream.base_url, None);
    let server = TestServer::new(app(&config, vec![])).unwrap();

    let response = server.get("/css/%2E%2E/%2E%2E/admin-bundle/index.html").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_bundle_mounted() {
    let upstream = spawn_upstream().await;
    let site = site_dir();
    let config = test_config(&site, &upstream.base_url, None);
    let server = TestServer::new(app(&config, vec![])).unwrap();

    let response = server.get("/admin/").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), ADMIN_HTML);

    let response = server.get("/admin/missing.js").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_template_is_not_found() {
    let upstream = spawn_upstream().await;
    let site = site_dir();
    std::fs::remove_file(site.path().join("public/article.html")).unwrap();
    let config = test_config(&site, &upstream.base_url, None);
    let server = TestServer::new(app(&config, vec![])).unwrap();

    let response = server.get("/some-article").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_not_found_body(&response.json::<Value>());
}
