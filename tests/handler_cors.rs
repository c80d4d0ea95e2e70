mod common;

use axum::http::{header, Method, StatusCode};
use axum_test::TestServer;
use common::{app, site_dir, spawn_upstream, test_config};

const ALLOWED: &str = "https://bongdaha.example";

#[tokio::test]
async fn test_allowed_origin_is_echoed() {
    let upstream = spawn_upstream().await;
    let site = site_dir();
    let config = test_config(&site, &upstream.base_url, None);
    let server = TestServer::new(app(&config, vec![ALLOWED.to_string()])).unwrap();

    let response = server.get("/api/config").add_header("Origin", ALLOWED).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), ALLOWED);
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
}

#[tokio::test]
async fn test_disallowed_origin_gets_no_cors_headers() {
    let upstream = spawn_upstream().await;
    let site = site_dir();
    let config = test_config(&site, &upstream.base_url, None);
    let server = TestServer::new(app(&config, vec![ALLOWED.to_string()])).unwrap();

    let response = server
        .get("/api/config")
        .add_header("Origin", "https://evil.example")
        .await;
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_empty_allow_list_accepts_any_origin() {
    let upstream = spawn_upstream().await;
    let site = site_dir();
    let config = test_config(&site, &upstream.base_url, None);
    let server = TestServer::new(app(&config, vec![])).unwrap();

    let response = server
        .get("/api/config")
        .add_header("Origin", "http://localhost:5173")
        .await;
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:5173"
    );
}

#[tokio::test]
async fn test_preflight() {
    let upstream = spawn_upstream().await;
    let site = site_dir();
    let config = test_config(&site, &upstream.base_url, None);
    let server = TestServer::new(app(&config, vec![ALLOWED.to_string()])).unwrap();

    let response = server
        .method(Method::OPTIONS, "/api/track")
        .add_header("Origin", ALLOWED)
        .add_header("Access-Control-Request-Method", "POST")
        .add_header("Access-Control-Request-Headers", "content-type")
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers.get(header::ACCESS_CONTROL_MAX_AGE).unwrap(), "86400");
    assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), ALLOWED);
    let methods = headers
        .get(header::ACCESS_CONTROL_ALLOW_METHODS)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(methods.contains("POST"));
    assert!(methods.contains("PATCH"));
}
