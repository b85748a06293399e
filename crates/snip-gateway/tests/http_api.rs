use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use snip_gateway::model::{CreateUrlResponse, ErrorResponse};
use snip_gateway::{App, AppState};
use snip_generator::Base62Generator;
use snip_shortener::ShortenerService;
use snip_storage::InMemoryStore;
use std::sync::Arc;
use tower::ServiceExt;

const BASE_URL: &str = "http://sn.ip";

fn app() -> Router {
    let shortener = ShortenerService::new(InMemoryStore::new(), Base62Generator::new());
    App::router(AppState::new(Arc::new(shortener), BASE_URL))
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

fn create_request(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/v1/urls")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn json_body<T: serde::de::DeserializeOwned>(response: Response) -> T {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn error_message(response: Response) -> String {
    json_body::<ErrorResponse>(response).await.error
}

async fn shorten(app: &Router, url: &str) -> CreateUrlResponse {
    let body = serde_json::json!({ "url": url }).to_string();
    let response = send(app, create_request(&body)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response).await
}

#[tokio::test]
async fn health() {
    let app = app();
    let response = send(&app, get_request("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = json_body(response).await;
    assert_eq!(body, serde_json::json!({ "status": "ok" }));
}

#[tokio::test]
async fn create_redirect_delete() {
    let app = app();

    let created = shorten(&app, "https://example.com").await;
    assert_eq!(created.short_key.len(), 8);
    assert!(created.short_key.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(created.url, "https://example.com");
    assert_eq!(
        created.short_url,
        format!("{BASE_URL}/{}", created.short_key)
    );

    let response = send(&app, get_request(&format!("/{}", created.short_key))).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "https://example.com"
    );

    let uri = format!("/api/v1/urls/{}", created.short_key);
    let response = send(&app, delete_request(&uri)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, delete_request(&uri)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, get_request(&format!("/{}", created.short_key))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_message(response).await, "URL not found");
}

#[tokio::test]
async fn same_url_gets_independent_keys() {
    let app = app();
    let first = shorten(&app, "https://example.com/same").await;
    let second = shorten(&app, "https://example.com/same").await;
    assert_ne!(first.short_key, second.short_key);
}

#[tokio::test]
async fn create_rejects_bad_input() {
    let app = app();
    let cases = [
        (r#"{"url": "ftp://example.com"}"#, "Invalid URL. Must be absolute with http(s) scheme"),
        (r#"{"url": "/just/a/path"}"#, "Invalid URL. Must be absolute with http(s) scheme"),
        (r#"{"url": "example.com"}"#, "Invalid URL. Must be absolute with http(s) scheme"),
        (r#"{"url": "https://example.com/a\nb"}"#, "Invalid URL. Must be absolute with http(s) scheme"),
        (r#"{"url": "https://example.com/a\tb"}"#, "Invalid URL. Must be absolute with http(s) scheme"),
        (r#"{"url": "  https://example.com"}"#, "Invalid URL. Must be absolute with http(s) scheme"),
        (r#"{"url": ""}"#, "Invalid request body"),
        (r#"{"link": "https://example.com"}"#, "Invalid request body"),
        (r#"{"url": "#, "Invalid request body"),
        ("not json", "Invalid request body"),
    ];

    for (body, message) in cases {
        let response = send(&app, create_request(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(error_message(response).await, message, "{body}");
    }
}

#[tokio::test]
async fn rejected_urls_are_never_stored() {
    let app = app();
    let body = serde_json::json!({ "url": "https://example.com/a\nb" }).to_string();
    let response = send(&app, create_request(&body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // a clean URL still round-trips to an exact Location header
    let created = shorten(&app, "https://example.com/a%20b").await;
    let response = send(&app, get_request(&format!("/{}", created.short_key))).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "https://example.com/a%20b"
    );
}

#[tokio::test]
async fn create_requires_json_content_type() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/urls")
        .body(Body::from(r#"{"url": "https://example.com"}"#))
        .unwrap();

    let response = send(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "Invalid request body");
}

#[tokio::test]
async fn invalid_keys() {
    let app = app();

    for key in ["abc123", "abc123def456", "abc-1234", "abc_1234"] {
        let response = send(&app, get_request(&format!("/{key}"))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{key}");
        assert_eq!(error_message(response).await, "Invalid URL key format");

        let response = send(&app, delete_request(&format!("/api/v1/urls/{key}"))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{key}");
        assert_eq!(error_message(response).await, "Invalid URL key format");
    }
}

#[tokio::test]
async fn unknown_key() {
    let app = app();

    let response = send(&app, get_request("/abcd1234")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_message(response).await, "URL not found");

    let response = send(&app, delete_request("/api/v1/urls/abcd1234")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let shortener = ShortenerService::new(InMemoryStore::new(), Base62Generator::new());
    let state = AppState::new(Arc::new(shortener), BASE_URL);
    let origin = HeaderValue::from_static("http://localhost:5173");
    let app = App::service(state, std::slice::from_ref(&origin));

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/urls")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:5173"
    );
}
