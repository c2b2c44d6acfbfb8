//! Shared fixtures and contract assertions.
//!
//! Every `check_*` function exercises one property of the HTTP contract
//! through a `ShortenerClient`. `integration.rs` runs them against the
//! in-process mock server; `live.rs` runs them against `TEST_API_URL`.

#![allow(dead_code)]

use shortener_core::{
    Config, Credentials, ErrorResponse, Shortlink, ShortlinkList, ShortlinkRequest,
    ShortenerClient,
};

pub const TEST_KEY: &str = "integration-test-key";

/// Start the mock server on a random port and return its API base URL.
pub fn spawn_mock_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, mock_server::Settings::new(TEST_KEY)).await
        })
        .unwrap();
    });

    format!("http://{addr}/api")
}

/// Client pointed at a fresh mock server.
pub fn mock_client() -> ShortenerClient {
    mock_client_with_key(TEST_KEY)
}

pub fn mock_client_with_key(key: &str) -> ShortenerClient {
    ShortenerClient::new(&Config {
        api_url: spawn_mock_server(),
        credentials: Credentials::new(key),
    })
}

fn assert_validation_error(client: &ShortenerClient, url: &str, message: &str) {
    let resp = client.create(&ShortlinkRequest::new(url)).unwrap();
    assert_eq!(resp.status, 400, "{url}: status");
    let err: ErrorResponse = resp.json().unwrap();
    assert_eq!(err.error, message, "{url}: error message");
}

pub fn check_create_valid_shortlink(client: &ShortenerClient) {
    let resp = client
        .create(&ShortlinkRequest::new("https://example.com").title("Test Link"))
        .unwrap();
    assert_eq!(resp.status, 200);
    assert!(resp.body.get("id").is_some());
    let link: Shortlink = resp.json().unwrap();
    assert_eq!(link.original_url, "https://example.com");
    assert_eq!(link.title.as_deref(), Some("Test Link"));
    assert!(link.short_url.is_some_and(|url| !url.is_empty()));
}

pub fn check_create_minimal_shortlink(client: &ShortenerClient) {
    let resp = client
        .create(&ShortlinkRequest::new("http://example.com/path"))
        .unwrap();
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body["originalUrl"], "http://example.com/path");
    let short_url = resp.body["shortUrl"].as_str().unwrap_or_default();
    assert!(!short_url.is_empty());
}

pub fn check_create_invalid_url(client: &ShortenerClient) {
    assert_validation_error(client, "not-a-valid-url", "Invalid URL format");
}

pub fn check_create_without_url(client: &ShortenerClient) {
    assert_validation_error(client, "", "Original URL is required");
}

pub fn check_invalid_protocols(client: &ShortenerClient) {
    for url in ["ftp://example.com", "ws://example.com", "file://example.com"] {
        assert_validation_error(client, url, "URL must use HTTP or HTTPS protocol");
    }
}

pub fn check_create_with_expiration(client: &ShortenerClient) {
    let resp = client
        .create(&ShortlinkRequest::new("https://example.com").expires_in(7))
        .unwrap();
    assert_eq!(resp.status, 200);
    assert!(resp.body.get("expireAt").is_some_and(|v| !v.is_null()));
}

pub fn check_list_shape(client: &ShortenerClient) {
    let resp = client.list().unwrap();
    assert_eq!(resp.status, 200);
    assert!(resp.body["shortlinks"].is_array());
    assert!(resp.body["count"].is_u64());
    let list: ShortlinkList = resp.json().unwrap();
    assert_eq!(list.count, list.shortlinks.len());
}

pub fn check_list_is_idempotent(client: &ShortenerClient) {
    let first: ShortlinkList = client.list().unwrap().json().unwrap();
    let second: ShortlinkList = client.list().unwrap().json().unwrap();
    assert_eq!(first.count, second.count);
}

pub fn check_get_created_shortlink(client: &ShortenerClient) {
    let created: Shortlink = client
        .create(&ShortlinkRequest::new("https://example.com/get").title("Fetch me"))
        .unwrap()
        .json()
        .unwrap();

    let resp = client.get(&created.id).unwrap();
    assert_eq!(resp.status, 200);
    let fetched: Shortlink = resp.json().unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.original_url, "https://example.com/get");
    assert_eq!(fetched.title.as_deref(), Some("Fetch me"));
}
