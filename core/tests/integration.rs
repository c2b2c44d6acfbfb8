//! Contract suite and full lifecycle against the live mock server.
//!
//! # Design
//! Each test starts the mock server on a random port, then drives it over
//! real HTTP through `ShortenerClient`. This validates request building,
//! the ureq transport and response decoding end-to-end.

mod common;

use common::*;
use shortener_core::{
    ClientError, Config, Credentials, Shortlink, ShortlinkList, ShortlinkRequest, ShortlinkUpdate,
    ShortenerClient,
};

#[test]
fn create_valid_shortlink() {
    check_create_valid_shortlink(&mock_client());
}

#[test]
fn create_minimal_shortlink() {
    check_create_minimal_shortlink(&mock_client());
}

#[test]
fn create_invalid_url() {
    check_create_invalid_url(&mock_client());
}

#[test]
fn create_without_url() {
    check_create_without_url(&mock_client());
}

#[test]
fn invalid_protocols() {
    check_invalid_protocols(&mock_client());
}

#[test]
fn create_with_expiration() {
    check_create_with_expiration(&mock_client());
}

#[test]
fn list_shape() {
    check_list_shape(&mock_client());
}

#[test]
fn list_is_idempotent() {
    check_list_is_idempotent(&mock_client());
}

#[test]
fn get_created_shortlink() {
    check_get_created_shortlink(&mock_client());
}

#[test]
fn out_of_range_expiry_is_answered_not_dropped() {
    let client = mock_client();
    let resp = client
        .create(&ShortlinkRequest::new("https://example.com").expires_in(u32::MAX))
        .unwrap();
    assert_eq!(resp.status, 500);
    assert_eq!(resp.error_message(), Some("Failed to create shortlink"));

    let list: ShortlinkList = client.list().unwrap().json().unwrap();
    assert_eq!(list.count, 0);
}

#[test]
fn unknown_key_is_forwarded_as_401() {
    let client = mock_client_with_key("wrong-key");
    let resp = client.list().unwrap();
    assert_eq!(resp.status, 401);
    assert_eq!(resp.error_message(), Some("Invalid API key"));
}

#[test]
fn unreachable_service_is_transport_error() {
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let client = ShortenerClient::new(&Config {
        api_url: format!("http://{addr}/api"),
        credentials: Credentials::new(TEST_KEY),
    });
    let err = client.list().unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
}

#[test]
fn crud_lifecycle() {
    let client = mock_client();

    // Step 1: list, should be empty.
    let list: ShortlinkList = client.list().unwrap().json().unwrap();
    assert_eq!(list.count, 0, "expected empty list");

    // Step 2: create.
    let resp = client
        .create(
            &ShortlinkRequest::new("https://example.com/lifecycle")
                .title("Integration test")
                .public(true),
        )
        .unwrap();
    assert_eq!(resp.status, 200);
    let created: Shortlink = resp.json().unwrap();
    // Create only honours the string "true"; the client sends a JSON bool.
    assert!(!created.public);
    assert!(created.expire_at.is_none());
    let id = created.id.clone();

    // Step 3: get.
    let fetched: Shortlink = client.get(&id).unwrap().json().unwrap();
    assert_eq!(fetched.id, id);
    assert_eq!(fetched.short_url, created.short_url);
    assert_eq!(fetched.clicks, Some(0));

    // Step 4: update title, visibility and expiry.
    let update = ShortlinkUpdate {
        title: Some("Updated title".to_string()),
        public: Some(true),
        expires_in: Some(3),
        ..Default::default()
    };
    let resp = client.update(&id, &update).unwrap();
    assert_eq!(resp.status, 200);
    let updated: Shortlink = resp.json().unwrap();
    assert_eq!(updated.title.as_deref(), Some("Updated title"));
    assert_eq!(updated.original_url, "https://example.com/lifecycle");
    assert!(updated.public);
    assert!(updated.expire_at.is_some());

    // Step 5: list, should have one item.
    let list: ShortlinkList = client.list().unwrap().json().unwrap();
    assert_eq!(list.count, 1);
    assert_eq!(list.shortlinks[0].id, id);

    // Step 6: delete.
    let resp = client.delete(&id).unwrap();
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body["message"], "Shortlink deleted successfully");

    // Step 7: get after delete, should be 404.
    let resp = client.get(&id).unwrap();
    assert_eq!(resp.status, 404);
    assert_eq!(resp.error_message(), Some("Shortlink not found"));

    // Step 8: list, should be empty again.
    let list: ShortlinkList = client.list().unwrap().json().unwrap();
    assert_eq!(list.count, 0, "expected empty list after delete");
}
