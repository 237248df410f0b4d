//! Integration tests for the session lifecycle: login, registration,
//! refresh, profile hydration, and expiry handling.

mod common;

use std::time::Duration;

use secrecy::ExposeSecret;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use localcart_client::{SessionStore, TokenPair, TokenStorage};

#[tokio::test]
async fn login_persists_tokens_and_authenticates() {
    let server = MockServer::start().await;
    let storage = TokenStorage::in_memory();

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .and(body_json(json!({
            "email": "a@b.com",
            "password": "secret"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::auth_body("T1", "R1", "u1", "a@b.com")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = SessionStore::new(common::api_client_with_storage(&server, storage.clone()));
    store.login("a@b.com", "secret").await.expect("login ok");

    let session = store.session();
    assert!(session.is_authenticated);
    assert!(!session.is_loading);
    assert_eq!(session.user.expect("user set").email, "a@b.com");
    assert_eq!(storage.access_token().expect("access").expose_secret(), "T1");
    assert_eq!(
        storage.refresh_token().expect("refresh").expose_secret(),
        "R1"
    );
}

#[tokio::test]
async fn failed_login_leaves_session_untouched() {
    let server = MockServer::start().await;
    let storage = TokenStorage::in_memory();

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Invalid credentials"
        })))
        .mount(&server)
        .await;

    let store = SessionStore::new(common::api_client_with_storage(&server, storage.clone()));
    let err = store
        .login("a@b.com", "wrong")
        .await
        .expect_err("login must fail");
    assert!(err.to_string().contains("Invalid credentials"));

    let session = store.session();
    assert!(!session.is_authenticated);
    assert!(!session.is_loading, "loading flag released on failure");
    assert!(storage.access_token().is_none());
}

#[tokio::test]
async fn register_establishes_a_session() {
    let server = MockServer::start().await;
    let storage = TokenStorage::in_memory();

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/register"))
        .and(body_json(json!({
            "email": "new@b.com",
            "password": "secret",
            "firstName": "Ada",
            "lastName": "Lovelace"
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(common::auth_body("T1", "R1", "u2", "new@b.com")),
        )
        .mount(&server)
        .await;

    let store = SessionStore::new(common::api_client_with_storage(&server, storage.clone()));
    store
        .register("new@b.com", "secret", "Ada", "Lovelace")
        .await
        .expect("register ok");

    assert!(store.is_authenticated());
    assert_eq!(storage.access_token().expect("access").expose_secret(), "T1");
}

#[tokio::test]
async fn logout_clears_tokens_and_user() {
    let server = MockServer::start().await;
    let storage = TokenStorage::in_memory();

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::auth_body("T1", "R1", "u1", "a@b.com")),
        )
        .mount(&server)
        .await;

    let store = SessionStore::new(common::api_client_with_storage(&server, storage.clone()));
    store.login("a@b.com", "secret").await.expect("login ok");
    assert!(store.is_authenticated());

    store.logout();
    assert!(!store.is_authenticated());
    assert!(storage.access_token().is_none());
    assert!(storage.refresh_token().is_none());
}

#[tokio::test]
async fn refresh_without_persisted_token_sends_nothing() {
    let server = MockServer::start().await;
    let store = common::session_store(&server);

    store.refresh().await.expect("no-op refresh is ok");

    assert!(!store.is_authenticated());
    let requests = server.received_requests().await.expect("recording enabled");
    assert!(requests.is_empty(), "no request may be issued");
}

#[tokio::test]
async fn refresh_rotates_both_tokens() {
    let server = MockServer::start().await;
    let storage = TokenStorage::in_memory();
    storage
        .store(TokenPair::new("T1", "R1"))
        .expect("memory store never fails");

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .and(body_json(json!({ "refreshToken": "R1" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::auth_body("T2", "R2", "u1", "a@b.com")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = SessionStore::new(common::api_client_with_storage(&server, storage.clone()));
    store.refresh().await.expect("refresh ok");

    assert!(store.is_authenticated());
    assert_eq!(storage.access_token().expect("access").expose_secret(), "T2");
    assert_eq!(
        storage.refresh_token().expect("refresh").expose_secret(),
        "R2"
    );
}

#[tokio::test]
async fn failed_refresh_falls_back_to_logout() {
    let server = MockServer::start().await;
    let storage = TokenStorage::in_memory();
    storage
        .store(TokenPair::new("T1", "revoked"))
        .expect("memory store never fails");

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Refresh token revoked"
        })))
        .mount(&server)
        .await;

    let store = SessionStore::new(common::api_client_with_storage(&server, storage.clone()));
    store.refresh().await.expect_err("refresh must fail");

    assert!(!store.is_authenticated());
    assert!(storage.access_token().is_none(), "tokens cleared on failure");
}

#[tokio::test]
async fn get_profile_populates_the_user() {
    let server = MockServer::start().await;
    let storage = TokenStorage::in_memory();
    storage
        .store(TokenPair::new("T1", "R1"))
        .expect("memory store never fails");

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/profile"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u1",
            "email": "a@b.com",
            "firstName": "Ada",
            "role": "CUSTOMER"
        })))
        .mount(&server)
        .await;

    let store = SessionStore::new(common::api_client_with_storage(&server, storage));
    let user = store.get_profile().await.expect("profile ok");

    assert_eq!(user.email, "a@b.com");
    assert_eq!(user.first_name.as_deref(), Some("Ada"));
    assert!(store.is_authenticated());
}

#[tokio::test]
async fn failed_profile_fetch_falls_back_to_logout() {
    let server = MockServer::start().await;
    let storage = TokenStorage::in_memory();
    storage
        .store(TokenPair::new("stale", "stale"))
        .expect("memory store never fails");

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/profile"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Token expired"
        })))
        .mount(&server)
        .await;

    let store = SessionStore::new(common::api_client_with_storage(&server, storage.clone()));
    store.get_profile().await.expect_err("profile must fail");

    assert!(!store.is_authenticated());
    assert!(storage.access_token().is_none());
}

#[tokio::test]
async fn expiry_listener_resets_the_session() {
    let server = MockServer::start().await;
    let storage = TokenStorage::in_memory();

    Mock::given(method("POST"))
        .and(path("/api/v1/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::auth_body("T1", "R1", "u1", "a@b.com")),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/cart"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Token expired"
        })))
        .mount(&server)
        .await;

    let client = common::api_client_with_storage(&server, storage.clone());
    let store = SessionStore::new(client.clone());
    let listener = store.spawn_expiry_listener();

    store.login("a@b.com", "secret").await.expect("login ok");
    assert!(store.is_authenticated());

    client
        .get::<serde_json::Value>("/cart")
        .await
        .expect_err("401 must fail");

    // The listener runs on a background task; give it a moment to settle.
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while store.is_authenticated() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "listener did not reset the session in time"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert!(storage.access_token().is_none());
    listener.abort();
}
