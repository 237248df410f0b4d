//! Shared fixtures for the wiremock-backed integration tests.

#![allow(dead_code)]

use serde_json::{Value, json};
use wiremock::MockServer;

use localcart_client::{ApiClient, ClientConfig, CommerceClient, SessionStore, TokenStorage};

/// Build an API client pointed at the mock server, with memory-only
/// token storage.
#[must_use]
pub fn api_client(server: &MockServer) -> ApiClient {
    api_client_with_storage(server, TokenStorage::in_memory())
}

/// Build an API client pointed at the mock server over explicit storage.
#[must_use]
pub fn api_client_with_storage(server: &MockServer, storage: TokenStorage) -> ApiClient {
    let config = ClientConfig::new(&format!("{}/api/v1", server.uri()))
        .expect("mock server URI is a valid base URL");
    ApiClient::new(&config, storage)
}

/// Build a commerce client pointed at the mock server.
#[must_use]
pub fn commerce_client(server: &MockServer) -> CommerceClient {
    CommerceClient::new(api_client(server))
}

/// Build a session store pointed at the mock server.
#[must_use]
pub fn session_store(server: &MockServer) -> SessionStore {
    SessionStore::new(api_client(server))
}

/// A minimal product body.
#[must_use]
pub fn product_body(id: &str, name: &str, price: f64) -> Value {
    json!({
        "id": id,
        "name": name,
        "slug": name.to_lowercase().replace(' ', "-"),
        "description": "Test product",
        "price": price,
        "stock": 25,
        "categoryId": "c1",
        "vendorId": "v1",
        "featured": false,
        "status": "ACTIVE",
        "createdAt": "2026-01-01T00:00:00Z",
        "updatedAt": "2026-01-01T00:00:00Z"
    })
}

/// A cart body with the given items and server-computed totals.
#[must_use]
pub fn cart_body(items: Vec<Value>, subtotal: f64, total: f64) -> Value {
    json!({
        "id": "cart1",
        "items": items,
        "subtotal": subtotal,
        "tax": 0.0,
        "shipping": 0.0,
        "total": total
    })
}

/// A cart item body wrapping a product.
#[must_use]
pub fn cart_item_body(item_id: &str, product: Value, quantity: u32) -> Value {
    let product_id = product["id"].clone();
    json!({
        "id": item_id,
        "productId": product_id,
        "quantity": quantity,
        "product": product
    })
}

/// An order body with the given status.
#[must_use]
pub fn order_body(id: &str, order_number: &str, status: &str) -> Value {
    json!({
        "id": id,
        "orderNumber": order_number,
        "userId": "u1",
        "items": [],
        "subtotal": 10.0,
        "tax": 0.8,
        "shipping": 5.0,
        "total": 15.8,
        "status": status,
        "createdAt": "2026-02-01T12:00:00Z"
    })
}

/// A Spring-style page envelope.
#[must_use]
pub fn page_body(content: Vec<Value>, total_elements: i64) -> Value {
    json!({
        "content": content,
        "totalElements": total_elements,
        "totalPages": 1
    })
}

/// The auth response shared by login, register, and refresh.
#[must_use]
pub fn auth_body(access: &str, refresh: &str, user_id: &str, email: &str) -> Value {
    json!({
        "accessToken": access,
        "refreshToken": refresh,
        "user": {
            "id": user_id,
            "email": email,
            "role": "CUSTOMER"
        }
    })
}
