//! Domain types for the LocalCart commerce API.
//!
//! These mirror the JSON payloads the API exchanges with clients. All wire
//! names are camelCase; monetary amounts arrive as JSON numbers and are
//! decoded into [`Decimal`] to preserve precision. Cart and order
//! aggregates (`subtotal`, `tax`, `shipping`, `total`) are authoritative
//! only from the last server response - nothing in this crate sums them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use localcart_core::{
    CartId, CartItemId, CategoryId, OrderId, OrderStatus, ProductId, UserId, UserRole, VendorId,
};

// =============================================================================
// Auth Types
// =============================================================================

/// The authenticated user, as returned by login, registration, refresh,
/// and profile fetches. Replaced wholesale by each fresh response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID.
    pub id: UserId,
    /// Account email.
    pub email: String,
    /// Given name, when provided at registration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name, when provided at registration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Account role.
    pub role: UserRole,
    /// Vendor record, for `VENDOR` accounts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<VendorId>,
}

/// Response shape shared by `/auth/login`, `/auth/register`, and
/// `/auth/refresh`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Bearer token for subsequent requests.
    pub access_token: String,
    /// Token exchanged for a new access token when the current one expires.
    pub refresh_token: String,
    /// The authenticated user.
    pub user: User,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

// =============================================================================
// Catalog Types
// =============================================================================

/// A catalog product. Read-only reference data; pricing rules are enforced
/// server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// URL-friendly identifier.
    pub slug: String,
    /// Long-form description.
    pub description: String,
    /// List price.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Promotional price; active when present and below `price`.
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub discount_price: Option<Decimal>,
    /// Units in stock.
    pub stock: i64,
    /// Owning category.
    pub category_id: CategoryId,
    /// Selling vendor.
    pub vendor_id: VendorId,
    /// Whether the product is featured on the home page.
    pub featured: bool,
    /// Listing status (e.g. `ACTIVE`); free-form, server-defined.
    pub status: String,
    /// Hosted image URLs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<Vec<String>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether an active promotion applies.
    #[must_use]
    pub fn on_sale(&self) -> bool {
        self.discount_price.is_some_and(|d| d < self.price)
    }

    /// The price a shopper pays right now.
    ///
    /// Selects between the two server-provided numbers; it never computes
    /// a discount itself.
    #[must_use]
    pub fn current_price(&self) -> Decimal {
        if self.on_sale() {
            self.discount_price.unwrap_or(self.price)
        } else {
            self.price
        }
    }
}

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Category ID.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// URL-friendly identifier.
    pub slug: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Parent category, for nested categories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CategoryId>,
}

// =============================================================================
// Cart Types
// =============================================================================

/// A line in the shopping cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Cart item ID (distinct from the product ID).
    pub id: CartItemId,
    /// The product this line refers to.
    pub product_id: ProductId,
    /// Units of the product; always a positive integer.
    pub quantity: u32,
    /// Embedded product snapshot.
    pub product: Product,
    /// Resolved primary image, when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// The shopping cart, a server-computed aggregate.
///
/// `subtotal`, `tax`, `shipping`, and `total` are calculated server-side;
/// after every mutating cart operation the cart is refetched, never
/// patched locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Cart ID.
    pub id: CartId,
    /// Current lines.
    pub items: Vec<CartItem>,
    /// Sum of line prices, before tax and shipping.
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    /// Tax due.
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    /// Shipping cost.
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping: Decimal,
    /// Grand total.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddToCartRequest<'a> {
    pub product_id: &'a ProductId,
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateCartItemRequest {
    pub quantity: u32,
}

// =============================================================================
// Order Types
// =============================================================================

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order ID.
    pub id: OrderId,
    /// Human-readable order number.
    pub order_number: String,
    /// Owning user.
    pub user_id: UserId,
    /// Line items captured at checkout.
    pub items: Vec<CartItem>,
    /// Sum of line prices, before tax and shipping.
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    /// Tax charged.
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    /// Shipping charged.
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping: Decimal,
    /// Grand total.
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    /// Lifecycle status; transitions are server-driven.
    pub status: OrderStatus,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CancelOrderRequest<'a> {
    pub reason: &'a str,
}

// =============================================================================
// Pagination
// =============================================================================

/// A page of results in the API's Spring-style envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page.
    pub content: Vec<T>,
    /// Total items across all pages.
    pub total_elements: i64,
    /// Total page count.
    pub total_pages: i64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;

    fn product_json(price: f64, discount: Option<f64>) -> serde_json::Value {
        let mut v = serde_json::json!({
            "id": "p1",
            "name": "Olive Oil",
            "slug": "olive-oil",
            "description": "Cold pressed",
            "price": price,
            "stock": 10,
            "categoryId": "c1",
            "vendorId": "v1",
            "featured": false,
            "status": "ACTIVE",
            "createdAt": "2026-01-01T00:00:00Z",
            "updatedAt": "2026-01-02T00:00:00Z"
        });
        if let Some(d) = discount {
            v["discountPrice"] = serde_json::json!(d);
        }
        v
    }

    #[test]
    fn test_product_deserializes_money_from_numbers() {
        let product: Product = serde_json::from_value(product_json(19.99, None)).unwrap();
        assert_eq!(product.price, Decimal::from_f64(19.99).unwrap());
        assert!(product.discount_price.is_none());
    }

    #[test]
    fn test_product_on_sale_when_discount_below_price() {
        let product: Product =
            serde_json::from_value(product_json(19.99, Some(14.99))).unwrap();
        assert!(product.on_sale());
        assert_eq!(
            product.current_price(),
            Decimal::from_f64(14.99).unwrap()
        );
    }

    #[test]
    fn test_product_not_on_sale_when_discount_above_price() {
        let product: Product =
            serde_json::from_value(product_json(19.99, Some(24.99))).unwrap();
        assert!(!product.on_sale());
        assert_eq!(
            product.current_price(),
            Decimal::from_f64(19.99).unwrap()
        );
    }

    #[test]
    fn test_cart_aggregates_come_from_wire() {
        let cart: Cart = serde_json::from_value(serde_json::json!({
            "id": "cart1",
            "items": [],
            "subtotal": 10.0,
            "tax": 0.8,
            "shipping": 5.0,
            "total": 15.8
        }))
        .unwrap();
        assert_eq!(cart.total, Decimal::from_f64(15.8).unwrap());
        assert!(cart.items.is_empty());
    }

    #[test]
    fn test_user_optional_fields() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": "u1",
            "email": "a@b.com",
            "role": "CUSTOMER"
        }))
        .unwrap();
        assert!(user.first_name.is_none());
        assert!(user.vendor_id.is_none());
        assert_eq!(user.role, localcart_core::UserRole::Customer);
    }

    #[test]
    fn test_request_wire_names_are_camel_case() {
        let req = AddToCartRequest {
            product_id: &"p1".into(),
            quantity: 2,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"productId": "p1", "quantity": 2}));
    }
}
