//! High-level commerce client: cached reads and invalidating mutations.
//!
//! Reads are keyed by [`CacheKey`] and served from a `moka` cache
//! (5 minute TTL). Mutations never write to the cache; on success they
//! invalidate the resources named by [`Mutation::invalidates`], so the
//! next read issues a fresh fetch and server-computed aggregates are
//! never patched locally.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument, warn};

use localcart_core::{CartItemId, CategoryId, OrderId, ProductId};

use crate::api::ApiError;
use crate::api::cache::{CacheKey, CacheValue, Mutation};
use crate::api::http::ApiClient;
use crate::api::types::{
    AddToCartRequest, CancelOrderRequest, Cart, Category, Order, Page, Product,
    UpdateCartItemRequest,
};

/// Cached entries expire after this long even without invalidation.
const CACHE_TTL: Duration = Duration::from_secs(300);

/// Maximum number of cached read results.
const CACHE_CAPACITY: u64 = 1000;

/// Client for the LocalCart catalog, cart, and order operations.
///
/// Cheap to clone; all clones share the HTTP client and response cache.
#[derive(Clone)]
pub struct CommerceClient {
    inner: Arc<CommerceClientInner>,
}

struct CommerceClientInner {
    http: ApiClient,
    cache: Cache<CacheKey, CacheValue>,
}

impl CommerceClient {
    /// Create a new commerce client over the given HTTP client.
    #[must_use]
    pub fn new(http: ApiClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .support_invalidation_closures()
            .build();

        Self {
            inner: Arc::new(CommerceClientInner { http, cache }),
        }
    }

    /// The underlying HTTP client.
    #[must_use]
    pub fn http(&self) -> &ApiClient {
        &self.inner.http
    }

    // =========================================================================
    // Catalog Reads
    // =========================================================================

    /// Get a page of products. `page` is 1-based.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(&self, page: u32, limit: u32) -> Result<Page<Product>, ApiError> {
        let key = CacheKey::Products { page, limit };

        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&key).await {
            debug!("cache hit for products page");
            return Ok(products);
        }

        // The API counts pages from zero
        let path = format!("/products?page={}&limit={limit}", page.saturating_sub(1));
        let products: Page<Product> = self.inner.http.get(&path).await?;

        self.inner
            .cache
            .insert(key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let key = CacheKey::Product(id.clone());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("cache hit for product");
            return Ok(*product);
        }

        let product: Product = self.inner.http.get(&format!("/products/{id}")).await?;

        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get a product by its URL slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn product_by_slug(&self, slug: &str) -> Result<Product, ApiError> {
        let key = CacheKey::ProductBySlug(slug.to_owned());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("cache hit for product by slug");
            return Ok(*product);
        }

        let product: Product = self
            .inner
            .http
            .get(&format!("/products/slug/{slug}"))
            .await?;

        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Search products by free-text query, optionally within a category.
    ///
    /// Issues exactly one request; search results are volatile and not
    /// cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn search_products(
        &self,
        query: &str,
        category: Option<&CategoryId>,
    ) -> Result<Vec<Product>, ApiError> {
        let mut params = url::form_urlencoded::Serializer::new(String::new());
        params.append_pair("q", query);
        if let Some(category) = category {
            params.append_pair("category", category.as_str());
        }

        self.inner
            .http
            .get(&format!("/products/search?{}", params.finish()))
            .await
    }

    /// Get all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let key = CacheKey::Categories;

        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(&key).await {
            debug!("cache hit for categories");
            return Ok(categories);
        }

        let categories: Vec<Category> = self.inner.http.get("/categories").await?;

        self.inner
            .cache
            .insert(key, CacheValue::Categories(categories.clone()))
            .await;

        Ok(categories)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Get the current user's cart.
    ///
    /// Served from cache until a cart mutation invalidates it; totals are
    /// always the server's numbers.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn cart(&self) -> Result<Cart, ApiError> {
        if let Some(CacheValue::Cart(cart)) = self.inner.cache.get(&CacheKey::Cart).await {
            debug!("cache hit for cart");
            return Ok(*cart);
        }

        let cart: Cart = self.inner.http.get("/cart").await?;

        self.inner
            .cache
            .insert(CacheKey::Cart, CacheValue::Cart(Box::new(cart.clone())))
            .await;

        Ok(cart)
    }

    /// Add a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] (without touching the network)
    /// when `quantity` is zero, or an error if the request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_to_cart(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), ApiError> {
        if quantity < 1 {
            return Err(ApiError::Validation(
                "quantity must be at least 1".to_owned(),
            ));
        }

        self.inner
            .http
            .post_unit(
                "/cart/add-item",
                &AddToCartRequest {
                    product_id,
                    quantity,
                },
            )
            .await?;

        self.invalidate(Mutation::AddCartItem).await;
        Ok(())
    }

    /// Update a cart line's quantity.
    ///
    /// A target quantity below 1 is ignored client-side: no network call,
    /// no cache change, no error.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn update_cart_item(
        &self,
        item_id: &CartItemId,
        quantity: u32,
    ) -> Result<(), ApiError> {
        if quantity < 1 {
            debug!("ignoring cart quantity update below 1");
            return Ok(());
        }

        self.inner
            .http
            .put_unit(
                &format!("/cart/items/{item_id}"),
                &UpdateCartItemRequest { quantity },
            )
            .await?;

        self.invalidate(Mutation::UpdateCartItem).await;
        Ok(())
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn remove_cart_item(&self, item_id: &CartItemId) -> Result<(), ApiError> {
        self.inner
            .http
            .delete_unit(&format!("/cart/items/{item_id}"))
            .await?;

        self.invalidate(Mutation::RemoveCartItem).await;
        Ok(())
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<(), ApiError> {
        self.inner.http.delete_unit("/cart").await?;

        self.invalidate(Mutation::ClearCart).await;
        Ok(())
    }

    /// Convert the cart into an order.
    ///
    /// On success both the cart and the order history are stale and will
    /// be refetched on next access.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn checkout(&self) -> Result<(), ApiError> {
        self.inner
            .http
            .post_unit("/cart/checkout", &serde_json::json!({}))
            .await?;

        self.invalidate(Mutation::Checkout).await;
        Ok(())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Get a page of the user's order history. `page` is 1-based.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn orders(&self, page: u32, limit: u32) -> Result<Page<Order>, ApiError> {
        let key = CacheKey::Orders { page, limit };

        if let Some(CacheValue::Orders(orders)) = self.inner.cache.get(&key).await {
            debug!("cache hit for orders page");
            return Ok(orders);
        }

        let path = format!("/orders?page={}&limit={limit}", page.saturating_sub(1));
        let orders: Page<Order> = self.inner.http.get(&path).await?;

        self.inner
            .cache
            .insert(key, CacheValue::Orders(orders.clone()))
            .await;

        Ok(orders)
    }

    /// Get an order by its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not found or the request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn order(&self, id: &OrderId) -> Result<Order, ApiError> {
        let key = CacheKey::Order(id.clone());

        if let Some(CacheValue::Order(order)) = self.inner.cache.get(&key).await {
            debug!("cache hit for order");
            return Ok(*order);
        }

        let order: Order = self.inner.http.get(&format!("/orders/{id}")).await?;

        self.inner
            .cache
            .insert(key, CacheValue::Order(Box::new(order.clone())))
            .await;

        Ok(order)
    }

    /// Request cancellation of an order.
    ///
    /// The server decides whether the order is still cancellable.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn cancel_order(&self, id: &OrderId, reason: &str) -> Result<(), ApiError> {
        self.inner
            .http
            .post_unit(&format!("/orders/{id}/cancel"), &CancelOrderRequest { reason })
            .await?;

        self.invalidate(Mutation::CancelOrder).await;
        Ok(())
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Drop every cached entry for the resources the mutation names.
    async fn invalidate(&self, mutation: Mutation) {
        for resource in mutation.invalidates() {
            let resource = *resource;
            if let Err(e) = self
                .inner
                .cache
                .invalidate_entries_if(move |key, _| key.resource() == resource)
            {
                warn!(?resource, error = %e, "cache invalidation failed");
            }
        }
        self.inner.cache.run_pending_tasks().await;
    }

    /// Invalidate all cached data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}
