//! Cache keys and the mutation-to-invalidation mapping.
//!
//! Every read operation is bound to a [`CacheKey`]; every mutation names,
//! through [`Mutation::invalidates`], the [`Resource`]s whose cached reads
//! it makes stale. The mapping is explicit (and tested) rather than left
//! to implicit key matching, so a reviewer can see the whole contract in
//! one place:
//!
//! | Mutation          | Invalidates   |
//! |-------------------|---------------|
//! | `AddCartItem`     | cart          |
//! | `UpdateCartItem`  | cart          |
//! | `RemoveCartItem`  | cart          |
//! | `ClearCart`       | cart          |
//! | `Checkout`        | cart, orders  |
//! | `CancelOrder`     | orders        |

use localcart_core::{OrderId, ProductId};

use crate::api::types::{Cart, Category, Order, Page, Product};

/// Cache key for read operations, composite over resource and parameters.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    /// Paginated product listing.
    Products {
        /// 1-based page number.
        page: u32,
        /// Page size.
        limit: u32,
    },
    /// A single product by ID.
    Product(ProductId),
    /// A single product by slug.
    ProductBySlug(String),
    /// The category list.
    Categories,
    /// The current user's cart.
    Cart,
    /// Paginated order history.
    Orders {
        /// 1-based page number.
        page: u32,
        /// Page size.
        limit: u32,
    },
    /// A single order by ID.
    Order(OrderId),
}

impl CacheKey {
    /// The resource family this key belongs to, used when a mutation
    /// invalidates everything cached for that resource.
    #[must_use]
    pub const fn resource(&self) -> Resource {
        match self {
            Self::Products { .. } | Self::Product(_) | Self::ProductBySlug(_) => {
                Resource::Products
            }
            Self::Categories => Resource::Categories,
            Self::Cart => Resource::Cart,
            Self::Orders { .. } | Self::Order(_) => Resource::Orders,
        }
    }
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    /// A page of products.
    Products(Page<Product>),
    /// A single product.
    Product(Box<Product>),
    /// The category list.
    Categories(Vec<Category>),
    /// The current cart.
    Cart(Box<Cart>),
    /// A page of orders.
    Orders(Page<Order>),
    /// A single order.
    Order(Box<Order>),
}

/// Resource families that reads cache under and mutations invalidate.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Resource {
    /// Catalog products (all keyings: page, ID, slug).
    Products,
    /// Category list.
    Categories,
    /// The current cart.
    Cart,
    /// Order history (pages and single orders).
    Orders,
}

/// The mutations the client can issue, each bound to its invalidation set.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Mutation {
    /// POST `/cart/add-item`
    AddCartItem,
    /// PUT `/cart/items/{id}`
    UpdateCartItem,
    /// DELETE `/cart/items/{id}`
    RemoveCartItem,
    /// DELETE `/cart`
    ClearCart,
    /// POST `/cart/checkout`
    Checkout,
    /// POST `/orders/{id}/cancel`
    CancelOrder,
}

impl Mutation {
    /// The resources whose cached reads become stale once this mutation
    /// settles successfully.
    #[must_use]
    pub const fn invalidates(self) -> &'static [Resource] {
        match self {
            Self::AddCartItem | Self::UpdateCartItem | Self::RemoveCartItem | Self::ClearCart => {
                &[Resource::Cart]
            }
            Self::Checkout => &[Resource::Cart, Resource::Orders],
            Self::CancelOrder => &[Resource::Orders],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_mutations_invalidate_cart_only() {
        for mutation in [
            Mutation::AddCartItem,
            Mutation::UpdateCartItem,
            Mutation::RemoveCartItem,
            Mutation::ClearCart,
        ] {
            assert_eq!(mutation.invalidates(), &[Resource::Cart], "{mutation:?}");
        }
    }

    #[test]
    fn test_checkout_invalidates_cart_and_orders() {
        assert_eq!(
            Mutation::Checkout.invalidates(),
            &[Resource::Cart, Resource::Orders]
        );
    }

    #[test]
    fn test_cancel_order_invalidates_orders_only() {
        assert_eq!(Mutation::CancelOrder.invalidates(), &[Resource::Orders]);
    }

    #[test]
    fn test_no_mutation_invalidates_catalog_reads() {
        for mutation in [
            Mutation::AddCartItem,
            Mutation::UpdateCartItem,
            Mutation::RemoveCartItem,
            Mutation::ClearCart,
            Mutation::Checkout,
            Mutation::CancelOrder,
        ] {
            assert!(!mutation.invalidates().contains(&Resource::Products));
            assert!(!mutation.invalidates().contains(&Resource::Categories));
        }
    }

    #[test]
    fn test_key_resource_families() {
        assert_eq!(
            CacheKey::Products { page: 1, limit: 12 }.resource(),
            Resource::Products
        );
        assert_eq!(
            CacheKey::Product(ProductId::from("p1")).resource(),
            Resource::Products
        );
        assert_eq!(
            CacheKey::ProductBySlug("olive-oil".to_owned()).resource(),
            Resource::Products
        );
        assert_eq!(CacheKey::Categories.resource(), Resource::Categories);
        assert_eq!(CacheKey::Cart.resource(), Resource::Cart);
        assert_eq!(
            CacheKey::Orders { page: 2, limit: 10 }.resource(),
            Resource::Orders
        );
        assert_eq!(
            CacheKey::Order(OrderId::from("o1")).resource(),
            Resource::Orders
        );
    }
}
