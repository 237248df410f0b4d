//! Cart commands: show, add, update, remove, clear, checkout.

use super::{CliError, context};

/// Display the cart with the server's totals.
pub async fn show() -> Result<(), CliError> {
    let ctx = context()?;
    let cart = ctx.commerce.cart().await?;

    if cart.items.is_empty() {
        tracing::info!("Your cart is empty");
        return Ok(());
    }

    for item in &cart.items {
        tracing::info!(
            "  {}  {} x{}  ${}",
            item.id,
            item.product.name,
            item.quantity,
            item.product.current_price()
        );
    }
    tracing::info!("Subtotal: ${}", cart.subtotal);
    tracing::info!("Tax:      ${}", cart.tax);
    tracing::info!("Shipping: ${}", cart.shipping);
    tracing::info!("Total:    ${}", cart.total);
    Ok(())
}

/// Add a product to the cart.
pub async fn add(product_id: &str, quantity: u32) -> Result<(), CliError> {
    let ctx = context()?;
    ctx.commerce
        .add_to_cart(&product_id.into(), quantity)
        .await?;
    tracing::info!("Added {quantity} x {product_id} to the cart");
    Ok(())
}

/// Change a cart line's quantity.
pub async fn update(item_id: &str, quantity: u32) -> Result<(), CliError> {
    let ctx = context()?;
    ctx.commerce
        .update_cart_item(&item_id.into(), quantity)
        .await?;
    tracing::info!("Updated {item_id} to quantity {quantity}");
    Ok(())
}

/// Remove a line from the cart.
pub async fn remove(item_id: &str) -> Result<(), CliError> {
    let ctx = context()?;
    ctx.commerce.remove_cart_item(&item_id.into()).await?;
    tracing::info!("Removed {item_id} from the cart");
    Ok(())
}

/// Empty the cart.
pub async fn clear() -> Result<(), CliError> {
    let ctx = context()?;
    ctx.commerce.clear_cart().await?;
    tracing::info!("Cart cleared");
    Ok(())
}

/// Convert the cart into an order.
pub async fn checkout() -> Result<(), CliError> {
    let ctx = context()?;
    ctx.commerce.checkout().await?;

    // The new order is at the top of page 1 once the caches refill.
    let orders = ctx.commerce.orders(1, 1).await?;
    match orders.content.first() {
        Some(order) => tracing::info!(
            "Order {} placed, total ${}",
            order.order_number,
            order.total
        ),
        None => tracing::info!("Checkout complete"),
    }
    Ok(())
}
