//! Order history commands: list, show, cancel.

use super::{CliError, context};

/// List a page of past orders.
pub async fn list(page: u32, limit: u32) -> Result<(), CliError> {
    let ctx = context()?;
    let orders = ctx.commerce.orders(page, limit).await?;

    tracing::info!(
        "Page {page} of {} ({} orders total)",
        orders.total_pages,
        orders.total_elements
    );
    for order in &orders.content {
        tracing::info!(
            "  {}  {}  {}  ${}",
            order.id,
            order.order_number,
            order.status,
            order.total
        );
    }
    Ok(())
}

/// Show one order in detail.
pub async fn show(id: &str) -> Result<(), CliError> {
    let ctx = context()?;
    let order = ctx.commerce.order(&id.into()).await?;

    tracing::info!("Order {} ({})", order.order_number, order.status);
    tracing::info!("Placed {}", order.created_at.format("%Y-%m-%d %H:%M UTC"));
    for item in &order.items {
        tracing::info!(
            "  {} x{}  ${}",
            item.product.name,
            item.quantity,
            item.product.current_price()
        );
    }
    tracing::info!("Subtotal: ${}", order.subtotal);
    tracing::info!("Tax:      ${}", order.tax);
    tracing::info!("Shipping: ${}", order.shipping);
    tracing::info!("Total:    ${}", order.total);
    Ok(())
}

/// Request cancellation of an order.
pub async fn cancel(id: &str, reason: &str) -> Result<(), CliError> {
    let ctx = context()?;

    // Skip the request when the order is already past the point of
    // cancellation; the server still has the final say.
    let order = ctx.commerce.order(&id.into()).await?;
    if !order.status.is_cancellable() {
        return Err(CliError::InvalidInput(format!(
            "order {id} is {} and can no longer be cancelled",
            order.status
        )));
    }

    ctx.commerce.cancel_order(&id.into(), reason).await?;
    tracing::info!("Cancellation requested for order {id}");
    Ok(())
}
