//! Catalog browsing commands: product listing, detail, search, categories.

use super::{CliError, context};

/// List a page of products.
pub async fn list_products(page: u32, limit: u32) -> Result<(), CliError> {
    let ctx = context()?;
    let products = ctx.commerce.products(page, limit).await?;

    tracing::info!(
        "Page {page} of {} ({} products total)",
        products.total_pages,
        products.total_elements
    );
    for product in &products.content {
        tracing::info!(
            "  {}  {}  ${}  ({} in stock)",
            product.id,
            product.name,
            product.current_price(),
            product.stock
        );
    }
    Ok(())
}

/// Show one product by its URL slug.
pub async fn show_product(slug: &str) -> Result<(), CliError> {
    let ctx = context()?;
    let product = ctx.commerce.product_by_slug(slug).await?;

    tracing::info!("{} ({})", product.name, product.id);
    tracing::info!("  {}", product.description);
    if product.on_sale() {
        tracing::info!("  Price: ${} (was ${})", product.current_price(), product.price);
    } else {
        tracing::info!("  Price: ${}", product.price);
    }
    tracing::info!("  Stock: {}", product.stock);
    Ok(())
}

/// Search products by free text, optionally within a category.
pub async fn search_products(query: &str, category: Option<&str>) -> Result<(), CliError> {
    let ctx = context()?;
    let category = category.map(Into::into);
    let results = ctx
        .commerce
        .search_products(query, category.as_ref())
        .await?;

    tracing::info!("{} results for \"{query}\"", results.len());
    for product in &results {
        tracing::info!(
            "  {}  {}  ${}",
            product.id,
            product.name,
            product.current_price()
        );
    }
    Ok(())
}

/// List all categories.
pub async fn list_categories() -> Result<(), CliError> {
    let ctx = context()?;
    let categories = ctx.commerce.categories().await?;

    for category in &categories {
        tracing::info!("  {}  {}  ({})", category.id, category.name, category.slug);
    }
    Ok(())
}
