//! Read-only catalog browsing commands.

use bazari_core::ProductId;
use bazari_storefront::catalog::Catalog;
use bazari_storefront::error::Result;
use bazari_storefront::state::AppState;

/// List all catalog products.
///
/// # Errors
///
/// Returns an error if the catalog request fails.
pub async fn list(state: &AppState) -> Result<()> {
    let products = state.catalog().products().await?;

    for product in &products {
        println!("{:>4}  {:>9}  {}", product.id, product.price.to_string(), product.title);
    }
    println!("{} products", products.len());
    Ok(())
}

/// Show a single product.
///
/// # Errors
///
/// Returns an error if the product does not exist or the request fails.
pub async fn show(state: &AppState, id: i64) -> Result<()> {
    let product = state.catalog().product(ProductId::new(id)).await?;

    println!("{}", product.title);
    println!("  category: {}", product.category);
    println!("  price:    {}", product.price);
    println!(
        "  rating:   {} ({} reviews)",
        product.rating.rate, product.rating.count
    );
    println!();
    println!("{}", product.description);
    Ok(())
}
