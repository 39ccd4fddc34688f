//! Cart reconciliation commands.
//!
//! Each command plays one cart screen visit: build a service, initialize it
//! from the local store, apply the operation, and report whether the change
//! reached disk.

use tracing::warn;

use bazari_core::ProductId;
use bazari_storefront::cart::{MutationOutcome, Persistence, VisitToken};
use bazari_storefront::error::Result;
use bazari_storefront::state::AppState;

/// Show the cart with live prices and the running total.
///
/// On a first run with an empty local store the cart is seeded from the
/// configured remote cart record, mirroring the app's first-launch behavior.
///
/// # Errors
///
/// Never fails on catalog trouble - missing prices render as $0.00.
pub async fn show(state: &AppState) -> Result<()> {
    let mut service = state.cart_service();
    service.initialize().await;

    if service.cart().is_empty() {
        if let Err(err) = service
            .seed_from_catalog(state.config().default_cart_id)
            .await
        {
            warn!(error = %err, "could not seed cart from the catalog");
        }
    }

    if service.cart().is_empty() {
        println!("Your cart is empty");
        return Ok(());
    }

    let visit = VisitToken::new();
    service.refresh_prices(&visit).await;

    for item in &service.cart().items {
        let price = service.prices().price_or_zero(item.product_id);
        println!(
            "{:>4}  {} x {:>2}  = ${:.2}",
            item.product_id,
            price,
            item.quantity,
            price.extend(item.quantity)
        );
    }
    println!("total: ${:.2} ({} items)", service.total(), state.cart_count().read());
    Ok(())
}

/// Add one unit of a product to the cart.
///
/// # Errors
///
/// Returns an error only if the local store cannot be read at startup.
pub async fn add(state: &AppState, id: i64) -> Result<()> {
    let mut service = state.cart_service();
    service.initialize().await;

    let outcome = service.add_item(ProductId::new(id)).await;
    report(&outcome, state);
    Ok(())
}

/// Set the quantity of a line item.
///
/// # Errors
///
/// Returns an error only if the local store cannot be read at startup.
pub async fn set(state: &AppState, id: i64, quantity: i64) -> Result<()> {
    let mut service = state.cart_service();
    service.initialize().await;

    let outcome = service.set_quantity(ProductId::new(id), quantity).await;
    report(&outcome, state);
    Ok(())
}

/// Remove a line item from the cart.
///
/// # Errors
///
/// Returns an error only if the local store cannot be read at startup.
pub async fn remove(state: &AppState, id: i64) -> Result<()> {
    let mut service = state.cart_service();
    service.initialize().await;

    let outcome = service.remove_item(ProductId::new(id)).await;
    report(&outcome, state);
    Ok(())
}

/// Tell the user what happened to their mutation.
fn report(outcome: &MutationOutcome, state: &AppState) {
    match outcome {
        MutationOutcome::Unchanged => println!("No change"),
        MutationOutcome::Applied(Persistence::Durable) => {
            println!("Saved ({} items in cart)", state.cart_count().read());
        }
        MutationOutcome::Applied(Persistence::MemoryOnly(err)) => {
            println!(
                "Updated in memory, but saving failed: {err}. The change is kept for this run; retry to persist it."
            );
        }
    }
}
