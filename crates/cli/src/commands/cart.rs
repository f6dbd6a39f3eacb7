//! Cart commands.

use std::fmt::Write as _;

use simplemart_core::{Cart, ProductId};
use simplemart_storefront::error::{AppError, add_breadcrumb};
use simplemart_storefront::state::AppState;
use simplemart_storefront::store::{SessionStore, Storage};

pub fn show<S: Storage>(store: &SessionStore<S>) {
    print!("{}", render(store.cart()));
}

/// Fetch product `id` and add one unit of it.
///
/// # Errors
///
/// Returns an error if the product could not be fetched or the cart could
/// not be saved.
pub async fn add<S: Storage>(
    state: &AppState,
    store: &mut SessionStore<S>,
    id: ProductId,
) -> Result<(), AppError> {
    let product = state.catalog().product(id).await?;
    let title = product.title.clone();

    store.add_to_cart(product)?;
    let product_id = id.to_string();
    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", product_id.as_str())]));

    let quantity = store.cart().get(id).map_or(0, |line| line.quantity);
    println!("Added {title} (quantity {quantity})");
    Ok(())
}

/// Set the quantity of an existing line; 0 removes it.
///
/// # Errors
///
/// Returns [`AppError::BadRequest`] if the product is not in the cart, or an
/// error if the cart could not be saved.
pub fn set<S: Storage>(
    store: &mut SessionStore<S>,
    id: ProductId,
    quantity: u32,
) -> Result<(), AppError> {
    if store.cart().get(id).is_none() {
        return Err(AppError::BadRequest(format!("Product {id} is not in your cart")));
    }

    store.update_cart_quantity(id, quantity)?;
    if quantity == 0 {
        println!("Removed product {id} from your cart");
    } else {
        println!("Quantity of product {id} set to {quantity}");
    }
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the cart could not be saved.
pub fn clear<S: Storage>(store: &mut SessionStore<S>) -> Result<(), AppError> {
    store.clear_cart()?;
    println!("Cart cleared");
    Ok(())
}

fn render(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Your cart is empty\n".to_string();
    }

    let mut out = String::new();
    for line in cart.items() {
        let _ = writeln!(
            out,
            "{:>8}  {:>4} x {:>9}  {}",
            line.id().to_string(),
            line.quantity,
            line.product.price.to_string(),
            line.product.title
        );
    }
    let _ = writeln!(out, "Total: {} ({} item(s))", cart.total(), cart.item_count());
    out
}
