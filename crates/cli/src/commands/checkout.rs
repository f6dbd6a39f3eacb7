//! Checkout commands.

use std::str::FromStr;

use simplemart_core::PaymentOutcome;
use simplemart_storefront::error::AppError;
use simplemart_storefront::services::checkout::{complete_checkout, start_checkout};
use simplemart_storefront::state::AppState;
use simplemart_storefront::store::{SessionStore, Storage};

/// Create an invoice for the cart and print its payment page.
///
/// # Errors
///
/// Returns [`AppError::Checkout`] if the invoice could not be created.
pub async fn start<S: Storage>(
    state: &AppState,
    store: &SessionStore<S>,
    email: &str,
) -> Result<(), AppError> {
    let invoice = start_checkout(state, store, email).await?;
    println!("Complete your payment at:");
    println!("{}", invoice.invoice_url);
    Ok(())
}

/// Apply the route the payment page redirected back to.
///
/// # Errors
///
/// Returns [`AppError::BadRequest`] for an unknown route, or an error if the
/// emptied cart could not be saved.
pub fn complete<S: Storage>(store: &mut SessionStore<S>, route: &str) -> Result<(), AppError> {
    let outcome =
        PaymentOutcome::from_str(route).map_err(|e| AppError::BadRequest(e.to_string()))?;

    complete_checkout(store, outcome)?;
    println!("{}", outcome_message(outcome));
    Ok(())
}

const fn outcome_message(outcome: PaymentOutcome) -> &'static str {
    match outcome {
        PaymentOutcome::Succeeded => {
            "Thank you for your purchase! Your order has been processed successfully."
        }
        PaymentOutcome::Failed => "Payment failed. Your cart has been kept; please try again.",
    }
}
