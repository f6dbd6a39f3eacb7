//! Checkout flow: cart to hosted invoice, and back.
//!
//! [`start_checkout`] turns the cart into an invoice on the payment gateway
//! and returns it; the caller sends the buyer to its `invoice_url`. The
//! gateway later redirects to one of the payment routes, which
//! [`complete_checkout`] consumes. Only a successful payment clears the cart.

use chrono::{DateTime, Utc};
use simplemart_core::{
    Cart, Email, EmailError, PAYMENT_FAILED_ROUTE, PAYMENT_SUCCESS_ROUTE, PaymentOutcome,
};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::config::StorefrontConfig;
use crate::services::payment::{Invoice, InvoiceRequest, PaymentError};
use crate::state::AppState;
use crate::store::{SessionStore, Storage, StoreError};

/// Description attached to every invoice.
pub const INVOICE_DESCRIPTION: &str = "SimpleMART Order";

/// Message shown for any checkout failure.
pub const CHECKOUT_FAILED: &str = "Checkout Failed";

/// Errors that can stop a checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to pay for.
    #[error("cart is empty")]
    EmptyCart,

    /// Payer email did not validate.
    #[error("invalid payer email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// No payment secret key is configured.
    #[error("payment secret key is not configured")]
    MissingPaymentKey,

    /// The gateway refused or failed the invoice.
    #[error("payment gateway error: {0}")]
    Payment(#[from] PaymentError),
}

/// Build the invoice for `cart` at time `now`.
#[must_use]
pub fn build_invoice_request(
    cart: &Cart,
    payer_email: Email,
    config: &StorefrontConfig,
    now: DateTime<Utc>,
) -> InvoiceRequest {
    InvoiceRequest {
        external_id: format!("order-{}", now.timestamp_millis()),
        amount: cart.total(),
        payer_email,
        description: INVOICE_DESCRIPTION.to_string(),
        success_redirect_url: config.redirect_url(PAYMENT_SUCCESS_ROUTE),
        failure_redirect_url: config.redirect_url(PAYMENT_FAILED_ROUTE),
    }
}

/// Create an invoice for the current cart.
///
/// The cart is left untouched; it is cleared once the gateway reports
/// success through [`complete_checkout`].
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`], [`CheckoutError::InvalidEmail`],
/// or [`CheckoutError::MissingPaymentKey`] before any request is made, or
/// [`CheckoutError::Payment`] if the gateway call fails.
#[instrument(skip(state, store, email), fields(items = store.cart_count()))]
pub async fn start_checkout<S: Storage>(
    state: &AppState,
    store: &SessionStore<S>,
    email: &str,
) -> Result<Invoice, CheckoutError> {
    if store.cart().is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    let payer_email = Email::parse(email)?;
    let client = state.payment().ok_or(CheckoutError::MissingPaymentKey)?;

    let request = build_invoice_request(store.cart(), payer_email, state.config(), Utc::now());
    let invoice = client.create_invoice(&request).await?;

    info!(external_id = %request.external_id, amount = %request.amount, "Checkout started");
    Ok(invoice)
}

/// Apply the outcome the gateway redirected back with.
///
/// # Errors
///
/// Returns [`StoreError`] if the emptied cart could not be persisted.
pub fn complete_checkout<S: Storage>(
    store: &mut SessionStore<S>,
    outcome: PaymentOutcome,
) -> Result<(), StoreError> {
    match outcome {
        PaymentOutcome::Succeeded => {
            info!("Payment succeeded; clearing cart");
            store.clear_cart()
        }
        PaymentOutcome::Failed => {
            warn!(items = store.cart_count(), "Payment failed; cart kept");
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use simplemart_core::{Price, Product, ProductId};

    use super::*;
    use crate::store::MemoryStorage;

    fn config() -> StorefrontConfig {
        StorefrontConfig::from_lookup(|key| match key {
            "SIMPLEMART_APP_ORIGIN" => Some("https://shop.example/".to_string()),
            _ => None,
        })
        .unwrap()
    }

    fn product(id: i64, cents: i64) -> Product {
        Product::new(ProductId::new(id), format!("Product {id}"), Price::from_cents(cents))
    }

    #[test]
    fn test_build_invoice_request() {
        let mut cart = Cart::new();
        cart.add(product(1, 1000));
        cart.add(product(1, 1000));
        cart.add(product(2, 550));

        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let email = Email::parse("buyer@example.com").unwrap();
        let request = build_invoice_request(&cart, email, &config(), now);

        assert_eq!(request.external_id, "order-1700000000123");
        assert_eq!(request.amount, Price::from_cents(2550));
        assert_eq!(request.description, "SimpleMART Order");
        assert_eq!(request.success_redirect_url, "https://shop.example/payment-success");
        assert_eq!(request.failure_redirect_url, "https://shop.example/payment-failed");
    }

    #[tokio::test]
    async fn test_start_checkout_validation_order() {
        let state = AppState::new(config()).unwrap();
        let mut store = SessionStore::hydrate(MemoryStorage::new());

        let err = start_checkout(&state, &store, "not-an-email").await.unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));

        store.add_to_cart(product(1, 1000)).unwrap();
        let err = start_checkout(&state, &store, "not-an-email").await.unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidEmail(_)));

        let err = start_checkout(&state, &store, "buyer@example.com").await.unwrap_err();
        assert!(matches!(err, CheckoutError::MissingPaymentKey));
        assert_eq!(store.cart_count(), 1);
    }

    #[test]
    fn test_complete_checkout() {
        let mut store = SessionStore::hydrate(MemoryStorage::new());
        store.add_to_cart(product(1, 1000)).unwrap();

        complete_checkout(&mut store, PaymentOutcome::Failed).unwrap();
        assert_eq!(store.cart_count(), 1);

        complete_checkout(&mut store, PaymentOutcome::Succeeded).unwrap();
        assert!(store.cart().is_empty());
        assert!(store.persisted().cart_items.is_empty());
    }
}
