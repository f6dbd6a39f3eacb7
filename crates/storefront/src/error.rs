//! Unified error handling with Sentry integration.
//!
//! Every user action returns `Result<T, AppError>`. Callers show
//! [`AppError::user_message`] to the user and hand the error to
//! [`AppError::report`], which captures failures worth investigating to
//! Sentry before logging them.

use thiserror::Error;

use crate::config::ConfigError;
use crate::services::auth::AuthError;
use crate::services::catalog::CatalogError;
use crate::services::checkout::{CHECKOUT_FAILED, CheckoutError};
use crate::services::payment::PaymentError;
use crate::store::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Session state could not be persisted.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Catalog API operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Profile could not be loaded.
    #[error("Profile error: {0}")]
    Profile(CatalogError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Payment API operation failed outside of a checkout.
    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    /// Checkout could not be started.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Configuration is invalid.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Bad input from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Text to show the user. Internal details are never exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth(err) => err.user_message().to_string(),
            Self::Checkout(_) | Self::Payment(_) => CHECKOUT_FAILED.to_string(),
            Self::Catalog(CatalogError::NotFound(_)) => "Product not found".to_string(),
            Self::Catalog(_) => "Failed to fetch products".to_string(),
            Self::Profile(CatalogError::UserNotFound(_)) => "Profile not found".to_string(),
            Self::Profile(_) => "Failed to fetch profile".to_string(),
            Self::Store(_) => "Could not save your session".to_string(),
            Self::Config(err) => format!("Configuration error: {err}"),
            Self::BadRequest(msg) => msg.clone(),
        }
    }

    /// Whether this error should be captured to Sentry.
    ///
    /// Rejected logins, bad input, and checkout preconditions are expected
    /// outcomes of user actions and are not captured.
    #[must_use]
    pub fn is_reportable(&self) -> bool {
        match self {
            Self::Auth(err) => !matches!(err, AuthError::Rejected(_)),
            Self::Checkout(err) => matches!(err, CheckoutError::Payment(_)),
            Self::Catalog(err) => !matches!(err, CatalogError::NotFound(_)),
            Self::Profile(err) => !matches!(err, CatalogError::UserNotFound(_)),
            Self::BadRequest(_) => false,
            Self::Store(_) | Self::Payment(_) | Self::Config(_) => true,
        }
    }

    /// Capture to Sentry (when reportable) and log.
    pub fn report(&self) {
        if self.is_reportable() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Action failed"
            );
        } else {
            tracing::info!(error = %self, "Action rejected");
        }
    }
}

/// Set the Sentry user context.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            username: Some(username.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "3")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
