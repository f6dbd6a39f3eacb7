//! Application state shared across commands.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::services::auth::AuthClient;
use crate::services::catalog::CatalogClient;
use crate::services::payment::PaymentClient;

/// Application state shared across all commands.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the API clients built from it.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    auth: AuthClient,
    payment: Option<PaymentClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The payment client is only built when a payment secret key is
    /// configured.
    ///
    /// # Errors
    ///
    /// Returns an error if one of the HTTP clients cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, AppError> {
        let catalog = CatalogClient::new(&config.api.catalog_url, config.fetch_delay)?;
        let auth = AuthClient::new(&config.api.catalog_url)?;
        let payment = config
            .api
            .payment_secret_key
            .as_ref()
            .map(|key| PaymentClient::new(&config.api.payment_url, key))
            .transpose()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                auth,
                payment,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog API client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the auth API client.
    #[must_use]
    pub fn auth(&self) -> &AuthClient {
        &self.inner.auth
    }

    /// The payment client, if a secret key is configured.
    #[must_use]
    pub fn payment(&self) -> Option<&PaymentClient> {
        self.inner.payment.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_client_requires_key() {
        let state = AppState::new(StorefrontConfig::from_lookup(|_| None).unwrap()).unwrap();
        assert!(state.payment().is_none());

        let config = StorefrontConfig::from_lookup(|key| {
            (key == "SIMPLEMART_PAYMENT_SECRET_KEY")
                .then(|| "xnd_development_P4qDfOss0OCpl8RtKrROHjaQYNCk9dN5".to_string())
        })
        .unwrap();
        let state = AppState::new(config).unwrap();
        assert!(state.payment().is_some());
        assert_eq!(state.config().page_size, 8);
    }
}
