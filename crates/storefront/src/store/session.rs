//! The session store: token, cart, and ephemeral view filters.

use serde::{Deserialize, Serialize};
use simplemart_core::{ALL_CATEGORIES, Cart, CartLineItem, Price, Product, ProductId};
use thiserror::Error;
use tracing::{debug, warn};

use super::storage::{Storage, StorageError};

/// Storage key of the persisted `{token, cartItems}` blob.
pub const STORAGE_KEY: &str = "simplemart-storage";

/// Storage key mirroring the raw token string.
pub const TOKEN_KEY: &str = "token";

/// Version stamped into the persisted blob. Blobs with any other version are
/// ignored on hydration.
pub const STATE_VERSION: u32 = 0;

/// Errors returned by store mutations.
///
/// The in-memory state has already been updated when one of these is
/// returned; only the durable copy is behind.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage backend rejected a write.
    #[error("failed to persist session state: {0}")]
    Persist(#[from] StorageError),

    /// The state could not be serialized.
    #[error("failed to encode session state: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The part of the session that survives restarts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSlice {
    /// Auth token; `None` means signed out.
    #[serde(default)]
    pub token: Option<String>,
    /// Cart line items in insertion order.
    #[serde(default)]
    pub cart_items: Cart,
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    state: &'a PersistedSlice,
    version: u32,
}

#[derive(Deserialize)]
struct Envelope {
    state: PersistedSlice,
    #[serde(default)]
    version: u32,
}

/// Single source of truth for the auth token and cart.
///
/// Generic over its [`Storage`] backend. Each mutating method updates memory
/// first and then writes the persisted slice through to storage, so after a
/// successful call storage holds exactly what memory holds.
///
/// The selected category and search query live here too but are never
/// persisted.
#[derive(Debug)]
pub struct SessionStore<S: Storage> {
    storage: S,
    persisted: PersistedSlice,
    selected_category: String,
    search_query: String,
}

impl<S: Storage> SessionStore<S> {
    /// Build a store over `storage`, loading any previously persisted slice.
    ///
    /// Missing, unreadable, or corrupt state is not an error: the store
    /// starts signed out with an empty cart.
    pub fn hydrate(storage: S) -> Self {
        let persisted = read_slice(&storage);
        debug!(
            authenticated = persisted.token.is_some(),
            cart_lines = persisted.cart_items.len(),
            "Session hydrated"
        );
        Self {
            storage,
            persisted,
            selected_category: ALL_CATEGORIES.to_string(),
            search_query: String::new(),
        }
    }

    /// Reload the persisted slice from storage.
    ///
    /// Picks up writes made by another store over the same backend. The
    /// category and search filters are left alone.
    pub fn rehydrate(&mut self) {
        self.persisted = read_slice(&self.storage);
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Replace the token. No validation is performed.
    ///
    /// # Errors
    ///
    /// Returns an error if the new state could not be persisted.
    pub fn set_token(&mut self, token: Option<String>) -> Result<(), StoreError> {
        self.persisted.token = token;
        let saved = self.save();
        let mirrored = self.mirror_token();
        saved.and(mirrored)
    }

    /// Sign out: drop the token and empty the cart together.
    ///
    /// # Errors
    ///
    /// Returns an error if the cleared state could not be persisted.
    pub fn logout(&mut self) -> Result<(), StoreError> {
        self.persisted.token = None;
        self.persisted.cart_items.clear();
        let saved = self.save();
        let mirrored = self.mirror_token();
        saved.and(mirrored)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add one unit of `product` to the cart.
    ///
    /// A product already in the cart only has its quantity bumped; the
    /// snapshot taken on first add is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart could not be persisted.
    pub fn add_to_cart(&mut self, product: Product) -> Result<(), StoreError> {
        self.persisted.cart_items.add(product);
        self.save()
    }

    /// Set the quantity of `product_id`; zero removes the line.
    ///
    /// Unknown ids are ignored and nothing is written.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart could not be persisted.
    pub fn update_cart_quantity(
        &mut self,
        product_id: ProductId,
        new_quantity: u32,
    ) -> Result<(), StoreError> {
        if self
            .persisted
            .cart_items
            .set_quantity(product_id, new_quantity)
        {
            self.save()
        } else {
            debug!(%product_id, "Quantity update for product not in cart ignored");
            Ok(())
        }
    }

    /// Empty the cart, keeping the token.
    ///
    /// # Errors
    ///
    /// Returns an error if the empty cart could not be persisted.
    pub fn clear_cart(&mut self) -> Result<(), StoreError> {
        self.persisted.cart_items.clear();
        self.save()
    }

    // =========================================================================
    // Ephemeral filters
    // =========================================================================

    pub fn set_selected_category(&mut self, category: impl Into<String>) {
        self.selected_category = category.into();
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    // =========================================================================
    // Readers
    // =========================================================================

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.persisted.token.as_deref()
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.persisted.token.is_some()
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.persisted.cart_items
    }

    #[must_use]
    pub fn cart_items(&self) -> &[CartLineItem] {
        self.persisted.cart_items.items()
    }

    /// Sum of `price * quantity` over the cart.
    #[must_use]
    pub fn cart_total(&self) -> Price {
        self.persisted.cart_items.total()
    }

    /// Units in the cart, as shown on the navbar badge.
    #[must_use]
    pub fn cart_count(&self) -> u64 {
        self.persisted.cart_items.item_count()
    }

    #[must_use]
    pub fn selected_category(&self) -> &str {
        &self.selected_category
    }

    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// The slice that is mirrored to storage.
    #[must_use]
    pub const fn persisted(&self) -> &PersistedSlice {
        &self.persisted
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Write the persisted slice through to storage.
    fn save(&self) -> Result<(), StoreError> {
        let envelope = EnvelopeRef {
            state: &self.persisted,
            version: STATE_VERSION,
        };
        let result = serde_json::to_string(&envelope)
            .map_err(StoreError::from)
            .and_then(|blob| {
                self.storage
                    .set(STORAGE_KEY, &blob)
                    .map_err(StoreError::from)
            });

        if let Err(e) = &result {
            warn!(error = %e, "Session state not persisted");
        }
        result
    }

    /// Keep the raw token key in step with the in-memory token.
    fn mirror_token(&self) -> Result<(), StoreError> {
        let result = match &self.persisted.token {
            Some(token) => self.storage.set(TOKEN_KEY, token),
            None => self.storage.remove(TOKEN_KEY),
        };
        if let Err(e) = &result {
            warn!(error = %e, "Token mirror not persisted");
        }
        result.map_err(StoreError::from)
    }
}

/// Load the persisted slice, defaulting on any problem.
fn read_slice<S: Storage>(storage: &S) -> PersistedSlice {
    let raw = match storage.get(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return PersistedSlice::default(),
        Err(e) => {
            warn!(error = %e, "Persisted session unreadable, starting empty");
            return PersistedSlice::default();
        }
    };

    match serde_json::from_str::<Envelope>(&raw) {
        Ok(envelope) if envelope.version == STATE_VERSION => envelope.state,
        Ok(envelope) => {
            warn!(
                found = envelope.version,
                expected = STATE_VERSION,
                "Persisted session has unsupported version, starting empty"
            );
            PersistedSlice::default()
        }
        Err(e) => {
            warn!(error = %e, "Persisted session is corrupt, starting empty");
            PersistedSlice::default()
        }
    }
}
