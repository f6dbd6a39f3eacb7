//! Client-side session state: authentication token and cart.
//!
//! # Architecture
//!
//! - [`SessionStore`] is the single source of truth for the token and the
//!   cart line items. Views read it; only its methods mutate it.
//! - Every mutation is written through to a [`Storage`] backend before the
//!   method returns. There is no batching and no background flush.
//! - The store is an ordinary value constructed over an injected backend,
//!   so tests run it against [`MemoryStorage`] and the CLI against
//!   [`FileStorage`].
//!
//! # Example
//!
//! ```rust
//! use simplemart_core::{Price, Product, ProductId};
//! use simplemart_storefront::store::{MemoryStorage, SessionStore};
//!
//! let mut store = SessionStore::hydrate(MemoryStorage::new());
//! let product = Product::new(ProductId::new(1), "Backpack", Price::from_cents(1000));
//!
//! store.add_to_cart(product.clone()).unwrap();
//! store.add_to_cart(product).unwrap();
//! store.update_cart_quantity(ProductId::new(1), 5).unwrap();
//!
//! assert_eq!(store.cart_total(), Price::from_cents(5000));
//! ```

mod session;
mod storage;

pub use session::{PersistedSlice, STATE_VERSION, STORAGE_KEY, SessionStore, StoreError, TOKEN_KEY};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
