//! Command implementations.

pub mod cart;
pub mod checkout;
pub mod products;
pub mod profile;
pub mod session;

use simplemart_storefront::error::AppError;
use simplemart_storefront::store::{SessionStore, Storage};

/// Shown when a command needs a signed-in session.
pub const LOGIN_REQUIRED: &str = "Login Required: please login to continue shopping";

/// Refuse to continue without a token.
///
/// # Errors
///
/// Returns [`AppError::BadRequest`] when signed out.
pub fn require_login<S: Storage>(store: &SessionStore<S>) -> Result<(), AppError> {
    if store.is_authenticated() {
        Ok(())
    } else {
        Err(AppError::BadRequest(LOGIN_REQUIRED.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use simplemart_storefront::store::MemoryStorage;

    use super::*;

    #[test]
    fn test_require_login() {
        let mut store = SessionStore::hydrate(MemoryStorage::new());
        let err = require_login(&store).unwrap_err();
        assert_eq!(err.user_message(), LOGIN_REQUIRED);

        store.set_token(Some("t".to_string())).unwrap();
        assert!(require_login(&store).is_ok());
    }
}
