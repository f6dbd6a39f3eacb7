//! Login, logout, and session status.

use secrecy::SecretString;
use simplemart_storefront::error::AppError;
use simplemart_storefront::services::auth;
use simplemart_storefront::state::AppState;
use simplemart_storefront::store::{SessionStore, Storage};

/// Sign in as `username`.
///
/// # Errors
///
/// Returns an error if no password was given, the login was refused, or the
/// token could not be saved.
pub async fn login<S: Storage>(
    state: &AppState,
    store: &mut SessionStore<S>,
    username: &str,
    password: Option<String>,
) -> Result<(), AppError> {
    let password = password
        .filter(|p| !p.is_empty())
        .map(SecretString::from)
        .ok_or_else(|| AppError::BadRequest("A password is required".to_string()))?;

    auth::sign_in(store, state.auth(), username, &password).await?;
    println!("Signed in as {username}");
    Ok(())
}

/// Sign out and empty the cart.
///
/// # Errors
///
/// Returns an error if the cleared session could not be saved.
pub fn logout<S: Storage>(store: &mut SessionStore<S>) -> Result<(), AppError> {
    auth::sign_out(store)?;
    println!("Signed out");
    Ok(())
}

pub fn whoami<S: Storage>(store: &SessionStore<S>) {
    println!("{}", status_line(store));
}

fn status_line<S: Storage>(store: &SessionStore<S>) -> String {
    if store.is_authenticated() {
        format!(
            "Signed in. Cart: {} item(s), {}",
            store.cart_count(),
            store.cart_total()
        )
    } else {
        "Not signed in".to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use simplemart_core::{Price, Product, ProductId};
    use simplemart_storefront::store::MemoryStorage;

    use super::*;

    #[test]
    fn test_status_line() {
        let mut store = SessionStore::hydrate(MemoryStorage::new());
        assert_eq!(status_line(&store), "Not signed in");

        store.set_token(Some("t".to_string())).unwrap();
        store
            .add_to_cart(Product::new(ProductId::new(1), "Bag", Price::from_cents(1999)))
            .unwrap();
        store
            .add_to_cart(Product::new(ProductId::new(1), "Bag", Price::from_cents(1999)))
            .unwrap();
        assert_eq!(status_line(&store), "Signed in. Cart: 2 item(s), $39.98");
    }

    #[test]
    fn test_logout_clears_session() {
        let mut store = SessionStore::hydrate(MemoryStorage::new());
        store.set_token(Some("t".to_string())).unwrap();
        logout(&mut store).unwrap();
        assert!(!store.is_authenticated());
    }
}
