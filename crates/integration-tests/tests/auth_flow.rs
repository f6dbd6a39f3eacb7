//! Login and logout against a fake auth endpoint.

use secrecy::SecretString;
use simplemart_integration_tests::{
    FakeCatalog, ISSUED_TOKEN, VALID_PASSWORD, VALID_USERNAME, config_with,
};
use simplemart_storefront::error::AppError;
use simplemart_storefront::services::auth::{self, AuthError};
use simplemart_storefront::state::AppState;
use simplemart_storefront::store::{MemoryStorage, SessionStore, Storage, TOKEN_KEY};

async fn state() -> AppState {
    let catalog_url = FakeCatalog::new().spawn().await;
    let config = config_with(&[("SIMPLEMART_CATALOG_URL", catalog_url.to_string())])
        .expect("valid config");
    AppState::new(config).expect("state builds")
}

#[tokio::test]
async fn test_sign_in_stores_and_mirrors_token() {
    let state = state().await;
    let storage = MemoryStorage::new();
    let mut store = SessionStore::hydrate(storage.clone());

    auth::sign_in(
        &mut store,
        state.auth(),
        VALID_USERNAME,
        &SecretString::from(VALID_PASSWORD),
    )
    .await
    .expect("login succeeds");

    assert_eq!(store.token(), Some(ISSUED_TOKEN));
    assert_eq!(
        storage.get(TOKEN_KEY).expect("readable").as_deref(),
        Some(ISSUED_TOKEN)
    );

    // A second tab over the same storage sees the session
    let other_tab = SessionStore::hydrate(storage);
    assert!(other_tab.is_authenticated());
}

#[tokio::test]
async fn test_rejected_login_surfaces_text_message_and_clears_token() {
    let state = state().await;
    let storage = MemoryStorage::new();
    let mut store = SessionStore::hydrate(storage.clone());
    store.set_token(Some("stale".to_string())).expect("persisted");

    let err = auth::sign_in(
        &mut store,
        state.auth(),
        VALID_USERNAME,
        &SecretString::from("wrong"),
    )
    .await
    .expect_err("login is refused");

    assert!(matches!(err, AppError::Auth(AuthError::Rejected(_))));
    assert_eq!(err.user_message(), "username or password is incorrect");
    assert_eq!(store.token(), None);
    assert_eq!(storage.get(TOKEN_KEY).expect("readable"), None);
}

#[tokio::test]
async fn test_rejected_login_surfaces_json_message() {
    let state = state().await;
    let mut store = SessionStore::hydrate(MemoryStorage::new());

    let err = auth::sign_in(
        &mut store,
        state.auth(),
        "json-error",
        &SecretString::from("whatever"),
    )
    .await
    .expect_err("login is refused");

    assert_eq!(err.user_message(), "Account locked");
}

#[tokio::test]
async fn test_sign_out_clears_session() {
    let state = state().await;
    let storage = MemoryStorage::new();
    let mut store = SessionStore::hydrate(storage.clone());

    auth::sign_in(
        &mut store,
        state.auth(),
        VALID_USERNAME,
        &SecretString::from(VALID_PASSWORD),
    )
    .await
    .expect("login succeeds");

    auth::sign_out(&mut store).expect("logout persists");

    assert!(!store.is_authenticated());
    assert_eq!(storage.get(TOKEN_KEY).expect("readable"), None);
    assert!(!SessionStore::hydrate(storage).is_authenticated());
}

#[tokio::test]
async fn test_unreachable_auth_server() {
    // Nothing listens on port 9 locally
    let config = config_with(&[("SIMPLEMART_CATALOG_URL", "http://127.0.0.1:9".to_string())])
        .expect("valid config");
    let state = AppState::new(config).expect("state builds");
    let mut store = SessionStore::hydrate(MemoryStorage::new());

    let err = auth::sign_in(&mut store, state.auth(), "u", &SecretString::from("p"))
        .await
        .expect_err("connection refused");

    assert!(matches!(err, AppError::Auth(AuthError::Http(_))));
    assert_eq!(err.user_message(), "Login failed");
    assert!(!store.is_authenticated());
}
