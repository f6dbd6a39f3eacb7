//! Authentication service.
//!
//! Username/password login against the catalog host's `POST /auth/login`,
//! plus the sign-in and sign-out flows that move the resulting token into the
//! [`SessionStore`].

mod error;

pub use error::{AuthError, DEFAULT_LOGIN_FAILURE};

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use url::Url;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::services::catalog::with_trailing_slash;
use crate::store::{SessionStore, Storage};

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Client for the login endpoint.
#[derive(Clone)]
pub struct AuthClient {
    client: reqwest::Client,
    login_url: Url,
}

impl AuthClient {
    /// Create a new auth client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build or the login URL
    /// cannot be derived from `base_url`.
    pub fn new(base_url: &Url) -> Result<Self, AuthError> {
        let login_url = with_trailing_slash(base_url).join("auth/login")?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { client, login_url })
    }

    /// Exchange credentials for a token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Rejected`] with the server's message when the
    /// credentials are refused, or an error if the request fails.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<String, AuthError> {
        let body = LoginRequest {
            username,
            password: password.expose_secret(),
        };

        let response = self
            .client
            .post(self.login_url.clone())
            .json(&body)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, "Login rejected");
            return Err(AuthError::Rejected(rejection_message(&text)));
        }

        let parsed: LoginResponse = response.json().await?;
        parsed
            .token
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingToken)
    }
}

/// Pull a human-readable reason out of an error body.
///
/// JSON bodies contribute their `message` field; plain-text bodies are used
/// as they are.
fn rejection_message(body: &str) -> String {
    let body = body.trim();
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOGIN_FAILURE.to_string());
    }
    if body.is_empty() || body.starts_with('{') || body.starts_with('<') {
        return DEFAULT_LOGIN_FAILURE.to_string();
    }
    body.chars().take(200).collect()
}

// =============================================================================
// Flows
// =============================================================================

/// Log in and store the token.
///
/// On failure the stored token is cleared, so a rejected login never leaves
/// a previous session behind.
///
/// # Errors
///
/// Returns [`AppError::Auth`] if the login was refused or failed, or
/// [`AppError::Store`] if the token could not be persisted.
pub async fn sign_in<S: Storage>(
    store: &mut SessionStore<S>,
    client: &AuthClient,
    username: &str,
    password: &SecretString,
) -> Result<(), AppError> {
    match client.login(username, password).await {
        Ok(token) => {
            store.set_token(Some(token))?;
            set_sentry_user(username);
            info!(username, "Signed in");
            Ok(())
        }
        Err(err) => {
            if let Err(store_err) = store.set_token(None) {
                warn!(error = %store_err, "Failed to clear token after rejected login");
            }
            Err(err.into())
        }
    }
}

/// Drop the token and the cart.
///
/// # Errors
///
/// Returns [`AppError::Store`] if the cleared state could not be persisted.
pub fn sign_out<S: Storage>(store: &mut SessionStore<S>) -> Result<(), AppError> {
    store.logout()?;
    clear_sentry_user();
    info!("Signed out");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_message_from_json() {
        assert_eq!(
            rejection_message(r#"{"message":"Invalid credentials"}"#),
            "Invalid credentials"
        );
        assert_eq!(rejection_message(r#"{"status":"error"}"#), "Login failed");
        assert_eq!(rejection_message(r#"{"message":"  "}"#), "Login failed");
    }

    #[test]
    fn test_rejection_message_from_text() {
        assert_eq!(
            rejection_message("username or password is incorrect\n"),
            "username or password is incorrect"
        );
        assert_eq!(rejection_message(""), "Login failed");
        assert_eq!(rejection_message("<html>502</html>"), "Login failed");
    }

    #[test]
    fn test_login_url() {
        let base = Url::parse("https://fakestoreapi.com").unwrap();
        let client = AuthClient::new(&base).unwrap();
        assert_eq!(client.login_url.as_str(), "https://fakestoreapi.com/auth/login");
    }
}
