//! Authentication error types.

use thiserror::Error;

/// Message shown when the auth endpoint gives no reason of its own.
pub const DEFAULT_LOGIN_FAILURE: &str = "Login failed";

/// Errors that can occur during login.
#[derive(Debug, Error)]
pub enum AuthError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The auth endpoint refused the credentials; carries its message.
    #[error("{0}")]
    Rejected(String),

    /// A success response without a token in it.
    #[error("login response did not contain a token")]
    MissingToken,

    /// Endpoint URL could not be built.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl AuthError {
    /// Text to show next to the login form.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Rejected(message) => message,
            _ => DEFAULT_LOGIN_FAILURE,
        }
    }
}
