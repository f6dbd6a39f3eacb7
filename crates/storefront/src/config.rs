//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `SIMPLEMART_CATALOG_URL` - Catalog and auth API base URL (default: <https://fakestoreapi.com>)
//! - `SIMPLEMART_PAYMENT_URL` - Payment API base URL (default: <https://api.xendit.co>)
//! - `SIMPLEMART_PAYMENT_SECRET_KEY` - Payment API secret key; checkout fails without it
//! - `SIMPLEMART_APP_ORIGIN` - Origin used to build payment redirect URLs (default: <http://localhost:5173>)
//! - `SIMPLEMART_STATE_DIR` - Directory for persisted session state (default: `.simplemart`)
//! - `SIMPLEMART_PAGE_SIZE` - Products per feed page (default: 8)
//! - `SIMPLEMART_FETCH_DELAY_MS` - Artificial latency added to paged fetches (default: 0)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_CATALOG_URL: &str = "https://fakestoreapi.com";
const DEFAULT_PAYMENT_URL: &str = "https://api.xendit.co";
const DEFAULT_APP_ORIGIN: &str = "http://localhost:5173";
const DEFAULT_STATE_DIR: &str = ".simplemart";
const DEFAULT_PAGE_SIZE: usize = 8;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// External API endpoints
    pub api: ApiConfig,
    /// Origin the payment page redirects back to
    pub app_origin: Url,
    /// Directory holding persisted session state
    pub state_dir: PathBuf,
    /// Products per feed page
    pub page_size: usize,
    /// Artificial latency added to paged product fetches
    pub fetch_delay: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// External REST API configuration.
///
/// Implements `Debug` manually to redact the payment key.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL for `/products` and `/auth/login`
    pub catalog_url: Url,
    /// Base URL for `/v2/invoices`
    pub payment_url: Url,
    /// Payment API secret key (server-side only; absent disables checkout)
    pub payment_secret_key: Option<SecretString>,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("catalog_url", &self.catalog_url.as_str())
            .field("payment_url", &self.payment_url.as_str())
            .field(
                "payment_secret_key",
                &self.payment_secret_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is malformed or the payment key
    /// fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(&lookup);

        let catalog_url = env.url_or_default("SIMPLEMART_CATALOG_URL", DEFAULT_CATALOG_URL)?;
        let payment_url = env.url_or_default("SIMPLEMART_PAYMENT_URL", DEFAULT_PAYMENT_URL)?;
        let payment_secret_key = env.validated_secret("SIMPLEMART_PAYMENT_SECRET_KEY")?;
        let app_origin = env.url_or_default("SIMPLEMART_APP_ORIGIN", DEFAULT_APP_ORIGIN)?;

        let state_dir = PathBuf::from(env.or_default("SIMPLEMART_STATE_DIR", DEFAULT_STATE_DIR));

        let page_size = env.parsed_or("SIMPLEMART_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        if page_size == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "SIMPLEMART_PAGE_SIZE".to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        let fetch_delay = Duration::from_millis(env.parsed_or("SIMPLEMART_FETCH_DELAY_MS", 0)?);

        Ok(Self {
            api: ApiConfig {
                catalog_url,
                payment_url,
                payment_secret_key,
            },
            app_origin,
            state_dir,
            page_size,
            fetch_delay,
            sentry_dsn: env.optional("SENTRY_DSN"),
        })
    }

    /// URL the payment page redirects to for `route` (e.g. `/payment-success`).
    #[must_use]
    pub fn redirect_url(&self, route: &str) -> String {
        format!("{}{route}", self.app_origin.as_str().trim_end_matches('/'))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Typed access to a key lookup.
struct Env<'a, F: Fn(&str) -> Option<String>>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    /// Get an optional variable, treating empty values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parsed_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }

    /// Parse an absolute http(s) URL.
    fn url_or_default(&self, key: &str, default: &str) -> Result<Url, ConfigError> {
        let raw = self.or_default(key, default);
        let url = Url::parse(raw.trim())
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        Ok(url)
    }

    /// Load and validate an optional secret.
    fn validated_secret(&self, key: &str) -> Result<Option<SecretString>, ConfigError> {
        self.optional(key)
            .map(|value| {
                validate_secret_strength(&value, key)?;
                Ok(SecretString::from(value))
            })
            .transpose()
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Real API keys are random; low entropy means someone typed it
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the key issued by the payment provider."
            ),
        ));
    }

    Ok(())
}
