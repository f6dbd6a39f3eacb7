//! Product catalog API client.
//!
//! Read-only access to `GET /products`, `GET /products/{id}`,
//! `GET /products/categories` and `GET /users/{id}`. Every response is
//! cached using `moka` (5-minute TTL). Paging is done client-side, see
//! [`pagination`].

mod cache;
pub mod pagination;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::de::DeserializeOwned;
use simplemart_core::{Product, ProductId, UserProfile};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use cache::{CacheKey, CacheValue};
pub use pagination::{PageRequest, ProductPage, REPLAY_FACTOR, filter_products, paginate};

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Product does not exist.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// User does not exist.
    #[error("User not found: {0}")]
    UserNotFound(i64),

    /// Response body was not what we expected.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Client for the product catalog API.
///
/// Cheap to clone; clones share the HTTP connection pool and the cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    fetch_delay: Duration,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// `fetch_delay` is slept before every [`CatalogClient::fetch_page`]
    /// call to imitate a slow backend; pass [`Duration::ZERO`] to disable.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base_url: &Url, fetch_delay: Duration) -> Result<Self, CatalogError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: with_trailing_slash(base_url),
                fetch_delay,
                cache,
            }),
        })
    }

    /// Issue a GET and decode the JSON body.
    ///
    /// Returns `Ok(None)` for 404 and for an empty 2xx body, which is how the
    /// catalog reports an unknown product id.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, CatalogError> {
        let url = self.inner.base_url.join(path)?;
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = response.text().await?;
        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        if body.trim().is_empty() || body.trim() == "null" {
            return Ok(None);
        }

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get the full product list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Arc<[Product]>, CatalogError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products: Arc<[Product]> = self
            .get_json::<Vec<Product>>("products")
            .await?
            .unwrap_or_default()
            .into();

        debug!(count = products.len(), "Fetched products");
        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(Arc::clone(&products)))
            .await;

        Ok(products)
    }

    /// Get a single product by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for an unknown id, or an error if
    /// the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let cache_key = CacheKey::Product(id);

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product = self
            .get_json::<Product>(&format!("products/{id}"))
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get the list of category names.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Arc<[String]>, CatalogError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories: Arc<[String]> = self
            .get_json::<Vec<String>>("products/categories")
            .await?
            .unwrap_or_default()
            .into();

        self.inner
            .cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(Arc::clone(&categories)),
            )
            .await;

        Ok(categories)
    }

    // =========================================================================
    // User Methods
    // =========================================================================

    /// Get a user profile by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UserNotFound`] for an unknown id, or an error
    /// if the API request fails.
    #[instrument(skip(self))]
    pub async fn user(&self, id: i64) -> Result<UserProfile, CatalogError> {
        let cache_key = CacheKey::User(id);

        if let Some(CacheValue::User(profile)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for user");
            return Ok(*profile);
        }

        let profile = self
            .get_json::<UserProfile>(&format!("users/{id}"))
            .await?
            .ok_or(CatalogError::UserNotFound(id))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::User(Box::new(profile.clone())))
            .await;

        Ok(profile)
    }

    /// Fetch one page of the infinite product feed.
    ///
    /// # Errors
    ///
    /// Returns an error if the product list cannot be fetched.
    #[instrument(skip(self, request), fields(limit = request.limit, skip = request.skip, category = %request.category))]
    pub async fn fetch_page(&self, request: &PageRequest) -> Result<ProductPage, CatalogError> {
        if !self.inner.fetch_delay.is_zero() {
            tokio::time::sleep(self.inner.fetch_delay).await;
        }

        let products = self.products().await?;
        Ok(paginate(&products, request))
    }

    /// Drop every cached response.
    pub fn invalidate_cache(&self) {
        self.inner.cache.invalidate_all();
    }
}

/// `Url::join` replaces the last path segment unless the base ends in `/`.
pub(crate) fn with_trailing_slash(url: &Url) -> Url {
    let mut url = url.clone();
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
