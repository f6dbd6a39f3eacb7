//! Cache types for catalog API responses.

use std::sync::Arc;

use simplemart_core::{Product, ProductId, UserProfile};

/// Cache key for catalog responses.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products,
    Product(ProductId),
    Categories,
    User(i64),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Arc<[Product]>),
    Product(Box<Product>),
    Categories(Arc<[String]>),
    User(Box<UserProfile>),
}
