//! Catalog product representation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Price, ProductId};

/// Category filter value that matches every product.
pub const ALL_CATEGORIES: &str = "all";

/// Aggregate customer rating attached to a catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Average score.
    pub rate: f64,
    /// Number of ratings.
    pub count: u64,
}

/// A product as returned by the catalog API.
///
/// Fields the storefront does not interpret are kept in [`Product::extra`]
/// and written back out unchanged, so a cart line item carries every field
/// the catalog returned at add-time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    /// Image URL.
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
    /// Any other fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Build a product with only the fields the cart needs.
    #[must_use]
    pub fn new(id: ProductId, title: impl Into<String>, price: Price) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            description: String::new(),
            category: String::new(),
            image: String::new(),
            rating: None,
            extra: Map::new(),
        }
    }

    /// Whether the product belongs to `category`; `"all"` matches everything.
    #[must_use]
    pub fn in_category(&self, category: &str) -> bool {
        category == ALL_CATEGORIES || self.category == category
    }

    /// Case-insensitive title match; an empty query matches everything.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim();
        query.is_empty() || self.title.to_lowercase().contains(&query.to_lowercase())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_catalog_payload() {
        let json = r#"{
            "id": 1,
            "title": "Fjallraven Backpack",
            "price": 109.95,
            "description": "Your perfect pack",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
            "rating": {"rate": 3.9, "count": 120},
            "sku": "FJ-001"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price, Price::from_cents(10995));
        assert_eq!(product.rating.as_ref().unwrap().count, 120);
        assert_eq!(product.extra.get("sku"), Some(&Value::from("FJ-001")));
    }

    #[test]
    fn test_unknown_fields_survive_reserialization() {
        let json = r#"{"id": 2, "title": "Mug", "price": 5, "color": "red"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["color"], "red");
        assert!(value.get("rating").is_none());
    }

    #[test]
    fn test_filters() {
        let mut product = Product::new(ProductId::new(1), "Silver Dragon Ring", Price::ZERO);
        product.category = "jewelery".to_string();

        assert!(product.in_category("all"));
        assert!(product.in_category("jewelery"));
        assert!(!product.in_category("electronics"));

        assert!(product.matches_query(""));
        assert!(product.matches_query("dragon"));
        assert!(product.matches_query("  RING "));
        assert!(!product.matches_query("necklace"));
    }
}
