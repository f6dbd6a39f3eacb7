//! Catalog browsing.

use std::fmt::Write as _;

use simplemart_core::{ALL_CATEGORIES, Product, ProductId};
use simplemart_storefront::error::AppError;
use simplemart_storefront::feed::ProductFeed;
use simplemart_storefront::services::catalog::filter_products;
use simplemart_storefront::state::AppState;
use simplemart_storefront::store::{SessionStore, Storage};

/// Load `pages` feed pages for `category` and print those matching `search`.
///
/// # Errors
///
/// Returns an error if a page could not be fetched.
pub async fn list<S: Storage>(
    state: &AppState,
    store: &mut SessionStore<S>,
    category: String,
    search: String,
    limit: usize,
    pages: usize,
) -> Result<(), AppError> {
    if limit == 0 {
        return Err(AppError::BadRequest("--limit must be at least 1".to_string()));
    }

    store.set_selected_category(category);
    store.set_search_query(search);

    let mut feed = ProductFeed::new(limit);
    feed.reset(store.selected_category());
    for _ in 0..pages {
        if feed.load_next(state.catalog()).await? == 0 && !feed.has_more() {
            break;
        }
    }

    let visible: Vec<&Product> =
        filter_products(feed.products(), store.selected_category(), store.search_query())
            .collect();
    if visible.is_empty() {
        println!("No products found");
    }
    for product in visible {
        println!("{}", product_row(product));
    }
    Ok(())
}

/// Print one product in full.
///
/// # Errors
///
/// Returns an error if the product does not exist or could not be fetched.
pub async fn show(state: &AppState, id: ProductId) -> Result<(), AppError> {
    let product = state.catalog().product(id).await?;
    print!("{}", product_detail(&product));
    Ok(())
}

/// Print the category names, `all` first.
///
/// # Errors
///
/// Returns an error if the categories could not be fetched.
pub async fn categories(state: &AppState) -> Result<(), AppError> {
    println!("{ALL_CATEGORIES}");
    for category in state.catalog().categories().await?.iter() {
        println!("{category}");
    }
    Ok(())
}

fn product_row(product: &Product) -> String {
    format!(
        "{:>8}  {:>9}  {}",
        product.id.to_string(),
        product.price.to_string(),
        product.title
    )
}

fn product_detail(product: &Product) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (#{})", product.title, product.id);
    let _ = writeln!(out, "Price:    {}", product.price);
    let _ = writeln!(out, "Category: {}", product.category);
    if let Some(rating) = &product.rating {
        let _ = writeln!(out, "Rating:   {:.1} ({} reviews)", rating.rate, rating.count);
    }
    if !product.image.is_empty() {
        let _ = writeln!(out, "Image:    {}", product.image);
    }
    if !product.description.is_empty() {
        let _ = writeln!(out, "\n{}", product.description);
    }
    out
}

#[cfg(test)]
mod tests {
    use simplemart_core::{Price, Rating};

    use super::*;

    fn product() -> Product {
        let mut product = Product::new(ProductId::new(9), "Hard Drive", Price::from_cents(6400));
        product.category = "electronics".to_string();
        product.rating = Some(Rating {
            rate: 3.3,
            count: 203,
        });
        product
    }

    #[test]
    fn test_product_row() {
        assert_eq!(product_row(&product()), "       9     $64.00  Hard Drive");
    }

    #[test]
    fn test_product_detail() {
        let detail = product_detail(&product());
        assert!(detail.starts_with("Hard Drive (#9)\n"));
        assert!(detail.contains("Price:    $64.00\n"));
        assert!(detail.contains("Rating:   3.3 (203 reviews)\n"));
        assert!(!detail.contains("Image:"));
    }
}
