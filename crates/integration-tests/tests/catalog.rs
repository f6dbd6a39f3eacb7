//! Catalog client and feed against a fake catalog API.

#![allow(clippy::indexing_slicing)]

use std::time::Duration;

use simplemart_core::ProductId;
use simplemart_integration_tests::FakeCatalog;
use simplemart_storefront::feed::ProductFeed;
use simplemart_storefront::services::catalog::{CatalogClient, CatalogError, PageRequest};

async fn client() -> (FakeCatalog, CatalogClient) {
    let fake = FakeCatalog::new();
    let url = fake.spawn().await;
    let client = CatalogClient::new(&url, Duration::ZERO).expect("client builds");
    (fake, client)
}

#[tokio::test]
async fn test_products_are_decoded_and_cached() {
    let (fake, client) = client().await;

    let products = client.products().await.expect("products load");
    assert_eq!(products.len(), 3);
    assert_eq!(products[2].title, "WD 2TB Portable External Hard Drive");
    assert_eq!(products[2].price.to_string(), "$64.00");

    client.products().await.expect("products load");
    assert_eq!(fake.product_list_hits(), 1);

    client.invalidate_cache();
    client.products().await.expect("products load");
    assert_eq!(fake.product_list_hits(), 2);
}

#[tokio::test]
async fn test_single_product_and_unknown_id() {
    let (_fake, client) = client().await;

    let product = client.product(ProductId::new(5)).await.expect("product loads");
    assert_eq!(product.category, "jewelery");
    assert_eq!(product.rating.map(|r| r.count), Some(400));

    let err = client
        .product(ProductId::new(404))
        .await
        .expect_err("unknown id");
    assert!(matches!(err, CatalogError::NotFound(id) if id == ProductId::new(404)));
}

#[tokio::test]
async fn test_categories() {
    let (_fake, client) = client().await;
    let categories = client.categories().await.expect("categories load");
    assert_eq!(&*categories, ["electronics", "jewelery", "men's clothing"]);
}

#[tokio::test]
async fn test_fetch_page_fabricates_ids() {
    let (_fake, client) = client().await;
    let page = client
        .fetch_page(&PageRequest {
            limit: 8,
            skip: 8,
            category: "all".to_string(),
        })
        .await
        .expect("page loads");

    assert!(page.has_more);
    assert_eq!(page.total, 30);
    assert_eq!(page.products.len(), 8);
    assert_eq!(page.products[0].id, ProductId::new(1 + 800));
    assert_eq!(page.products[0].title, "Fjallraven Backpack (2-1)");
    assert_eq!(page.products[1].id, ProductId::new(5 + 1000 + 800));
}

#[tokio::test]
async fn test_feed_loads_pages_and_resets() {
    let (_fake, client) = client().await;
    let mut feed = ProductFeed::new(4);

    assert_eq!(feed.load_next(&client).await.expect("page loads"), 4);
    assert_eq!(feed.load_next(&client).await.expect("page loads"), 4);
    assert_eq!(feed.products().len(), 8);
    assert_eq!(feed.next_skip(), 8);

    feed.reset("electronics");
    feed.load_next(&client).await.expect("page loads");
    assert_eq!(feed.products().len(), 4);
    assert!(feed.products().iter().all(|p| p.category == "electronics"));
}

#[tokio::test]
async fn test_response_for_previous_category_is_dropped() {
    let (_fake, client) = client().await;
    let mut feed = ProductFeed::new(4);

    let stale = feed.begin().expect("ticket issued");
    let stale_page = client.fetch_page(stale.request()).await.expect("page loads");

    feed.reset("jewelery");
    assert!(!feed.commit(&stale, stale_page));
    assert!(feed.products().is_empty());

    feed.load_next(&client).await.expect("page loads");
    assert!(feed.products().iter().all(|p| p.category == "jewelery"));
}
