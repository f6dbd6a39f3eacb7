//! Client-side pagination over the fixed catalog.
//!
//! The catalog endpoint returns one finite list. To drive an infinite feed
//! the list is filtered, replayed [`REPLAY_FACTOR`] times, and every replayed
//! product is relabelled with an id and title derived from its position and
//! the requested offset, so successive pages look like fresh products.

use simplemart_core::Product;

/// How many times the filtered catalog is replayed per page request.
pub const REPLAY_FACTOR: usize = 10;

/// Parameters of one page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Maximum number of products to return.
    pub limit: usize,
    /// Offset of the page within the feed.
    pub skip: usize,
    /// Category filter (`"all"` for no filter).
    pub category: String,
}

/// One page of the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    pub products: Vec<Product>,
    /// Always `true`: the feed never runs dry.
    pub has_more: bool,
    /// Size of the replayed list the page was cut from.
    pub total: usize,
}

/// Cut a page out of `catalog` for `request`.
///
/// A product at position `index` of the filtered list gets id
/// `id + index * 1000 + skip * 100` and title `"{title} ({page}-{index + 1})"`
/// where `page = skip / limit + 1`.
#[must_use]
pub fn paginate(catalog: &[Product], request: &PageRequest) -> ProductPage {
    let filtered: Vec<&Product> = catalog
        .iter()
        .filter(|product| product.in_category(&request.category))
        .collect();

    let page_number = request.skip.checked_div(request.limit).unwrap_or(0) + 1;
    let skip_offset = to_i64(request.skip).saturating_mul(100);

    let products = (0..REPLAY_FACTOR)
        .flat_map(|_| filtered.iter().enumerate())
        .take(request.limit)
        .map(|(index, product)| {
            let mut relabelled = (*product).clone();
            relabelled.id = product
                .id
                .offset(to_i64(index).saturating_mul(1000))
                .offset(skip_offset);
            relabelled.title = format!("{} ({page_number}-{})", product.title, index + 1);
            relabelled
        })
        .collect();

    ProductPage {
        products,
        has_more: true,
        total: filtered.len() * REPLAY_FACTOR,
    }
}

/// Products matching `category` (or `"all"`) whose title contains `query`.
pub fn filter_products<'a>(
    products: &'a [Product],
    category: &'a str,
    query: &'a str,
) -> impl Iterator<Item = &'a Product> + 'a {
    products
        .iter()
        .filter(move |product| product.in_category(category) && product.matches_query(query))
}

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
