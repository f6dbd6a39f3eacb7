//! Infinite-scroll product feed.
//!
//! The feed accumulates pages from [`CatalogClient::fetch_page`]. Each fetch
//! is issued as a [`FetchTicket`] stamped with the feed's generation; a
//! category change bumps the generation, so a response that arrives after
//! the switch no longer matches and is dropped instead of being appended to
//! the new category's list.

use simplemart_core::{ALL_CATEGORIES, Product};
use tracing::debug;

use crate::services::catalog::{CatalogClient, CatalogError, PageRequest, ProductPage};

/// A fetch in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    request: PageRequest,
}

impl FetchTicket {
    /// Parameters to fetch with.
    #[must_use]
    pub const fn request(&self) -> &PageRequest {
        &self.request
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// Accumulated feed state for one view.
#[derive(Debug, Clone)]
pub struct ProductFeed {
    page_size: usize,
    category: String,
    products: Vec<Product>,
    skip: usize,
    has_more: bool,
    loading: bool,
    generation: u64,
}

impl ProductFeed {
    /// An empty feed over all categories.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            category: ALL_CATEGORIES.to_string(),
            products: Vec::new(),
            skip: 0,
            has_more: true,
            loading: false,
            generation: 0,
        }
    }

    /// Start over for `category`, invalidating every outstanding ticket.
    pub fn reset(&mut self, category: impl Into<String>) {
        self.category = category.into();
        self.products.clear();
        self.skip = 0;
        self.has_more = true;
        self.loading = false;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Issue a ticket for the next page.
    ///
    /// Returns `None` while a fetch is already outstanding or when the feed
    /// is exhausted.
    pub fn begin(&mut self) -> Option<FetchTicket> {
        if self.loading || !self.has_more {
            return None;
        }
        self.loading = true;
        Some(FetchTicket {
            generation: self.generation,
            request: PageRequest {
                limit: self.page_size,
                skip: self.skip,
                category: self.category.clone(),
            },
        })
    }

    /// Append `page` if `ticket` is still current. Returns whether it was
    /// applied.
    pub fn commit(&mut self, ticket: &FetchTicket, page: ProductPage) -> bool {
        if ticket.generation != self.generation || ticket.request.skip != self.skip {
            debug!(
                ticket_generation = ticket.generation,
                current_generation = self.generation,
                category = %ticket.request.category,
                "Dropping stale feed page"
            );
            return false;
        }

        self.loading = false;
        self.skip += ticket.request.limit;
        self.has_more = page.has_more;
        self.products.extend(page.products);
        true
    }

    /// Release a ticket whose fetch failed so the next [`Self::begin`] can
    /// retry.
    pub fn abandon(&mut self, ticket: &FetchTicket) {
        if ticket.generation == self.generation {
            self.loading = false;
        }
    }

    /// Fetch and append the next page.
    ///
    /// Returns how many products were added.
    ///
    /// # Errors
    ///
    /// Returns an error if the page could not be fetched. The feed is left
    /// as it was.
    pub async fn load_next(&mut self, catalog: &CatalogClient) -> Result<usize, CatalogError> {
        let Some(ticket) = self.begin() else {
            return Ok(0);
        };

        match catalog.fetch_page(ticket.request()).await {
            Ok(page) => {
                let count = page.products.len();
                Ok(if self.commit(&ticket, page) { count } else { 0 })
            }
            Err(err) => {
                self.abandon(&ticket);
                Err(err)
            }
        }
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Offset the next page starts at.
    #[must_use]
    pub const fn next_skip(&self) -> usize {
        self.skip
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use simplemart_core::{Price, ProductId};

    use super::*;
    use crate::services::catalog::paginate;

    fn catalog() -> Vec<Product> {
        [(1, "men's clothing"), (2, "jewelery"), (3, "electronics")]
            .into_iter()
            .map(|(id, category)| {
                let mut p = Product::new(ProductId::new(id), format!("P{id}"), Price::from_cents(100));
                p.category = category.to_string();
                p
            })
            .collect()
    }

    #[test]
    fn test_pages_accumulate() {
        let catalog = catalog();
        let mut feed = ProductFeed::new(2);

        let ticket = feed.begin().unwrap();
        assert!(feed.begin().is_none());
        assert!(feed.commit(&ticket, paginate(&catalog, ticket.request())));

        let ticket = feed.begin().unwrap();
        assert_eq!(ticket.request().skip, 2);
        assert!(feed.commit(&ticket, paginate(&catalog, ticket.request())));

        assert_eq!(feed.products().len(), 4);
        assert_eq!(feed.next_skip(), 4);
        assert!(feed.has_more());
    }

    #[test]
    fn test_stale_ticket_is_dropped_after_reset() {
        let catalog = catalog();
        let mut feed = ProductFeed::new(2);

        let stale = feed.begin().unwrap();
        feed.reset("jewelery");
        let fresh = feed.begin().unwrap();

        // The old request resolves after the switch
        assert!(!feed.commit(&stale, paginate(&catalog, stale.request())));
        assert!(feed.products().is_empty());
        assert!(feed.is_loading());

        assert!(feed.commit(&fresh, paginate(&catalog, fresh.request())));
        assert!(feed.products().iter().all(|p| p.category == "jewelery"));
    }

    #[test]
    fn test_duplicate_commit_is_dropped() {
        let catalog = catalog();
        let mut feed = ProductFeed::new(2);

        let ticket = feed.begin().unwrap();
        let page = paginate(&catalog, ticket.request());
        assert!(feed.commit(&ticket, page.clone()));
        assert!(!feed.commit(&ticket, page));
        assert_eq!(feed.products().len(), 2);
    }

    #[test]
    fn test_abandon_allows_retry() {
        let mut feed = ProductFeed::new(2);
        let ticket = feed.begin().unwrap();
        feed.abandon(&ticket);
        assert_eq!(feed.begin().unwrap(), ticket);
    }

    #[test]
    fn test_exhausted_feed_issues_no_ticket() {
        let mut feed = ProductFeed::new(2);
        let ticket = feed.begin().unwrap();
        let page = ProductPage {
            products: Vec::new(),
            has_more: false,
            total: 0,
        };
        assert!(feed.commit(&ticket, page));
        assert!(feed.begin().is_none());
    }
}
