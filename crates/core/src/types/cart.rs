//! Shopping cart line items and the rules that keep them consistent.
//!
//! # Invariants
//!
//! - At most one line item per product id.
//! - Every line item has `quantity >= 1`; setting a quantity to zero removes
//!   the line.
//! - Line items keep insertion order.
//!
//! The invariants are enforced on every mutation and again when a cart is
//! deserialized, so a hand-edited or corrupted snapshot cannot smuggle in a
//! duplicate or a zero-quantity line.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Price, Product, ProductId};

/// One product in the cart together with its quantity.
///
/// Serialized flat: the product fields and `quantity` sit side by side,
/// matching the shape the storefront has always persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Snapshot of the product taken the first time it was added.
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl CartLineItem {
    /// The product id of this line.
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// Ordered collection of line items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLineItem>", into = "Vec<CartLineItem>")]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add one unit of `product`.
    ///
    /// If the product is already in the cart only its quantity changes; the
    /// existing snapshot (title, price, image, ...) is kept and the fields of
    /// `product` are ignored.
    pub fn add(&mut self, product: Product) {
        if let Some(line) = self.line_mut(product.id) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.items.push(CartLineItem {
                product,
                quantity: 1,
            });
        }
    }

    /// Set the quantity of `id` to exactly `quantity`.
    ///
    /// Zero removes the line. Returns `false` when `id` is not in the cart,
    /// in which case nothing changes.
    pub fn set_quantity(&mut self, id: ProductId, quantity: u32) -> bool {
        if quantity == 0 {
            let before = self.items.len();
            self.items.retain(|line| line.id() != id);
            return self.items.len() != before;
        }

        match self.line_mut(id) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove every line item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Look up the line for `id`.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|line| line.id() == id)
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn line_mut(&mut self, id: ProductId) -> Option<&mut CartLineItem> {
        self.items.iter_mut().find(|line| line.id() == id)
    }
}

impl From<Vec<CartLineItem>> for Cart {
    /// Rebuild a cart from raw line items, restoring the invariants.
    ///
    /// Zero-quantity lines are dropped. Repeated ids collapse into the first
    /// occurrence with the quantities summed, the same result repeated
    /// [`Cart::add`] calls would have produced.
    fn from(raw: Vec<CartLineItem>) -> Self {
        let mut items: Vec<CartLineItem> = Vec::with_capacity(raw.len());
        let mut positions: HashMap<ProductId, usize> = HashMap::with_capacity(raw.len());

        for line in raw.into_iter().filter(|line| line.quantity > 0) {
            if let Some(existing) = positions.get(&line.id()).and_then(|&i| items.get_mut(i)) {
                existing.quantity = existing.quantity.saturating_add(line.quantity);
            } else {
                positions.insert(line.id(), items.len());
                items.push(line);
            }
        }

        Self { items }
    }
}

impl From<Cart> for Vec<CartLineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}
