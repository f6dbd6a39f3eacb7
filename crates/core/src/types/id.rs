//! Product identifier newtype.

use core::fmt;
use core::num::ParseIntError;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Catalog product identifier.
///
/// Transparent on the wire, so `{"id": 7}` deserializes directly. The
/// catalog fabricates pagination by offsetting real ids, which is why this
/// wraps an `i64` rather than anything narrower.
///
/// # Example
///
/// ```rust
/// # use simplemart_core::ProductId;
/// let id: ProductId = "42".parse().unwrap();
/// assert_eq!(id, ProductId::new(42));
/// assert_eq!(id.offset(1000).as_i64(), 1042);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i64);

impl ProductId {
    /// Create a new ID from an i64 value.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the underlying i64 value.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }

    /// Shift the ID by `delta`, saturating at the numeric bounds.
    #[must_use]
    pub const fn offset(&self, delta: i64) -> Self {
        Self(self.0.saturating_add(delta))
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<ProductId> for i64 {
    fn from(id: ProductId) -> Self {
        id.0
    }
}
