//! # Derived Selectors
//!
//! Pure functions that derive display values from cart lines. They take a
//! plain item slice so they work on a store snapshot, a hand-built test
//! fixture, or a cart decoded from some other source.
//!
//! Nothing here is persisted: counts and totals are always recomputed.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::CartState;
use crate::money::Money;
use crate::types::CartLineItem;

/// Total number of units across all lines.
///
/// ## Example
/// ```rust
/// use arca_core::{cart_count, CartLineItem, Money, Variant};
///
/// let mut line = CartLineItem::new("p1", Variant::new("v1", "IPA", Money::from_minor(2100)));
/// line.quantity = 3;
/// assert_eq!(cart_count(&[line]), 3);
/// ```
pub fn cart_count(items: &[CartLineItem]) -> u64 {
    items.iter().map(|i| u64::from(i.quantity)).sum()
}

/// Line total (unit price × quantity), saturating.
pub fn line_total(item: &CartLineItem) -> Money {
    item.variant.unit_price.multiply_quantity(item.quantity)
}

/// Sum of all line totals in minor units. Integer arithmetic only.
pub fn cart_total(items: &[CartLineItem]) -> Money {
    items.iter().map(line_total).sum()
}

/// Cart totals summary for API responses and UI badges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    /// Distinct lines in the cart.
    pub line_count: usize,

    /// Units across all lines (what the cart badge shows).
    pub item_count: u64,

    /// Grand total in minor units.
    pub total: Money,

    /// Currency of `total`.
    pub currency: String,
}

impl From<&CartState> for CartTotals {
    fn from(cart: &CartState) -> Self {
        CartTotals {
            line_count: cart.items.len(),
            item_count: cart_count(&cart.items),
            total: cart_total(&cart.items),
            currency: cart.currency.to_string(),
        }
    }
}
