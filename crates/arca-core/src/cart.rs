//! # Cart State
//!
//! The cart contents and the reducer operations that change them.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Storefront Action        Store Operation        Cart State Change      │
//! │  ─────────────────        ───────────────        ─────────────────      │
//! │                                                                         │
//! │  "Add to cart" ──────────► add_item() ─────────► qty += 1 or push      │
//! │                                                                         │
//! │  Quantity stepper ───────► update_quantity() ──► items[i].qty = n      │
//! │                                                  (n <= 0 → remove)     │
//! │                                                                         │
//! │  Trash icon ─────────────► remove_item() ──────► items.retain(..)      │
//! │                                                                         │
//! │  Checkout complete ──────► clear() ────────────► items.clear()         │
//! │                                                                         │
//! │  Currency switcher ──────► set_currency() ─────► currency = c          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these operations can fail. Unknown identities are ignored and
//! non-positive quantities mean "remove".

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{CartLineItem, CurrencyCode, Variant};

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by `(product_id, variant.id)`
/// - Every line has `quantity >= 1`
/// - First-time adds append; quantity changes never reorder lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartState {
    /// Lines in insertion order.
    pub items: Vec<CartLineItem>,

    /// Currency the cart is priced in.
    #[ts(type = "string")]
    pub currency: CurrencyCode,
}

impl CartState {
    /// Creates an empty cart priced in `currency`.
    pub fn new(currency: CurrencyCode) -> Self {
        CartState {
            items: Vec::new(),
            currency,
        }
    }

    /// Creates an empty cart in the crate default currency.
    pub fn empty() -> Self {
        CartState::new(CurrencyCode::default())
    }

    /// Adds one unit of a variant.
    ///
    /// ## Behavior
    /// - Identity already present: quantity increases by 1 in place
    /// - Identity not present: a new line with quantity 1 is appended
    pub fn add_item(&mut self, product_id: &str, variant: Variant) {
        self.add_item_with_quantity(product_id, variant, 1);
    }

    /// Adds `quantity` units of a variant using the same merge rule as
    /// [`add_item`](Self::add_item). A zero quantity leaves the cart unchanged.
    ///
    /// When merging, the line keeps the variant snapshot it was created with.
    pub fn add_item_with_quantity(&mut self, product_id: &str, variant: Variant, quantity: u32) {
        if quantity == 0 {
            return;
        }

        if let Some(item) = self.find_mut(product_id, &variant.id) {
            item.quantity = item.quantity.saturating_add(quantity);
            return;
        }

        let mut item = CartLineItem::new(product_id, variant);
        item.quantity = quantity;
        self.items.push(item);
    }

    /// Removes the line with the given identity.
    ///
    /// Returns `true` if a line was removed. Removing an absent identity is
    /// not an error.
    pub fn remove_item(&mut self, product_id: &str, variant_id: &str) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|i| !i.is(product_id, variant_id));
        self.items.len() != initial_len
    }

    /// Sets the absolute quantity of a line.
    ///
    /// ## Behavior
    /// - `quantity <= 0`: same as [`remove_item`](Self::remove_item)
    /// - identity not in the cart: no-op, no line is created
    /// - otherwise the quantity is replaced (values above `u32::MAX` clamp)
    ///
    /// Returns `true` if the cart changed.
    pub fn update_quantity(&mut self, product_id: &str, variant_id: &str, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_item(product_id, variant_id);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.find_mut(product_id, variant_id) {
            Some(item) if item.quantity != quantity => {
                item.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    /// Removes every line. The currency is left untouched.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Replaces the currency. Lines are left untouched.
    pub fn set_currency(&mut self, currency: CurrencyCode) {
        self.currency = currency;
    }

    /// Looks up a line by identity.
    pub fn find(&self, product_id: &str, variant_id: &str) -> Option<&CartLineItem> {
        self.items.iter().find(|i| i.is(product_id, variant_id))
    }

    fn find_mut(&mut self, product_id: &str, variant_id: &str) -> Option<&mut CartLineItem> {
        self.items.iter_mut().find(|i| i.is(product_id, variant_id))
    }

    /// Checks whether a line with this identity exists.
    pub fn contains(&self, product_id: &str, variant_id: &str) -> bool {
        self.find(product_id, variant_id).is_some()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for CartState {
    fn default() -> Self {
        CartState::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::selectors::{cart_count, cart_total};

    fn ipa() -> Variant {
        Variant::new("v1", "IPA 355ml", Money::from_minor(2100))
    }

    fn stout() -> Variant {
        Variant::new("v2", "Stout 355ml", Money::from_minor(3500))
    }

    #[test]
    fn test_add_item_appends_new_line() {
        let mut cart = CartState::empty();
        cart.add_item("p1", ipa());

        assert_eq!(cart.items, vec![CartLineItem::new("p1", ipa())]);
        assert_eq!(cart_count(&cart.items), 1);
        assert_eq!(cart_total(&cart.items).minor(), 2100);
    }

    #[test]
    fn test_add_same_identity_increments_in_place() {
        let mut cart = CartState::empty();
        cart.add_item("p1", ipa());
        cart.add_item("p2", stout());
        cart.add_item("p1", ipa());

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.items[0].product_id, "p1");
        assert_eq!(cart.items[0].quantity, 2);
        assert_eq!(cart.items[1].product_id, "p2");
        assert_eq!(cart_total(&cart.items).minor(), 4200 + 3500);
    }

    #[test]
    fn test_same_variant_id_under_other_product_is_distinct() {
        let mut cart = CartState::empty();
        cart.add_item("p1", ipa());
        cart.add_item("p2", ipa());

        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_merge_keeps_original_snapshot() {
        let mut cart = CartState::empty();
        cart.add_item("p1", ipa());

        let repriced = Variant::new("v1", "IPA 355ml", Money::from_minor(9999));
        cart.add_item("p1", repriced);

        assert_eq!(cart.items[0].variant.unit_price.minor(), 2100);
        assert_eq!(cart.items[0].quantity, 2);
    }

    #[test]
    fn test_add_with_quantity() {
        let mut cart = CartState::empty();
        cart.add_item_with_quantity("p1", ipa(), 0);
        assert!(cart.is_empty());

        cart.add_item_with_quantity("p1", ipa(), 6);
        cart.add_item_with_quantity("p1", ipa(), 6);
        assert_eq!(cart.find("p1", "v1").map(|i| i.quantity), Some(12));
    }

    #[test]
    fn test_add_saturates_quantity() {
        let mut cart = CartState::empty();
        cart.add_item_with_quantity("p1", ipa(), u32::MAX);
        cart.add_item("p1", ipa());
        assert_eq!(cart.items[0].quantity, u32::MAX);
    }

    #[test]
    fn test_update_quantity_sets_absolute_value() {
        let mut cart = CartState::empty();
        cart.add_item("p1", ipa());
        cart.add_item("p1", ipa());

        assert!(cart.update_quantity("p1", "v1", 5));
        assert_eq!(cart.items[0].quantity, 5);
        assert_eq!(cart_total(&cart.items).minor(), 10500);

        // Same value again changes nothing
        assert!(!cart.update_quantity("p1", "v1", 5));
    }

    #[test]
    fn test_update_quantity_zero_or_negative_removes() {
        let mut cart = CartState::empty();
        cart.add_item("p1", ipa());
        cart.add_item("p2", stout());

        assert!(cart.update_quantity("p1", "v1", 0));
        assert!(!cart.contains("p1", "v1"));

        assert!(cart.update_quantity("p2", "v2", -3));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_unknown_identity_is_noop() {
        let mut cart = CartState::empty();
        cart.add_item("p1", ipa());

        assert!(!cart.update_quantity("p9", "v9", 4));
        assert_eq!(cart.len(), 1);
        assert!(!cart.contains("p9", "v9"));
    }

    #[test]
    fn test_update_quantity_clamps_large_values() {
        let mut cart = CartState::empty();
        cart.add_item("p1", ipa());
        cart.update_quantity("p1", "v1", i64::MAX);
        assert_eq!(cart.items[0].quantity, u32::MAX);
    }

    #[test]
    fn test_update_does_not_reorder() {
        let mut cart = CartState::empty();
        cart.add_item("p1", ipa());
        cart.add_item("p2", stout());
        cart.update_quantity("p1", "v1", 7);

        let order: Vec<_> = cart.items.iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(order, vec!["p1", "p2"]);
    }

    #[test]
    fn test_remove_item() {
        let mut cart = CartState::empty();
        cart.add_item("p1", ipa());

        assert!(!cart.remove_item("p1", "nope"));
        assert!(cart.remove_item("p1", "v1"));
        assert!(cart.is_empty());
        assert_eq!(cart_count(&cart.items), 0);
    }

    #[test]
    fn test_clear_keeps_currency() {
        let mut cart = CartState::empty();
        cart.set_currency(CurrencyCode::parse("USD").unwrap());
        cart.add_item("p1", ipa());
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.currency.as_str(), "USD");
    }

    #[test]
    fn test_set_currency_keeps_items() {
        let mut cart = CartState::empty();
        cart.add_item("p1", ipa());
        cart.set_currency(CurrencyCode::parse("EUR").unwrap());

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.currency.as_str(), "EUR");
    }

    #[test]
    fn test_state_json_shape() {
        let mut cart = CartState::new(CurrencyCode::parse("MXN").unwrap());
        cart.add_item("p1", ipa());

        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json["currency"], "MXN");
        assert_eq!(json["items"][0]["quantity"], 1);
        assert_eq!(json["items"][0]["variant"]["unitPrice"], 2100);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        /// An operation against a small identity space so collisions are common.
        #[derive(Debug, Clone)]
        enum Op {
            Add(u8, u8, i64),
            Remove(u8, u8),
            Update(u8, u8, i64),
            Clear,
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                4 => (0u8..3, 0u8..3, 1i64..5000).prop_map(|(p, v, c)| Op::Add(p, v, c)),
                2 => (0u8..3, 0u8..3).prop_map(|(p, v)| Op::Remove(p, v)),
                2 => (0u8..3, 0u8..3, -3i64..20).prop_map(|(p, v, q)| Op::Update(p, v, q)),
                1 => Just(Op::Clear),
            ]
        }

        fn apply(cart: &mut CartState, op: &Op) {
            match op {
                Op::Add(p, v, cents) => cart.add_item(
                    &format!("p{p}"),
                    Variant::new(format!("v{v}"), "Beer", Money::from_minor(*cents)),
                ),
                Op::Remove(p, v) => {
                    cart.remove_item(&format!("p{p}"), &format!("v{v}"));
                }
                Op::Update(p, v, q) => {
                    cart.update_quantity(&format!("p{p}"), &format!("v{v}"), *q);
                }
                Op::Clear => cart.clear(),
            }
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: adding the same identity twice yields one line with quantity 2.
            #[test]
            fn double_add_is_single_line(
                product in "[a-z0-9]{1,12}",
                variant in "[a-z0-9]{1,12}",
                cents in 0i64..1_000_000,
            ) {
                let mut cart = CartState::empty();
                let v = Variant::new(variant.clone(), "Beer", Money::from_minor(cents));
                cart.add_item(&product, v.clone());
                cart.add_item(&product, v);

                prop_assert_eq!(cart.len(), 1);
                prop_assert_eq!(cart.items[0].quantity, 2);
            }

            /// Property: after any op sequence, identities are unique and quantities positive.
            #[test]
            fn invariants_hold_after_any_sequence(ops in proptest::collection::vec(op(), 0..60)) {
                let mut cart = CartState::empty();
                for op in &ops {
                    apply(&mut cart, op);
                }

                let mut seen = std::collections::HashSet::new();
                for item in &cart.items {
                    prop_assert!(item.quantity >= 1);
                    prop_assert!(seen.insert(item.identity()));
                }
            }

            /// Property: update_quantity(.., 0) always removes the identity.
            #[test]
            fn zero_quantity_eliminates(ops in proptest::collection::vec(op(), 1..40), p in 0u8..3, v in 0u8..3) {
                let mut cart = CartState::empty();
                for op in &ops {
                    apply(&mut cart, op);
                }
                cart.update_quantity(&format!("p{p}"), &format!("v{v}"), 0);
                let (pid, vid) = (format!("p{p}"), format!("v{v}"));
                prop_assert!(!cart.contains(&pid, &vid));
            }
        }
    }
}
