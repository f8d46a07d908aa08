//! # Persisted Payload
//!
//! Encoding of the cart into the string stored under the storage key.
//!
//! ## Payload Format
//! ```json
//! {
//!   "items": [
//!     {
//!       "productId": "p1",
//!       "variant": { "id": "v1", "name": "IPA 355ml", "unitPrice": 2100 },
//!       "quantity": 2
//!     }
//!   ],
//!   "currency": "MXN"
//! }
//! ```
//!
//! Only `items` and `currency` are written. Derived values (count, total)
//! are recomputed after hydration. The payload carries no version field;
//! unknown extra fields are ignored on read so older readers tolerate newer
//! writers.

use arca_core::{CartLineItem, CartState, CurrencyCode};
use serde::{Deserialize, Serialize};

use crate::error::StoreResult;

/// Borrowed view used for writing, so encoding never clones the cart.
#[derive(Serialize)]
struct PayloadRef<'a> {
    items: &'a [CartLineItem],
    currency: &'a CurrencyCode,
}

/// Owned shape used for reading.
#[derive(Deserialize)]
struct Payload {
    items: Vec<CartLineItem>,
    currency: CurrencyCode,
}

/// Serializes the persistable part of the cart.
pub fn encode(state: &CartState) -> StoreResult<String> {
    let payload = PayloadRef {
        items: &state.items,
        currency: &state.currency,
    };
    Ok(serde_json::to_string(&payload)?)
}

/// Parses a stored payload.
///
/// Lines with a zero quantity and duplicate identities are dropped (the
/// first occurrence wins) so a hand-edited or corrupted payload can never
/// break the cart invariants.
pub fn decode(raw: &str) -> StoreResult<CartState> {
    let payload: Payload = serde_json::from_str(raw)?;

    let mut state = CartState::new(payload.currency);
    for item in payload.items {
        if item.quantity == 0 || state.contains(&item.product_id, &item.variant.id) {
            continue;
        }
        state.items.push(item);
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use arca_core::{Money, Variant};

    fn sample() -> CartState {
        let mut cart = CartState::new(CurrencyCode::parse("MXN").unwrap());
        cart.add_item("p1", Variant::new("v1", "IPA", Money::from_minor(2100)));
        cart.add_item("p1", Variant::new("v1", "IPA", Money::from_minor(2100)));
        cart.add_item(
            "p2",
            Variant::new("v7", "Porter", Money::from_minor(3900)).with_attribute("abv", "6.5"),
        );
        cart
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let cart = sample();
        let raw = encode(&cart).unwrap();
        assert_eq!(decode(&raw).unwrap(), cart);
    }

    #[test]
    fn test_encode_writes_only_items_and_currency() {
        let raw = encode(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["currency", "items"]);
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(matches!(decode("not json"), Err(StoreError::Serialization(_))));
        assert!(decode("{\"items\":[]}").is_err());
        assert!(decode("{\"items\":[],\"currency\":\"pesos\"}").is_err());
        assert!(decode("{\"items\":{},\"currency\":\"MXN\"}").is_err());
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let state = decode("{\"items\":[],\"currency\":\"usd\",\"version\":3}").unwrap();
        assert!(state.is_empty());
        assert_eq!(state.currency.as_str(), "USD");
    }

    #[test]
    fn test_decode_repairs_invariants() {
        let raw = r#"{
            "items": [
                {"productId":"p1","variant":{"id":"v1","name":"IPA","unitPrice":2100},"quantity":2},
                {"productId":"p1","variant":{"id":"v1","name":"IPA","unitPrice":2100},"quantity":9},
                {"productId":"p2","variant":{"id":"v2","name":"Stout","unitPrice":3500},"quantity":0}
            ],
            "currency": "MXN"
        }"#;
        let state = decode(raw).unwrap();
        assert_eq!(state.len(), 1);
        assert_eq!(state.items[0].quantity, 2);
    }
}
