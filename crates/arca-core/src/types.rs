//! # Domain Types
//!
//! The value types a cart is built from.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐        ┌─────────────────────┐                 │
//! │  │    CartLineItem     │───────►│      Variant        │                 │
//! │  │  ─────────────────  │        │  ─────────────────  │                 │
//! │  │  product_id         │        │  id                 │                 │
//! │  │  variant (snapshot) │        │  name               │                 │
//! │  │  quantity (≥ 1)     │        │  unit_price (Money) │                 │
//! │  └─────────────────────┘        │  attributes         │                 │
//! │                                 └─────────────────────┘                 │
//! │  ┌─────────────────────┐        ┌─────────────────────┐                 │
//! │  │    LineIdentity     │        │    CurrencyCode     │                 │
//! │  │  (product, variant) │        │  "MXN", "USD", ...  │                 │
//! │  └─────────────────────┘        └─────────────────────┘                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! A line item is identified by the pair `(product_id, variant.id)`. The
//! same variant id may appear under two different products; they are
//! distinct lines.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::money::Money;

// =============================================================================
// Currency Code
// =============================================================================

/// ISO 4217-style currency code: three ASCII letters, stored upper case.
///
/// Serialized as a plain JSON string. Deserializing anything that is not a
/// valid code fails, which is how a corrupted persisted cart is detected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parses and normalizes a currency code.
    ///
    /// ## Example
    /// ```rust
    /// use arca_core::CurrencyCode;
    ///
    /// assert_eq!(CurrencyCode::parse("mxn").unwrap().as_str(), "MXN");
    /// assert!(CurrencyCode::parse("pesos").is_err());
    /// ```
    pub fn parse(code: &str) -> Result<Self, CoreError> {
        let code = code.trim();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(CurrencyCode(code.to_ascii_uppercase()))
        } else {
            Err(CoreError::InvalidCurrency(code.to_string()))
        }
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        CurrencyCode(crate::DEFAULT_CURRENCY.to_string())
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CurrencyCode::parse(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CurrencyCode::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

// =============================================================================
// Variant
// =============================================================================

/// A purchasable SKU of a product, snapshotted into the cart at add time.
///
/// The cart never re-fetches or revalidates a variant: if the catalog price
/// changes later, lines already in the cart keep the price they were added
/// with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Variant {
    /// Stable variant identifier.
    pub id: String,

    /// Display name ("IPA 355ml", "Six-pack Stout").
    pub name: String,

    /// Price per unit in minor currency units.
    pub unit_price: Money,

    /// Extra display attributes (image URL, style, ABV...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl Variant {
    /// Creates a variant without display attributes.
    pub fn new(id: impl Into<String>, name: impl Into<String>, unit_price: Money) -> Self {
        Variant {
            id: id.into(),
            name: name.into(),
            unit_price,
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style helper to attach a display attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

// =============================================================================
// Line Identity
// =============================================================================

/// The `(product_id, variant_id)` pair that identifies a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineIdentity {
    pub product_id: String,
    pub variant_id: String,
}

impl LineIdentity {
    pub fn new(product_id: impl Into<String>, variant_id: impl Into<String>) -> Self {
        LineIdentity {
            product_id: product_id.into(),
            variant_id: variant_id.into(),
        }
    }
}

impl fmt::Display for LineIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.product_id, self.variant_id)
    }
}

// =============================================================================
// Cart Line Item
// =============================================================================

/// One `(product, variant, quantity)` entry in the cart.
///
/// ## Invariants
/// - `quantity >= 1`; a line that would drop to zero is removed instead
/// - at most one line per [`LineIdentity`] in a cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLineItem {
    /// Parent product identifier.
    pub product_id: String,

    /// Variant snapshot taken when the line was created.
    pub variant: Variant,

    /// Units of this variant in the cart.
    pub quantity: u32,
}

impl CartLineItem {
    /// Creates a line with quantity 1.
    pub fn new(product_id: impl Into<String>, variant: Variant) -> Self {
        CartLineItem {
            product_id: product_id.into(),
            variant,
            quantity: 1,
        }
    }

    /// Returns the identity of this line.
    pub fn identity(&self) -> LineIdentity {
        LineIdentity::new(self.product_id.clone(), self.variant.id.clone())
    }

    /// Checks whether this line has the given identity.
    #[inline]
    pub fn is(&self, product_id: &str, variant_id: &str) -> bool {
        self.product_id == product_id && self.variant.id == variant_id
    }
}
