//! # arca-core: Pure Cart Logic for El Arca
//!
//! This crate holds the shopping-cart rules of the El Arca storefront as
//! plain data and pure functions. Nothing in here touches storage, the
//! network or a logging subscriber.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        El Arca Cart Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Storefront UI (subscribers)                  │   │
//! │  │    Product page ──► Cart drawer ──► Checkout summary            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ subscribe / snapshot                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    arca-store (CartStore)                       │   │
//! │  │    hydrate ──► reduce ──► persist ──► notify                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ arca-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ selectors │  │   │
//! │  │   │  Variant  │  │   Money   │  │ CartState │  │ cart_count│  │   │
//! │  │   │  LineItem │  │ Currency  │  │  reducer  │  │ cart_total│  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO CALLBACKS • PURE FUNCTIONS          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Line items, variants, currency codes
//! - [`money`] - Money type with integer arithmetic (minor units only)
//! - [`cart`] - The cart state and its reducer operations
//! - [`selectors`] - Derived values (count, total) over any item slice
//! - [`validation`] - Input checks for identifiers and storage keys
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use arca_core::{cart_count, cart_total, CartState, CurrencyCode, Money, Variant};
//!
//! let mut cart = CartState::new(CurrencyCode::parse("MXN").unwrap());
//! let ipa = Variant::new("v1", "IPA 355ml", Money::from_minor(2100));
//!
//! cart.add_item("p1", ipa.clone());
//! cart.add_item("p1", ipa);
//!
//! assert_eq!(cart.items.len(), 1);
//! assert_eq!(cart_count(&cart.items), 2);
//! assert_eq!(cart_total(&cart.items).minor(), 4200);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod selectors;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::CartState;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use selectors::{cart_count, cart_total, line_total, CartTotals};
pub use types::{CartLineItem, CurrencyCode, LineIdentity, Variant};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency used when neither configuration nor persisted state names one.
///
/// El Arca sells in Mexican pesos; deployments override this through
/// `arca-store` configuration.
pub const DEFAULT_CURRENCY: &str = "MXN";

/// Maximum length accepted for product and variant identifiers.
pub const MAX_ID_LEN: usize = 128;
