//! # Cart Store
//!
//! The canonical in-process cart: lazily hydrated, persisted on every
//! mutation, observable by any number of listeners.
//!
//! ## Mutation Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Mutating Call                                    │
//! │                                                                         │
//! │  add_item / remove_item / update_quantity / clear / set_currency        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  0. ensure_hydrated()      (first call only; never after a mutation)    │
//! │       │                                                                 │
//! │  ┌────┴──────────────── mutation lock held ─────────────────────────┐   │
//! │  │ 1. next = reduce(current)                                        │   │
//! │  │ 2. swap snapshot slot   (readers now see `next`)                 │   │
//! │  │ 3. persist {items, currency}   (failure → WARN, continue)        │   │
//! │  └────┬─────────────────────────────────────────────────────────────┘   │
//! │       ▼                                                                 │
//! │  4. notify listeners       (lock released; panics isolated)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! - `mutation: Mutex<()>` serializes reduce/swap/persist
//! - `state: RwLock<Arc<CartState>>` is held only to swap or clone the `Arc`
//! - listeners run with no store lock held, so they may read
//!   [`CartStore::snapshot`] and may call mutating operations; a nested
//!   mutation runs its own notification pass before the outer one continues

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, Once, PoisonError, RwLock};

use arca_core::{cart_count, cart_total, CartState, CartTotals, CurrencyCode, Money, Variant};
use tracing::{debug, info, warn};

use crate::config::{StorageBackend, StoreConfig, DEFAULT_STORAGE_KEY};
use crate::error::{StoreError, StoreResult};
use crate::observer::{ListenerRegistry, Subscription};
use crate::persist;
use crate::storage::{CartStorage, FileStorage, MemoryStorage};

// =============================================================================
// Options
// =============================================================================

/// Construction options for a [`CartStore`].
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Currency of a fresh cart (and of a cart whose payload is unreadable).
    pub default_currency: CurrencyCode,

    /// Fixed key the payload is stored under.
    pub storage_key: String,

    /// Payloads larger than this are not written. `None` disables the check.
    pub max_payload_bytes: Option<usize>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        StoreOptions {
            default_currency: CurrencyCode::default(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            max_payload_bytes: None,
        }
    }
}

impl From<&StoreConfig> for StoreOptions {
    fn from(config: &StoreConfig) -> Self {
        StoreOptions {
            default_currency: config.cart.default_currency.clone(),
            storage_key: config.storage.key.clone(),
            max_payload_bytes: Some(config.cart.max_payload_bytes),
        }
    }
}

// =============================================================================
// Cart Store
// =============================================================================

/// Observable, persisted cart.
///
/// ## Usage
/// ```rust
/// use std::sync::Arc;
/// use arca_core::{CurrencyCode, Money, Variant};
/// use arca_store::{CartStore, MemoryStorage};
///
/// let store = CartStore::new(Arc::new(MemoryStorage::new()), CurrencyCode::default());
/// let sub = store.subscribe(|| println!("cart changed"));
///
/// store.add_item("p1", Variant::new("v1", "IPA 355ml", Money::from_minor(2100)));
/// assert_eq!(store.cart_count(), 1);
/// assert_eq!(store.cart_total().minor(), 2100);
///
/// sub.unsubscribe();
/// ```
pub struct CartStore {
    storage: Arc<dyn CartStorage>,
    options: StoreOptions,
    state: RwLock<Arc<CartState>>,
    mutation: Mutex<()>,
    hydration: Once,
    listeners: Arc<ListenerRegistry>,
}

impl CartStore {
    /// Creates a store over `storage` with default options and the given
    /// default currency. Nothing is read until first use.
    pub fn new(storage: Arc<dyn CartStorage>, default_currency: CurrencyCode) -> Self {
        Self::with_options(
            storage,
            StoreOptions {
                default_currency,
                ..StoreOptions::default()
            },
        )
    }

    /// Creates a store with explicit options.
    pub fn with_options(storage: Arc<dyn CartStorage>, options: StoreOptions) -> Self {
        let initial = CartState::new(options.default_currency.clone());
        CartStore {
            storage,
            options,
            state: RwLock::new(Arc::new(initial)),
            mutation: Mutex::new(()),
            hydration: Once::new(),
            listeners: Arc::new(ListenerRegistry::default()),
        }
    }

    /// Builds the configured storage backend and a store over it.
    pub fn from_config(config: &StoreConfig) -> StoreResult<Self> {
        config.validate()?;

        let storage: Arc<dyn CartStorage> = match config.storage.backend {
            StorageBackend::Memory => Arc::new(MemoryStorage::new()),
            StorageBackend::File => {
                let dir = config.storage_dir().ok_or_else(|| {
                    StoreError::InvalidConfig(
                        "file backend needs a storage dir and no platform data dir was found"
                            .into(),
                    )
                })?;
                Arc::new(FileStorage::new(dir))
            }
        };

        info!(
            backend = %config.storage.backend,
            key = %config.storage.key,
            "Cart store configured"
        );
        Ok(Self::with_options(storage, StoreOptions::from(config)))
    }

    // =========================================================================
    // Read Side
    // =========================================================================

    /// Returns the current cart, hydrating from storage on the first call.
    ///
    /// The same `Arc` is returned until the next mutation, so
    /// `Arc::ptr_eq` on two snapshots tells a listener whether anything
    /// changed.
    pub fn snapshot(&self) -> Arc<CartState> {
        self.ensure_hydrated();
        self.current()
    }

    /// Units in the cart (badge count).
    pub fn cart_count(&self) -> u64 {
        cart_count(&self.snapshot().items)
    }

    /// Cart total in minor units.
    pub fn cart_total(&self) -> Money {
        cart_total(&self.snapshot().items)
    }

    /// Count, total and currency in one read.
    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self.snapshot().as_ref())
    }

    /// Whether hydration has already run.
    pub fn is_hydrated(&self) -> bool {
        self.hydration.is_completed()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds one unit of `variant` under `product_id` (merge-on-add).
    pub fn add_item(&self, product_id: &str, variant: Variant) {
        debug!(product_id, variant_id = %variant.id, "add_item");
        self.mutate("add_item", |cart| cart.add_item(product_id, variant));
    }

    /// Adds `quantity` units with the same merge rule as [`add_item`](Self::add_item).
    pub fn add_item_with_quantity(&self, product_id: &str, variant: Variant, quantity: u32) {
        debug!(product_id, variant_id = %variant.id, quantity, "add_item_with_quantity");
        self.mutate("add_item_with_quantity", |cart| {
            cart.add_item_with_quantity(product_id, variant, quantity)
        });
    }

    /// Removes a line; absent identities are ignored.
    pub fn remove_item(&self, product_id: &str, variant_id: &str) {
        debug!(product_id, variant_id, "remove_item");
        self.mutate("remove_item", |cart| {
            cart.remove_item(product_id, variant_id);
        });
    }

    /// Sets a line's quantity; `quantity <= 0` removes it, unknown
    /// identities are ignored.
    pub fn update_quantity(&self, product_id: &str, variant_id: &str, quantity: i64) {
        debug!(product_id, variant_id, quantity, "update_quantity");
        self.mutate("update_quantity", |cart| {
            cart.update_quantity(product_id, variant_id, quantity);
        });
    }

    /// Empties the cart, keeping the currency.
    pub fn clear(&self) {
        debug!("clear");
        self.mutate("clear", CartState::clear);
    }

    /// Switches the cart currency, keeping the lines.
    pub fn set_currency(&self, currency: CurrencyCode) {
        debug!(currency = %currency, "set_currency");
        self.mutate("set_currency", |cart| cart.set_currency(currency));
    }

    // =========================================================================
    // Observation
    // =========================================================================

    /// Registers a listener called with no arguments after every mutation.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.listeners.insert(Arc::new(listener));
        Subscription::new(id, &self.listeners)
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn current(&self) -> Arc<CartState> {
        Arc::clone(&self.state.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn mutate<F>(&self, op: &'static str, f: F)
    where
        F: FnOnce(&mut CartState),
    {
        self.ensure_hydrated();

        let lines = {
            let _guard = self.mutation.lock().unwrap_or_else(PoisonError::into_inner);

            let mut next = CartState::clone(&self.current());
            f(&mut next);
            let next = Arc::new(next);

            *self.state.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&next);

            if let Err(e) = self.write_payload(&next) {
                warn!(op, error = %e, "Cart not persisted; continuing in memory");
            }
            next.items.len()
        };

        // Lock released: listeners may mutate the store again
        let notified = self.listeners.notify();
        debug!(op, lines, notified, "cart mutation applied");
    }

    /// Runs hydration exactly once. Every mutation calls this first, so
    /// persisted data can never overwrite a live mutation.
    fn ensure_hydrated(&self) {
        self.hydration.call_once(|| self.hydrate());
    }

    /// Loads the persisted cart. A panicking storage backend is treated like
    /// a read failure so the `Once` is never poisoned.
    fn hydrate(&self) {
        let key = self.options.storage_key.as_str();
        let loaded = match catch_unwind(AssertUnwindSafe(|| self.read_payload())) {
            Ok(result) => result,
            Err(_) => {
                warn!(key, "Cart storage panicked during hydration, starting empty");
                return;
            }
        };

        match loaded {
            Ok(Some(state)) => {
                info!(key, lines = state.items.len(), currency = %state.currency, "Cart hydrated");
                *self.state.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(state);
            }
            Ok(None) => debug!(key, "No persisted cart, starting empty"),
            Err(e) => warn!(key, error = %e, "Cart hydration failed, starting empty"),
        }
    }

    fn read_payload(&self) -> StoreResult<Option<CartState>> {
        match self.storage.get(&self.options.storage_key)? {
            Some(raw) => Ok(Some(persist::decode(&raw)?)),
            None => Ok(None),
        }
    }

    fn write_payload(&self, state: &CartState) -> StoreResult<()> {
        let payload = persist::encode(state)?;

        if let Some(limit) = self.options.max_payload_bytes {
            if payload.len() > limit {
                return Err(StoreError::PayloadTooLarge {
                    size: payload.len(),
                    limit,
                });
            }
        }

        self.storage.set(&self.options.storage_key, &payload)?;
        Ok(())
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("storage", &self.storage)
            .field("options", &self.options)
            .field("hydrated", &self.is_hydrated())
            .field("listeners", &self.listeners)
            .finish()
    }
}
