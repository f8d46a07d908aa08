//! # arca-store: Observable, Persisted Cart Store
//!
//! Wraps the pure cart logic of `arca-core` with the three things a live
//! storefront needs: lazy hydration from a key-value medium, best-effort
//! persistence after every change, and change notification.
//!
//! ## Module Organization
//! ```text
//! arca_store/
//! ├── lib.rs          ◄─── You are here (exports)
//! ├── store.rs        ◄─── CartStore: hydrate → reduce → persist → notify
//! ├── observer.rs     ◄─── Listener registry + Subscription handle
//! ├── persist.rs      ◄─── {items, currency} JSON payload
//! ├── storage/
//! │   ├── mod.rs      ◄─── CartStorage trait
//! │   ├── memory.rs   ◄─── In-memory map with quota
//! │   └── file.rs     ◄─── <dir>/<key>.json, atomic writes
//! ├── config.rs       ◄─── StoreConfig (TOML + ARCA_* env)
//! └── error.rs        ◄─── StorageError / StoreError
//! ```
//!
//! ## Failure Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Storage read fails / payload malformed ──► WARN, start from defaults  │
//! │  Storage write fails / payload too big  ──► WARN, keep in-memory state │
//! │  Listener panics                        ──► ERROR, other listeners run │
//! │                                                                         │
//! │  No cart operation ever returns an error to its caller.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod observer;
pub mod persist;
pub mod storage;
pub mod store;

pub use config::{StorageBackend, StoreConfig};
pub use error::{StorageError, StoreError, StoreResult};
pub use observer::{Listener, Subscription};
pub use storage::{CartStorage, FileStorage, MemoryStorage};
pub use store::{CartStore, StoreOptions};
