//! # Storage Module
//!
//! The key-value medium the cart is persisted to.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        CartStorage backends                             │
//! │                                                                         │
//! │   CartStore ──► Arc<dyn CartStorage>                                    │
//! │                        │                                                │
//! │          ┌─────────────┴──────────────┐                                 │
//! │          ▼                            ▼                                 │
//! │  ┌────────────────┐          ┌──────────────────┐                       │
//! │  │ MemoryStorage  │          │   FileStorage    │                       │
//! │  │ HashMap + quota│          │ <dir>/<key>.json │                       │
//! │  │ (tests, SSR)   │          │ temp + rename    │                       │
//! │  └────────────────┘          └──────────────────┘                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store only ever uses one fixed key, but the trait stays key-addressed
//! so a single medium can be shared with other state.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use std::fmt::Debug;

use crate::error::StorageError;

/// A synchronous string key-value medium.
///
/// Methods take `&self`; implementations use interior mutability. Every
/// call is expected to be fast: the store calls `set` on every mutation
/// while holding its mutation lock.
pub trait CartStorage: Send + Sync + Debug {
    /// Reads the value under `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Inserts or replaces the value under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
