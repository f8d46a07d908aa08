//! # Store Error Types
//!
//! Error types for persistence and configuration.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Store Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  StorageError   │  │    Payload      │  │     Configuration       │ │
//! │  │  (medium)       │  │                 │  │                         │ │
//! │  │  Io             │  │  Serialization  │  │  InvalidConfig          │ │
//! │  │  QuotaExceeded  │  │  PayloadTooLarge│  │  ConfigLoadFailed       │ │
//! │  │  Unavailable    │  │                 │  │  ConfigSaveFailed       │ │
//! │  │  InvalidKey     │  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Storage and payload errors never escape CartStore operations: they    │
//! │  are logged at WARN and the store keeps working in memory.             │
//! │  Configuration errors are returned from StoreConfig / from_config.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use arca_core::CoreError;
use thiserror::Error;

/// Result type alias for store operations that can fail.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Storage Error
// =============================================================================

/// Failures reported by a [`CartStorage`](crate::storage::CartStorage) medium.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying file system error.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The medium refused the write because it is full.
    ///
    /// ## When This Occurs
    /// - Browser-style quota exhausted
    /// - A configured memory quota is smaller than the payload
    #[error("Storage quota exceeded: {needed} bytes needed, {quota} bytes allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    /// The medium cannot be used right now (locked, disabled, poisoned).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The key cannot be mapped onto the medium.
    #[error("Invalid storage key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },
}

// =============================================================================
// Store Error
// =============================================================================

/// Store-level error type.
#[derive(Debug, Error)]
pub enum StoreError {
    // =========================================================================
    // Persistence Errors
    // =========================================================================
    /// The storage medium failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The payload could not be encoded or decoded.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// The encoded payload is over the configured size limit.
    #[error("Cart payload is {size} bytes, limit is {limit} bytes")]
    PayloadTooLarge { size: usize, limit: usize },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid store configuration.
    #[error("Invalid store configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    /// Domain error from arca-core.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for StoreError {
    fn from(err: toml::de::Error) -> Self {
        StoreError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for StoreError {
    fn from(err: toml::ser::Error) -> Self {
        StoreError::ConfigSaveFailed(err.to_string())
    }
}

impl StoreError {
    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            StoreError::InvalidConfig(_)
                | StoreError::ConfigLoadFailed(_)
                | StoreError::ConfigSaveFailed(_)
                | StoreError::Core(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::PayloadTooLarge {
            size: 2048,
            limit: 1024,
        };
        assert_eq!(err.to_string(), "Cart payload is 2048 bytes, limit is 1024 bytes");

        let err: StoreError = StorageError::QuotaExceeded {
            needed: 10,
            quota: 5,
        }
        .into();
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn test_config_error_categorization() {
        assert!(StoreError::InvalidConfig("bad".into()).is_config_error());
        assert!(StoreError::ConfigLoadFailed("missing".into()).is_config_error());
        assert!(!StoreError::Serialization("eof".into()).is_config_error());
        assert!(!StoreError::Storage(StorageError::Unavailable("x".into())).is_config_error());
    }

    #[test]
    fn test_json_error_converts() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let store_err: StoreError = err.into();
        assert!(matches!(store_err, StoreError::Serialization(_)));
    }
}
