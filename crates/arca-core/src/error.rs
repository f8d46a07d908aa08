//! # Error Types
//!
//! Domain-specific error types for arca-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  arca-core errors (this file)                                          │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  arca-store errors (separate crate)                                    │
//! │  ├── StorageError     - Persistence medium failures                    │
//! │  └── StoreError       - Config / serialization failures                │
//! │                                                                         │
//! │  Cart operations themselves never fail: errors only appear where      │
//! │  raw input is turned into typed values (currency codes, config).      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core cart logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A currency code could not be parsed.
    ///
    /// ## When This Occurs
    /// - Config names a code that is not three ASCII letters
    /// - A persisted payload carries a corrupted currency
    #[error("Invalid currency code: '{0}'")]
    InvalidCurrency(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., currency code with digits).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
