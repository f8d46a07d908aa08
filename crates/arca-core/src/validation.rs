//! # Validation Module
//!
//! Input checks applied at the edges (CLI arguments, configuration) before
//! raw strings reach the cart. Cart operations themselves accept anything.
//!
//! ## Usage
//! ```rust
//! use arca_core::validation::{validate_identifier, validate_storage_key};
//!
//! validate_identifier("product_id", "ipa-tropical").unwrap();
//! validate_storage_key("elarca-cart").unwrap();
//! ```

use crate::error::{CoreResult, ValidationError};
use crate::MAX_ID_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest storage key accepted; keys become file names in file-backed storage.
pub const MAX_STORAGE_KEY_LEN: usize = 64;

/// Validates a product or variant identifier.
///
/// ## Rules
/// - Must not be empty or whitespace
/// - At most [`MAX_ID_LEN`] characters
/// - No control characters
pub fn validate_identifier(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_ID_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_ID_LEN,
        });
    }

    if value.chars().any(char::is_control) {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must not contain control characters".to_string(),
        });
    }

    Ok(())
}

/// Validates both halves of a line identity before it reaches the cart.
///
/// ## Example
/// ```rust
/// use arca_core::validation::validate_line_identity;
/// use arca_core::CoreError;
///
/// assert!(validate_line_identity("p1", "v1").is_ok());
/// assert!(matches!(validate_line_identity("p1", ""), Err(CoreError::Validation(_))));
/// ```
pub fn validate_line_identity(product_id: &str, variant_id: &str) -> CoreResult<()> {
    validate_identifier("product_id", product_id)?;
    validate_identifier("variant_id", variant_id)?;
    Ok(())
}

/// Validates the key the cart payload is stored under.
///
/// ## Rules
/// - Must not be empty
/// - At most [`MAX_STORAGE_KEY_LEN`] characters
/// - Only ASCII letters, digits, `-`, `_` and `.`, and not starting with `.`
///
/// ## Example
/// ```rust
/// use arca_core::validation::validate_storage_key;
///
/// assert!(validate_storage_key("elarca-cart").is_ok());
/// assert!(validate_storage_key("../etc/passwd").is_err());
/// ```
pub fn validate_storage_key(key: &str) -> ValidationResult<()> {
    if key.is_empty() {
        return Err(ValidationError::Required {
            field: "storage_key".to_string(),
        });
    }

    if key.len() > MAX_STORAGE_KEY_LEN {
        return Err(ValidationError::TooLong {
            field: "storage_key".to_string(),
            max: MAX_STORAGE_KEY_LEN,
        });
    }

    let valid_chars = key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.');
    if !valid_chars || key.starts_with('.') {
        return Err(ValidationError::InvalidFormat {
            field: "storage_key".to_string(),
            reason: "must contain only letters, numbers, '-', '_' and '.', and not start with '.'"
                .to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("product_id", "p1").is_ok());
        assert!(validate_identifier("product_id", "cerveza-ámbar").is_ok());
        assert!(matches!(
            validate_identifier("product_id", "  "),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_identifier("variant_id", &"x".repeat(MAX_ID_LEN + 1)),
            Err(ValidationError::TooLong { .. })
        ));
        assert!(matches!(
            validate_identifier("variant_id", "v\n1"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_validate_line_identity() {
        use crate::error::CoreError;

        assert!(validate_line_identity("p1", "v1").is_ok());
        assert!(matches!(
            validate_line_identity(" ", "v1"),
            Err(CoreError::Validation(ValidationError::Required { ref field })) if field == "product_id"
        ));
        assert!(matches!(
            validate_line_identity("p1", "v\u{7}"),
            Err(CoreError::Validation(ValidationError::InvalidFormat { ref field, .. })) if field == "variant_id"
        ));
    }

    #[test]
    fn test_validate_storage_key() {
        assert!(validate_storage_key("elarca-cart").is_ok());
        assert!(validate_storage_key("cart_v1.json").is_ok());
        assert!(validate_storage_key("").is_err());
        assert!(validate_storage_key(".hidden").is_err());
        assert!(validate_storage_key("a/b").is_err());
        assert!(validate_storage_key(&"k".repeat(MAX_STORAGE_KEY_LEN + 1)).is_err());
    }
}
