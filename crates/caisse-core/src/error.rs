//! # Error Types
//!
//! Domain-specific error types for caisse-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  caisse-core errors (this file)                                        │
//! │  ├── CoreError        - Cart / checkout rule violations                │
//! │  └── ValidationError  - Cashier input blocked before any network call  │
//! │                                                                         │
//! │  caisse-client errors (separate crate)                                 │
//! │  └── ClientError      - Not found, transport, server rejection         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → message on screen   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Checkout rule violations.
///
/// Every operation returning one of these leaves the state it was called on
/// unchanged.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    /// Cart already holds the maximum number of distinct lines.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// A line would exceed the per-line quantity cap.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Payment or submission attempted on an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// A search result index that is no longer in the result list.
    #[error("No search result at position {0}")]
    NoSuchResult(usize),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. a discount that is not a number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::QuantityTooLarge {
            requested: 1000,
            max: 999,
        };
        assert_eq!(err.to_string(), "Quantity 1000 exceeds maximum allowed (999)");
        assert_eq!(CoreError::EmptyCart.to_string(), "Cart is empty");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "discount".to_string(),
        };
        assert_eq!(err.to_string(), "discount is required");

        let err = ValidationError::MustBePositive {
            field: "discount".to_string(),
        };
        assert_eq!(err.to_string(), "discount must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "barcode".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
