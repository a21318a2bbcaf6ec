//! # Validation Module
//!
//! Checks on cashier input, run before any state change or network call.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: THIS MODULE (local, immediate)                               │
//! │  ├── Empty / blank input                                               │
//! │  ├── Non-positive discounts                                            │
//! │  └── Field lengths the backend would truncate                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Backend (authoritative)                                      │
//! │  ├── Article exists and is active                                      │
//! │  └── Stock is sufficient                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest search query sent to the backend.
pub const MAX_QUERY_LEN: usize = 100;

/// Longest barcode accepted (backend column width).
pub const MAX_BARCODE_LEN: usize = 50;

/// Longest client name accepted (backend column width).
pub const MAX_CLIENT_NAME_LEN: usize = 100;

/// Validates a search query.
///
/// Empty is allowed: it asks the backend for the whole catalog.
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

/// Validates a scanned or typed barcode.
///
/// ```rust
/// use caisse_core::validation::validate_barcode;
///
/// assert_eq!(validate_barcode(" 3760123450001 ").unwrap(), "3760123450001");
/// assert!(validate_barcode("   ").is_err());
/// ```
pub fn validate_barcode(barcode: &str) -> ValidationResult<String> {
    let barcode = barcode.trim();

    if barcode.is_empty() {
        return Err(ValidationError::Required {
            field: "barcode".to_string(),
        });
    }

    if barcode.chars().count() > MAX_BARCODE_LEN {
        return Err(ValidationError::TooLong {
            field: "barcode".to_string(),
            max: MAX_BARCODE_LEN,
        });
    }

    Ok(barcode.to_string())
}

/// Validates the optional client name. Blank means anonymous.
///
/// ## Returns
/// The trimmed name (possibly empty).
pub fn validate_client_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.chars().count() > MAX_CLIENT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "client_name".to_string(),
            max: MAX_CLIENT_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Parses a discount value typed by the cashier.
///
/// Accepts a comma as decimal separator (`"12,5"`).
///
/// ## Rules
/// - Must not be blank
/// - Must be a finite number
/// - Must be strictly positive
pub fn parse_discount_value(input: &str) -> ValidationResult<f64> {
    let input = input.trim();

    if input.is_empty() {
        return Err(ValidationError::Required {
            field: "discount".to_string(),
        });
    }

    let value: f64 = input
        .replace(',', ".")
        .parse()
        .map_err(|_| ValidationError::InvalidFormat {
            field: "discount".to_string(),
            reason: format!("'{}' is not a number", input),
        })?;

    validate_discount_value(value)?;
    Ok(value)
}

/// Validates a numeric discount value.
pub fn validate_discount_value(value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "discount".to_string(),
            reason: "must be a finite number".to_string(),
        });
    }

    if value <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "discount".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  pain ").unwrap(), "pain");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"a".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_barcode() {
        assert!(validate_barcode("3760123450001").is_ok());
        assert!(validate_barcode("").is_err());
        assert!(validate_barcode(&"9".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_client_name() {
        assert_eq!(validate_client_name("  Awa Diop ").unwrap(), "Awa Diop");
        assert_eq!(validate_client_name("").unwrap(), "");
        assert!(validate_client_name(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_parse_discount_value() {
        assert_eq!(parse_discount_value("10").unwrap(), 10.0);
        assert_eq!(parse_discount_value("12,5").unwrap(), 12.5);

        assert!(matches!(
            parse_discount_value(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            parse_discount_value("0"),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            parse_discount_value("-5"),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            parse_discount_value("dix"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(parse_discount_value("inf").is_err());
    }
}
