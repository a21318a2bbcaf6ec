//! # CSRF Token
//!
//! The backend refuses POSTs without the `X-CSRFToken` header. The token is
//! rendered into the checkout page as a hidden form field:
//!
//! ```html
//! <input type="hidden" name="csrfmiddlewaretoken" value="Xk3…">
//! ```

use lazy_static::lazy_static;
use regex::Regex;

/// Name of the hidden form field holding the token.
pub const CSRF_FIELD: &str = "csrfmiddlewaretoken";

lazy_static! {
    /// Any `<input …>` tag naming the CSRF field, attributes in any order.
    static ref CSRF_INPUT_REGEX: Regex =
        Regex::new(r#"(?is)<input\b[^>]*\bname\s*=\s*["']csrfmiddlewaretoken["'][^>]*>"#)
            .expect("Invalid regex pattern");

    static ref VALUE_ATTR_REGEX: Regex =
        Regex::new(r#"(?i)\bvalue\s*=\s*["']([^"']*)["']"#)
            .expect("Invalid regex pattern");
}

/// Finds the CSRF token in an HTML page.
///
/// Returns `None` when the field is missing or its value is empty.
pub fn extract_csrf_token(html: &str) -> Option<String> {
    let input = CSRF_INPUT_REGEX.find(html)?;
    let value = VALUE_ATTR_REGEX.captures(input.as_str())?.get(1)?.as_str();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
