//! Client-side checks run before a request is built.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ApiError;

static CUSTOMER_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]{3,50}$").expect("customer_id pattern compiles"));

pub fn is_valid_customer_id(value: &str) -> bool {
    CUSTOMER_ID.is_match(value)
}

/// Reject a `customer_id` that the server would refuse anyway.
pub fn validate_customer_id(value: &str) -> Result<(), ApiError> {
    if is_valid_customer_id(value) {
        Ok(())
    } else {
        Err(ApiError::InvalidCustomerId {
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_allowed_characters() {
        for id in ["abc", "CUST001", "a_b-c", "___", "x".repeat(50).as_str()] {
            assert!(is_valid_customer_id(id), "{id} should be valid");
        }
    }

    #[test]
    fn rejects_length_out_of_range() {
        assert!(!is_valid_customer_id(""));
        assert!(!is_valid_customer_id("ab"));
        assert!(!is_valid_customer_id(&"x".repeat(51)));
    }

    #[test]
    fn rejects_disallowed_characters() {
        for id in ["abc def", "abc!", "客户001", "abc\n", "a.b.c", "a/bc"] {
            assert!(!is_valid_customer_id(id), "{id:?} should be invalid");
        }
    }

    #[test]
    fn validation_error_carries_value() {
        let err = validate_customer_id("no").unwrap_err();
        assert!(matches!(err, ApiError::InvalidCustomerId { ref value } if value == "no"));
    }
}
