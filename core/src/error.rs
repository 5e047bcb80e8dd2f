//! Error types for the customer API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the customer does not exist" from "the server returned an unexpected
//! status." All other non-2xx responses land in `HttpError` with the raw
//! status code and body for debugging.
//!
//! Validation failures are raised before any request leaves the process, so
//! an `InvalidCustomerId` error guarantees nothing was sent.

use thiserror::Error;

/// Human-readable rule for `customer_id`, reused in error messages.
pub const CUSTOMER_ID_RULE: &str =
    "customer_id must be 3-50 characters of letters, digits, underscores or hyphens";

/// Errors returned by the client, service and store layers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// `customer_id` failed the client-side format check.
    #[error("invalid customer_id {value:?}: {rule}", rule = CUSTOMER_ID_RULE)]
    InvalidCustomerId { value: String },

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The request never produced a response (connection refused, timeout).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// A configuration value was present but malformed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// An interceptor refused to let the request or response through.
    #[error("rejected by interceptor: {0}")]
    Intercepted(String),
}

impl ApiError {
    /// Response body carried by the error, if the server sent one.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            ApiError::HttpError { body, .. } if !body.is_empty() => Some(body),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_exposes_body() {
        let err = ApiError::HttpError {
            status: 422,
            body: r#"{"detail":"bad"}"#.to_string(),
        };
        assert_eq!(err.response_body(), Some(r#"{"detail":"bad"}"#));
        assert_eq!(err.to_string(), r#"HTTP 422: {"detail":"bad"}"#);
    }

    #[test]
    fn empty_body_is_not_reported() {
        let err = ApiError::HttpError {
            status: 500,
            body: String::new(),
        };
        assert!(err.response_body().is_none());
        assert!(ApiError::NotFound.response_body().is_none());
    }

    #[test]
    fn invalid_customer_id_message_names_the_rule() {
        let err = ApiError::InvalidCustomerId {
            value: "ab".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("\"ab\""));
        assert!(msg.contains("3-50 characters"));
    }
}
