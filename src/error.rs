//! Configuration error types for the GraphQL client.
//!
//! This module contains the error type returned while building a
//! [`ClientConfig`](crate::ClientConfig) and validating its values.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use graphql_shape::{ConfigError, EndpointUrl};
//!
//! let result = EndpointUrl::new("");
//! assert!(matches!(result, Err(ConfigError::InvalidEndpointUrl { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur while configuring the client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The GraphQL endpoint URL is invalid.
    #[error("Invalid endpoint URL '{url}'. Please provide an http(s) URL (e.g., 'https://api.example.com/graphql').")]
    InvalidEndpointUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A header name or value cannot be sent over HTTP.
    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader {
        /// The offending header name.
        name: String,
        /// Why the header was rejected.
        reason: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_endpoint_error_message() {
        let error = ConfigError::InvalidEndpointUrl {
            url: "ftp://nope".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("ftp://nope"));
        assert!(message.contains("http(s) URL"));
    }

    #[test]
    fn test_missing_required_field_error_message() {
        let error = ConfigError::MissingRequiredField { field: "endpoint" };
        let message = error.to_string();
        assert!(message.contains("endpoint"));
        assert!(message.contains("must be set"));
    }

    #[test]
    fn test_invalid_header_error_message() {
        let error = ConfigError::InvalidHeader {
            name: "X-Bad".to_string(),
            reason: "contains a newline".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid header 'X-Bad': contains a newline");
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::MissingRequiredField { field: "endpoint" };
        let _: &dyn std::error::Error = &error;
    }
}
