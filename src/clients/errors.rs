//! HTTP-level error types.
//!
//! This module contains the errors produced below the GraphQL layer: failures
//! to complete the exchange at all, and responses whose HTTP status is not
//! `200 OK`.
//!
//! # Error Handling
//!
//! - [`HttpStatusError`]: The server answered with a non-200 status
//! - [`HttpError`]: Unified error type for transport and status failures
//!
//! # Example
//!
//! ```rust,ignore
//! use graphql_shape::clients::HttpError;
//!
//! match transport.post(&ctx, url, "application/json", body).await {
//!     Ok(response) => println!("Status {}", response.code),
//!     Err(HttpError::Network(e)) => println!("Network error: {e}"),
//!     Err(HttpError::Cancelled) => println!("Cancelled"),
//!     Err(HttpError::DeadlineExceeded) => println!("Too slow"),
//!     Err(HttpError::Status(e)) => println!("Status {}: {}", e.code, e.body),
//! }
//! ```

use thiserror::Error;

/// Error returned when the server answers with a status other than `200 OK`.
///
/// The body is captured verbatim for diagnostics and is never parsed.
///
/// # Example
///
/// ```rust
/// use graphql_shape::clients::HttpStatusError;
///
/// let error = HttpStatusError {
///     code: 500,
///     status: "500 Internal Server Error".to_string(),
///     body: "internal error".to_string(),
/// };
///
/// assert_eq!(
///     error.to_string(),
///     r#"non-200 OK status code: 500 Internal Server Error body: "internal error""#
/// );
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("non-200 OK status code: {status} body: {body:?}")]
pub struct HttpStatusError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// The status line text, e.g. `500 Internal Server Error`.
    pub status: String,
    /// The raw response body.
    pub body: String,
}

/// Unified error type for HTTP-related failures.
///
/// `Network`, `Cancelled` and `DeadlineExceeded` mean no usable response was
/// received. `Status` means a response arrived but was rejected by its status.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network or connection error, including failures while reading the body.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request context was cancelled before the exchange completed.
    #[error("Request cancelled")]
    Cancelled,

    /// The request context's deadline passed before the exchange completed.
    #[error("Request deadline exceeded")]
    DeadlineExceeded,

    /// The server responded with a non-200 status.
    #[error(transparent)]
    Status(#[from] HttpStatusError),
}

impl HttpError {
    /// Returns `true` for failures where no response was received.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        !matches!(self, Self::Status(_))
    }

    /// Returns the HTTP status code, if a response was received.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status(e) => Some(e.code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error() -> HttpStatusError {
        HttpStatusError {
            code: 502,
            status: "502 Bad Gateway".to_string(),
            body: "upstream \"down\"".to_string(),
        }
    }

    #[test]
    fn test_status_error_includes_status_and_quoted_body() {
        let message = status_error().to_string();
        assert!(message.contains("502 Bad Gateway"));
        assert!(message.contains(r#""upstream \"down\"""#));
    }

    #[test]
    fn test_status_variant_is_not_transport() {
        let error = HttpError::Status(status_error());
        assert!(!error.is_transport());
        assert_eq!(error.status_code(), Some(502));
        assert_eq!(error.to_string(), status_error().to_string());
    }

    #[test]
    fn test_cancellation_variants_are_transport() {
        assert!(HttpError::Cancelled.is_transport());
        assert!(HttpError::DeadlineExceeded.is_transport());
        assert_eq!(HttpError::Cancelled.status_code(), None);
        assert_eq!(HttpError::DeadlineExceeded.to_string(), "Request deadline exceeded");
    }

    #[test]
    fn test_error_types_implement_std_error() {
        let status: &dyn std::error::Error = &status_error();
        let _ = status;

        let http: &dyn std::error::Error = &HttpError::Cancelled;
        let _ = http;
    }
}
