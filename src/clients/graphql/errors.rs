//! GraphQL-specific error types.
//!
//! This module contains the error returned by every
//! [`GraphqlClient`](crate::GraphqlClient) operation, and the error list a
//! server reports inside an otherwise successful HTTP response.
//!
//! # Error Handling
//!
//! - [`GraphqlError::Http`]: transport failures and non-200 statuses
//! - [`GraphqlError::Envelope`]: the body is not a valid response envelope
//! - [`GraphqlError::Response`]: the server reported one or more GraphQL errors
//! - [`GraphqlError::Decode`]: `data` does not fit the target shape
//! - [`GraphqlError::Request`]: the request envelope could not be encoded
//!
//! # Example
//!
//! ```rust,ignore
//! use graphql_shape::{GraphqlError, RequestContext};
//!
//! match client.query(&RequestContext::background(), &mut shape, &variables).await {
//!     Ok(()) => println!("Data: {shape:?}"),
//!     Err(GraphqlError::Response(errors)) => {
//!         // `shape` may still have been populated.
//!         for error in &errors {
//!             println!("GraphQL error: {}", error.message);
//!         }
//!     }
//!     Err(e) => println!("Request failed: {e}"),
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::clients::HttpError;
use crate::decode::DecodeError;

/// A source position of a GraphQL error within the request document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
}

/// One segment of an error's response path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// An object field name.
    Field(String),
    /// A list index.
    Index(u64),
}

/// One entry of a response's `errors` list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResponseError {
    /// Human readable description. Empty if the server sent none.
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    /// Where in the document the error applies.
    #[serde(default, deserialize_with = "null_as_default")]
    pub locations: Vec<Location>,
    /// Response path of the field that failed, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<PathSegment>>,
    /// Server-specific error details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Reads an explicit `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ResponseError {
    /// Creates an error with only a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
            path: None,
            extensions: None,
        }
    }
}

/// The ordered `errors` list of a GraphQL response.
///
/// Used as an error value: its message is the first entry's message. The
/// full list stays available through iteration.
///
/// # Example
///
/// ```rust
/// use graphql_shape::{ResponseError, ResponseErrors};
///
/// let errors = ResponseErrors::from(vec![
///     ResponseError::new("field not found"),
///     ResponseError::new("second problem"),
/// ]);
///
/// assert_eq!(errors.to_string(), "field not found");
/// assert_eq!(errors.len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseErrors(Vec<ResponseError>);

impl ResponseErrors {
    /// The first reported error, if any.
    #[must_use]
    pub fn first(&self) -> Option<&ResponseError> {
        self.0.first()
    }

    /// Number of reported errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the errors in server order.
    pub fn iter(&self) -> std::slice::Iter<'_, ResponseError> {
        self.0.iter()
    }

    /// Consumes the list, returning the errors.
    #[must_use]
    pub fn into_vec(self) -> Vec<ResponseError> {
        self.0
    }
}

impl From<Vec<ResponseError>> for ResponseErrors {
    fn from(errors: Vec<ResponseError>) -> Self {
        Self(errors)
    }
}

impl<'a> IntoIterator for &'a ResponseErrors {
    type Item = &'a ResponseError;
    type IntoIter = std::slice::Iter<'a, ResponseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for ResponseErrors {
    type Item = ResponseError;
    type IntoIter = std::vec::IntoIter<ResponseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for ResponseErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.first() {
            Some(error) => f.write_str(&error.message),
            None => f.write_str("GraphQL response reported an empty error list"),
        }
    }
}

impl std::error::Error for ResponseErrors {}

/// Error type for GraphQL operations.
#[derive(Debug, Error)]
pub enum GraphqlError {
    /// The exchange failed or the server answered with a non-200 status.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The response body is not a valid GraphQL response envelope.
    #[error("Failed to parse GraphQL response: {0}")]
    Envelope(#[source] serde_json::Error),

    /// The server reported GraphQL errors.
    #[error(transparent)]
    Response(#[from] ResponseErrors),

    /// The `data` payload could not be decoded into the target shape.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The request envelope could not be encoded.
    #[error("Failed to encode GraphQL request: {0}")]
    Request(#[source] serde_json::Error),
}

impl GraphqlError {
    /// The server-reported errors, if this is a [`GraphqlError::Response`].
    #[must_use]
    pub const fn response_errors(&self) -> Option<&ResponseErrors> {
        match self {
            Self::Response(errors) => Some(errors),
            _ => None,
        }
    }
}
