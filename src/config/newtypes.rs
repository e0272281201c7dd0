//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated GraphQL endpoint URL.
///
/// This newtype validates that the URL uses the `http` or `https` scheme and
/// names a host. Every operation issued by a client is POSTed to this URL.
///
/// # Serialization
///
/// `EndpointUrl` serializes to and deserializes from the plain URL string:
///
/// ```rust
/// use graphql_shape::EndpointUrl;
///
/// let url = EndpointUrl::new("https://api.example.com/graphql").unwrap();
/// let json = serde_json::to_string(&url).unwrap();
/// assert_eq!(json, r#""https://api.example.com/graphql""#);
/// ```
///
/// # Example
///
/// ```rust
/// use graphql_shape::EndpointUrl;
///
/// let url = EndpointUrl::new("https://api.example.com/graphql").unwrap();
/// assert_eq!(url.scheme(), "https");
/// assert_eq!(url.host_name(), "api.example.com");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointUrl {
    url: String,
    scheme_end: usize,
    host_start: usize,
    host_end: usize,
}

impl EndpointUrl {
    /// Creates a new validated endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEndpointUrl`] if the URL has no
    /// `http`/`https` scheme or no host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into().trim().to_string();
        let invalid = || ConfigError::InvalidEndpointUrl { url: url.clone() };

        let scheme_end = url.find("://").ok_or_else(invalid)?;
        let scheme = &url[..scheme_end];
        if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
            return Err(invalid());
        }

        let host_start = scheme_end + 3;
        let remainder = &url[host_start..];
        let host_end = remainder
            .find([':', '/', '?', '#'])
            .map_or(url.len(), |i| host_start + i);

        if host_start >= host_end {
            return Err(invalid());
        }
        if url[host_start..host_end].chars().any(char::is_whitespace) {
            return Err(invalid());
        }

        Ok(Self {
            url,
            scheme_end,
            host_start,
            host_end,
        })
    }

    /// Returns the URL scheme (`http` or `https`).
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }

    /// Returns the host name portion of the URL.
    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.url[self.host_start..self.host_end]
    }
}

impl AsRef<str> for EndpointUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for EndpointUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl Serialize for EndpointUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.url)
    }
}

impl<'de> Deserialize<'de> for EndpointUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}
