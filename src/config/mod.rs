//! Configuration types for the GraphQL client.
//!
//! This module provides the configuration used to construct the default
//! [`HttpClient`](crate::clients::HttpClient) transport and the
//! [`GraphqlClient`](crate::GraphqlClient) on top of it.
//!
//! # Overview
//!
//! - [`ClientConfig`]: The configuration struct holding all client settings
//! - [`ClientConfigBuilder`]: A builder for constructing [`ClientConfig`] instances
//! - [`EndpointUrl`]: A validated GraphQL endpoint URL
//!
//! # Example
//!
//! ```rust
//! use graphql_shape::{ClientConfig, EndpointUrl};
//! use std::time::Duration;
//!
//! let config = ClientConfig::builder()
//!     .endpoint(EndpointUrl::new("https://api.example.com/graphql").unwrap())
//!     .timeout(Duration::from_secs(30))
//!     .build()
//!     .unwrap();
//! ```

mod newtypes;

pub use newtypes::EndpointUrl;

use std::collections::HashMap;
use std::time::Duration;

use crate::error::ConfigError;

/// Configuration for a GraphQL client.
///
/// Only the endpoint is required. Timeouts configured here apply to every
/// request issued by the default transport; a per-call deadline can be added
/// on top through [`RequestContext`](crate::RequestContext).
///
/// # Thread Safety
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`.
///
/// # Example
///
/// ```rust
/// use graphql_shape::{ClientConfig, EndpointUrl};
///
/// let config = ClientConfig::builder()
///     .endpoint(EndpointUrl::new("https://api.example.com/graphql").unwrap())
///     .header("Authorization", "Bearer token")
///     .user_agent_prefix("MyApp/1.0")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.user_agent_prefix(), Some("MyApp/1.0"));
/// ```
#[derive(Clone, Debug)]
pub struct ClientConfig {
    endpoint: EndpointUrl,
    user_agent_prefix: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    headers: HashMap<String, String>,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the GraphQL endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &EndpointUrl {
        &self.endpoint
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the total request timeout, if configured.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the connection timeout, if configured.
    #[must_use]
    pub const fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }

    /// Returns the static headers sent with every request.
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for constructing [`ClientConfig`] instances.
///
/// # Defaults
///
/// - `timeout`: `None` (no transport-level timeout)
/// - `connect_timeout`: `None`
/// - `user_agent_prefix`: `None`
/// - `headers`: empty
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    endpoint: Option<EndpointUrl>,
    user_agent_prefix: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    headers: HashMap<String, String>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the GraphQL endpoint (required).
    #[must_use]
    pub fn endpoint(mut self, endpoint: EndpointUrl) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets the total timeout applied to each request by the transport.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Adds a static header sent with every request.
    ///
    /// Later calls with the same name replace earlier ones.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Builds the [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if no endpoint was set,
    /// or [`ConfigError::InvalidHeader`] if a header cannot be sent over HTTP.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let endpoint = self
            .endpoint
            .ok_or(ConfigError::MissingRequiredField { field: "endpoint" })?;

        for (name, value) in &self.headers {
            validate_header(name, value)?;
        }

        Ok(ClientConfig {
            endpoint,
            user_agent_prefix: self.user_agent_prefix,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            headers: self.headers,
        })
    }
}

fn validate_header(name: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidHeader {
        name: name.to_string(),
        reason: reason.to_string(),
    };
    reqwest::header::HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| invalid("not a valid header name"))?;
    reqwest::header::HeaderValue::from_str(value)
        .map_err(|_| invalid("not a valid header value"))?;
    Ok(())
}
