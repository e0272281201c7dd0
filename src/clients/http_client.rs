//! HTTP transport for GraphQL communication.
//!
//! This module provides the [`Transport`] trait the protocol engine sends
//! through, and [`HttpClient`], its default `reqwest`-backed implementation.

use std::collections::HashMap;
use std::future::Future;

use crate::clients::errors::HttpError;
use crate::clients::http_response::HttpResponse;
use crate::config::ClientConfig;
use crate::context::RequestContext;

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Sends a single POST and returns the fully drained response.
///
/// Implementations must honour `ctx`: cancellation or deadline expiry while
/// sending or while reading the body resolves to [`HttpError::Cancelled`] or
/// [`HttpError::DeadlineExceeded`]. Any non-200 status is returned as a normal
/// [`HttpResponse`]; classifying it is the caller's job. Implementations must
/// not retry.
pub trait Transport: Send + Sync {
    /// POSTs `body` to `url` with the given `Content-Type`.
    fn post(
        &self,
        ctx: &RequestContext,
        url: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> impl Future<Output = Result<HttpResponse, HttpError>> + Send;
}

/// `reqwest`-backed [`Transport`].
///
/// The client handles:
/// - Default headers including User-Agent, Accept and configured extras
/// - Transport-level timeouts from [`ClientConfig`]
/// - Racing each exchange against the caller's [`RequestContext`]
///
/// Connection pooling and keep-alive are provided by the inner
/// `reqwest::Client`.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use graphql_shape::clients::{HttpClient, Transport};
/// use graphql_shape::{ClientConfig, EndpointUrl, RequestContext};
///
/// let config = ClientConfig::builder()
///     .endpoint(EndpointUrl::new("https://api.example.com/graphql").unwrap())
///     .build()
///     .unwrap();
/// let client = HttpClient::new(&config)?;
///
/// let response = client
///     .post(
///         &RequestContext::background(),
///         config.endpoint().as_ref(),
///         "application/json",
///         br#"{"query":"{viewer{login}}"}"#.to_vec(),
///     )
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying reqwest client cannot
    /// be created (e.g., TLS initialization failure).
    pub fn new(config: &ClientConfig) -> Result<Self, HttpError> {
        let mut builder = reqwest::Client::builder().use_rustls_tls();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self::with_client(client, config))
    }

    /// Creates a client around an existing `reqwest::Client`.
    ///
    /// Timeouts in `config` are ignored; they belong to the supplied client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, config: &ClientConfig) -> Self {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}graphql-shape v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        for (name, value) in config.headers() {
            default_headers.insert(name.clone(), value.clone());
        }

        Self {
            client,
            default_headers,
        }
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends the request and drains the body.
    async fn exchange(
        &self,
        url: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<HttpResponse, reqwest::Error> {
        let mut req_builder = self.client.post(url);
        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }
        req_builder = req_builder.header("Content-Type", content_type).body(body);

        let res = req_builder.send().await?;

        let code = res.status().as_u16();
        let status = res.status().to_string();
        let headers = Self::parse_response_headers(res.headers());
        let body = res.bytes().await?.to_vec();

        Ok(HttpResponse {
            code,
            status,
            headers,
            body,
        })
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

impl Transport for HttpClient {
    async fn post(
        &self,
        ctx: &RequestContext,
        url: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<HttpResponse, HttpError> {
        if ctx.is_cancelled() {
            return Err(HttpError::Cancelled);
        }
        if ctx.is_expired() {
            return Err(HttpError::DeadlineExceeded);
        }

        // Dropping the losing branch drops the in-flight response and its connection.
        tokio::select! {
            biased;
            () = ctx.cancelled() => Err(HttpError::Cancelled),
            () = ctx.expired() => Err(HttpError::DeadlineExceeded),
            result = self.exchange(url, content_type, body) => result.map_err(HttpError::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EndpointUrl;
    use crate::context::CancellationToken;

    fn create_test_config() -> ClientConfig {
        ClientConfig::builder()
            .endpoint(EndpointUrl::new("https://api.example.com/graphql").unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_user_agent_header_format() {
        let client = HttpClient::new(&create_test_config()).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.contains("graphql-shape v"));
        assert!(user_agent.contains("Rust"));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let config = ClientConfig::builder()
            .endpoint(EndpointUrl::new("https://api.example.com/graphql").unwrap())
            .user_agent_prefix("MyApp/1.0")
            .build()
            .unwrap();

        let client = HttpClient::new(&config).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("MyApp/1.0 | "));
        assert!(user_agent.contains("graphql-shape"));
    }

    #[test]
    fn test_accept_header_is_json() {
        let client = HttpClient::new(&create_test_config()).unwrap();

        assert_eq!(
            client.default_headers().get("Accept"),
            Some(&"application/json".to_string())
        );
    }

    #[test]
    fn test_configured_headers_are_default_headers() {
        let config = ClientConfig::builder()
            .endpoint(EndpointUrl::new("https://api.example.com/graphql").unwrap())
            .header("Authorization", "Bearer token")
            .build()
            .unwrap();

        let client = HttpClient::new(&config).unwrap();

        assert_eq!(
            client.default_headers().get("Authorization"),
            Some(&"Bearer token".to_string())
        );
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpClient>();
    }

    #[tokio::test]
    async fn test_post_with_cancelled_context_never_sends() {
        let client = HttpClient::new(&create_test_config()).unwrap();
        let token = CancellationToken::new();
        token.cancel();
        let ctx = RequestContext::background().with_cancellation(token);

        let result = client
            .post(&ctx, "http://127.0.0.1:9/graphql", "application/json", Vec::new())
            .await;

        assert!(matches!(result, Err(HttpError::Cancelled)));
    }

    #[tokio::test]
    async fn test_post_with_expired_context_never_sends() {
        let client = HttpClient::new(&create_test_config()).unwrap();
        let ctx = RequestContext::background().with_timeout(std::time::Duration::ZERO);

        let result = client
            .post(&ctx, "http://127.0.0.1:9/graphql", "application/json", Vec::new())
            .await;

        assert!(matches!(result, Err(HttpError::DeadlineExceeded)));
    }
}
