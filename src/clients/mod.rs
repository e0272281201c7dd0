//! Client types for GraphQL communication.
//!
//! This module provides the HTTP transport layer and the GraphQL client that
//! sits on top of it.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`Transport`]: The POST boundary the GraphQL client sends through
//! - [`HttpClient`]: The default `reqwest`-backed transport
//! - [`HttpResponse`]: A fully drained response
//! - [`HttpError`]: Transport and status failures
//! - [`graphql::GraphqlClient`]: The GraphQL protocol engine
//! - [`graphql::GraphqlError`]: GraphQL-specific error types
//!
//! # Example
//!
//! ```rust,ignore
//! use graphql_shape::clients::{HttpClient, Transport};
//! use graphql_shape::{ClientConfig, EndpointUrl, RequestContext};
//!
//! let config = ClientConfig::builder()
//!     .endpoint(EndpointUrl::new("https://api.example.com/graphql").unwrap())
//!     .build()
//!     .unwrap();
//! let client = HttpClient::new(&config)?;
//!
//! let response = client
//!     .post(&RequestContext::background(), config.endpoint().as_ref(), "application/json", body)
//!     .await?;
//! ```
//!
//! # Retry Behavior
//!
//! Nothing in this module retries. A failed attempt is reported as a single
//! failure; retry policy belongs to the caller.

mod errors;
pub mod graphql;
mod http_client;
mod http_response;

pub use errors::{HttpError, HttpStatusError};
pub use http_client::{HttpClient, Transport, SDK_VERSION};
pub use http_response::HttpResponse;

// Re-export GraphQL client types at the clients module level
pub use graphql::{GraphqlClient, GraphqlError, ResponseError, ResponseErrors};
