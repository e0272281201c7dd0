//! # graphql-shape
//!
//! A typed GraphQL client: request documents are derived from the shape of
//! the result type, and responses are decoded straight back into it.
//!
//! ## Overview
//!
//! This crate provides:
//! - Document construction from [`query::Shape`] types and [`query::Variables`]
//! - A protocol engine, [`GraphqlClient`], with typed (`query`/`mutate`) and
//!   untyped (`query_raw`) entry points
//! - Structural decoding of `data` payloads via [`decode::decode_into`]
//! - GraphQL error lists as first-class error values via [`ResponseErrors`]
//! - An async `reqwest` transport with per-call cancellation and deadlines
//! - Type-safe configuration via [`ClientConfig`] and [`ClientConfigBuilder`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use graphql_shape::query::{Field, Id, SelectionSet, Shape, Variables};
//! use graphql_shape::{ClientConfig, EndpointUrl, GraphqlClient, RequestContext};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Default, Deserialize)]
//! struct User {
//!     id: String,
//!     name: String,
//! }
//!
//! impl Shape for User {
//!     const TYPE_NAME: &'static str = "User";
//!     fn selection_set() -> SelectionSet {
//!         SelectionSet::new().scalar("id").scalar("name")
//!     }
//! }
//!
//! #[derive(Debug, Default, Deserialize)]
//! struct UserQuery {
//!     user: Option<User>,
//! }
//!
//! impl Shape for UserQuery {
//!     const TYPE_NAME: &'static str = "UserQuery";
//!     fn selection_set() -> SelectionSet {
//!         SelectionSet::new().field(Field::of::<User>("user").argument("id", "$id"))
//!     }
//! }
//!
//! let config = ClientConfig::builder()
//!     .endpoint(EndpointUrl::new("https://api.example.com/graphql").unwrap())
//!     .build()
//!     .unwrap();
//! let client = GraphqlClient::new(&config)?;
//!
//! // Sends: query UserQuery($id:ID!){user(id:$id){id,name}}
//! let mut result = UserQuery::default();
//! let variables = Variables::new().with("id", Id::from("1"))?;
//! client.query(&RequestContext::background(), &mut result, &variables).await?;
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`GraphqlError`]. Transport failures and non-200
//! statuses arrive as [`GraphqlError::Http`]; errors reported by the server in
//! the response body arrive as [`GraphqlError::Response`], whose message is
//! the first reported error's message.
//!
//! ## Logging
//!
//! The crate emits `tracing` events (operation dispatch at `debug`, non-200
//! statuses at `warn`). Install a subscriber in the application to see them.

pub mod clients;
pub mod config;
pub mod context;
pub mod decode;
pub mod error;
pub mod query;

// Re-export public types at crate root for convenience
pub use config::{ClientConfig, ClientConfigBuilder, EndpointUrl};
pub use context::{CancellationToken, RequestContext};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{HttpClient, HttpError, HttpResponse, HttpStatusError, Transport};

// Re-export GraphQL client types
pub use clients::{GraphqlClient, GraphqlError, ResponseError, ResponseErrors};

// Re-export document construction types
pub use query::{OperationKind, Variables};
