//! GraphQL protocol engine.
//!
//! This module provides the GraphQL client built on top of a
//! [`Transport`](crate::clients::Transport). It derives request documents
//! from result shapes, posts them, and maps the response envelope back onto
//! the caller's types.
//!
//! # Overview
//!
//! - [`GraphqlClient`]: The client with `query_raw()`, `query()` and `mutate()`
//! - [`GraphqlError`]: Error type for GraphQL operations
//! - [`ResponseErrors`]: The `errors` list a server reports, usable as an error
//!
//! # Response Classification
//!
//! Every call goes through the same steps:
//!
//! 1. Transport failure (connection, timeout, cancellation) aborts with
//!    [`GraphqlError::Http`] before any status is seen.
//! 2. A status other than `200 OK` aborts with the status text and raw body;
//!    the body is not parsed.
//! 3. A body that is not a JSON response envelope aborts with
//!    [`GraphqlError::Envelope`].
//! 4. Otherwise `data` and `errors` are interpreted by the entry point:
//!    - `query_raw` returns the `errors` list as soon as the key is present,
//!      ignoring `data`;
//!    - `query`/`mutate` decode `data` into the target first, then return
//!      a non-empty `errors` list as the error.
//!
//! # Partial Success
//!
//! With the typed entry points a response can carry both `data` and
//! `errors`. The target is populated *and* [`GraphqlError::Response`] is
//! returned, so always check the result even when using the target.

mod client;
mod envelope;
mod errors;

pub use client::GraphqlClient;
pub use errors::{GraphqlError, Location, PathSegment, ResponseError, ResponseErrors};
