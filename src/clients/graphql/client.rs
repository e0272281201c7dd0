//! GraphQL client implementation.
//!
//! This module provides the [`GraphqlClient`] type: the protocol engine that
//! builds documents from shapes, sends them through a [`Transport`], and
//! classifies the response.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::clients::graphql::envelope::{
    RequestEnvelope, ResponseStrategy, TypedResult, UntypedResult, CONTENT_TYPE,
};
use crate::clients::graphql::GraphqlError;
use crate::clients::{HttpClient, HttpError, HttpStatusError, Transport};
use crate::config::{ClientConfig, EndpointUrl};
use crate::context::RequestContext;
use crate::query::{construct_mutation, construct_query, construct_raw, OperationKind, Shape, Variables};

/// GraphQL API client.
///
/// Provides two result flavours:
///
/// - [`query_raw`](Self::query_raw): posts a raw document and returns the
///   `data` object as an untyped map.
/// - [`query`](Self::query) / [`mutate`](Self::mutate): post a named
///   operation with separate variables and decode `data` into a typed shape.
///
/// Each call performs exactly one POST to the configured endpoint. There are
/// no retries and no state shared between calls.
///
/// # Thread Safety
///
/// `GraphqlClient<HttpClient>` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use graphql_shape::{ClientConfig, EndpointUrl, GraphqlClient, RequestContext};
/// use graphql_shape::query::{Field, Id, SelectionSet, Shape, Variables};
/// use serde::Deserialize;
///
/// #[derive(Debug, Default, Deserialize)]
/// struct User {
///     id: String,
///     name: String,
/// }
///
/// impl Shape for User {
///     const TYPE_NAME: &'static str = "User";
///     fn selection_set() -> SelectionSet {
///         SelectionSet::new().scalar("id").scalar("name")
///     }
/// }
///
/// #[derive(Debug, Default, Deserialize)]
/// struct UserQuery {
///     user: Option<User>,
/// }
///
/// impl Shape for UserQuery {
///     const TYPE_NAME: &'static str = "UserQuery";
///     fn selection_set() -> SelectionSet {
///         SelectionSet::new().field(Field::of::<User>("user").argument("id", "$id"))
///     }
/// }
///
/// let config = ClientConfig::builder()
///     .endpoint(EndpointUrl::new("https://api.example.com/graphql").unwrap())
///     .build()
///     .unwrap();
/// let client = GraphqlClient::new(&config)?;
///
/// let mut result = UserQuery::default();
/// let variables = Variables::new().with("id", Id::from("1"))?;
/// client.query(&RequestContext::background(), &mut result, &variables).await?;
/// ```
#[derive(Debug, Clone)]
pub struct GraphqlClient<T = HttpClient> {
    /// The transport used to reach the endpoint.
    transport: T,
    /// The GraphQL endpoint every operation is posted to.
    endpoint: EndpointUrl,
}

// Verify GraphqlClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GraphqlClient>();
};

impl GraphqlClient<HttpClient> {
    /// Creates a client using the default `reqwest` transport.
    ///
    /// # Errors
    ///
    /// Returns [`GraphqlError::Http`] if the HTTP client cannot be created.
    pub fn new(config: &ClientConfig) -> Result<Self, GraphqlError> {
        let transport = HttpClient::new(config)?;
        Ok(Self::with_transport(config.endpoint().clone(), transport))
    }
}

impl<T: Transport> GraphqlClient<T> {
    /// Creates a client that sends through the given transport.
    #[must_use]
    pub const fn with_transport(endpoint: EndpointUrl, transport: T) -> Self {
        Self {
            transport,
            endpoint,
        }
    }

    /// Returns the endpoint this client posts to.
    #[must_use]
    pub const fn endpoint(&self) -> &EndpointUrl {
        &self.endpoint
    }

    /// Returns the underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Executes a query and returns `data` as an untyped map.
    ///
    /// The document is `{field_name(<variables inlined>){<S's selection>}}`
    /// and is sent verbatim as the request body, without a
    /// `{"query", "variables"}` envelope.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(map))` with the contents of `data`
    /// - `Ok(None)` if the response has no `errors` and `data` is missing,
    ///   null, or not an object
    ///
    /// # Errors
    ///
    /// - [`GraphqlError::Http`] for transport failures and non-200 statuses
    /// - [`GraphqlError::Envelope`] if the body or its `errors` list cannot
    ///   be parsed
    /// - [`GraphqlError::Response`] whenever the response has an `errors`
    ///   member; `data` is discarded in that case
    pub async fn query_raw<S: Shape + ?Sized>(
        &self,
        ctx: &RequestContext,
        field_name: &str,
        variables: &Variables,
    ) -> Result<Option<Map<String, Value>>, GraphqlError> {
        let document = construct_raw::<S>(field_name, variables);
        self.execute(ctx, OperationKind::Query, document.into_bytes(), UntypedResult)
            .await
    }

    /// Executes a query derived from `Q` and decodes `data` into `target`.
    ///
    /// # Errors
    ///
    /// - [`GraphqlError::Http`] for transport failures and non-200 statuses
    /// - [`GraphqlError::Envelope`] if the body is not a response envelope
    /// - [`GraphqlError::Decode`] if `data` does not fit `Q`
    /// - [`GraphqlError::Response`] if the server reported errors. `target`
    ///   has already been populated from `data` when it was present, so an
    ///   error does not imply `target` is unchanged.
    pub async fn query<Q>(
        &self,
        ctx: &RequestContext,
        target: &mut Q,
        variables: &Variables,
    ) -> Result<(), GraphqlError>
    where
        Q: Shape + DeserializeOwned,
    {
        self.do_typed(ctx, OperationKind::Query, target, variables)
            .await
    }

    /// Executes a mutation derived from `M` and decodes `data` into `target`.
    ///
    /// # Errors
    ///
    /// Same as [`query`](Self::query).
    pub async fn mutate<M>(
        &self,
        ctx: &RequestContext,
        target: &mut M,
        variables: &Variables,
    ) -> Result<(), GraphqlError>
    where
        M: Shape + DeserializeOwned,
    {
        self.do_typed(ctx, OperationKind::Mutation, target, variables)
            .await
    }

    /// Internal helper shared by the typed entry points.
    async fn do_typed<S>(
        &self,
        ctx: &RequestContext,
        kind: OperationKind,
        target: &mut S,
        variables: &Variables,
    ) -> Result<(), GraphqlError>
    where
        S: Shape + DeserializeOwned,
    {
        let document = match kind {
            OperationKind::Query => construct_query::<S>(variables),
            OperationKind::Mutation => construct_mutation::<S>(variables),
        };

        let body = serde_json::to_vec(&RequestEnvelope::new(&document, variables))
            .map_err(GraphqlError::Request)?;

        self.execute(ctx, kind, body, TypedResult::new(target)).await
    }

    /// Sends one request and classifies the response.
    async fn execute<R: ResponseStrategy>(
        &self,
        ctx: &RequestContext,
        kind: OperationKind,
        body: Vec<u8>,
        strategy: R,
    ) -> Result<R::Output, GraphqlError> {
        tracing::debug!(
            "Sending GraphQL {} to {} ({} bytes)",
            kind,
            self.endpoint,
            body.len()
        );

        let response = self
            .transport
            .post(ctx, self.endpoint.as_ref(), CONTENT_TYPE, body)
            .await?;

        if !response.is_ok() {
            tracing::warn!(
                "GraphQL {} to {} failed with status {}",
                kind,
                self.endpoint,
                response.status
            );
            return Err(HttpError::Status(HttpStatusError {
                code: response.code,
                status: response.status.clone(),
                body: response.body_text(),
            })
            .into());
        }

        let result = strategy.interpret(&response.body);
        if let Err(GraphqlError::Response(errors)) = &result {
            tracing::debug!(
                "GraphQL {} returned {} error(s): {}",
                kind,
                errors.len(),
                errors
            );
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::HttpResponse;
    use crate::query::{Field, Id, SelectionSet};
    use serde::Deserialize;
    use std::sync::Mutex;

    /// Records requests and replays a canned response.
    #[derive(Debug)]
    struct StubTransport {
        response: Result<HttpResponse, fn() -> HttpError>,
        requests: Mutex<Vec<(String, String, Vec<u8>)>>,
    }

    impl StubTransport {
        fn ok(body: &str) -> Self {
            Self::status(200, "200 OK", body)
        }

        fn status(code: u16, status: &str, body: &str) -> Self {
            Self {
                response: Ok(HttpResponse::new(code, status, body)),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing(error: fn() -> HttpError) -> Self {
            Self {
                response: Err(error),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn last_body(&self) -> String {
            let requests = self.requests.lock().unwrap();
            String::from_utf8(requests.last().unwrap().2.clone()).unwrap()
        }
    }

    impl Transport for StubTransport {
        async fn post(
            &self,
            _ctx: &RequestContext,
            url: &str,
            content_type: &str,
            body: Vec<u8>,
        ) -> Result<HttpResponse, HttpError> {
            self.requests
                .lock()
                .unwrap()
                .push((url.to_string(), content_type.to_string(), body));
            match &self.response {
                Ok(response) => Ok(response.clone()),
                Err(make_error) => Err(make_error()),
            }
        }
    }

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct User {
        id: String,
        name: String,
    }

    impl Shape for User {
        const TYPE_NAME: &'static str = "User";

        fn selection_set() -> SelectionSet {
            SelectionSet::new().scalar("id").scalar("name")
        }
    }

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct UserQuery {
        user: Option<User>,
    }

    impl Shape for UserQuery {
        const TYPE_NAME: &'static str = "UserQuery";

        fn selection_set() -> SelectionSet {
            SelectionSet::new().field(Field::of::<User>("user").argument("id", "$id"))
        }
    }

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct PingMutation {
        ping: String,
    }

    impl Shape for PingMutation {
        const TYPE_NAME: &'static str = "PingMutation";

        fn selection_set() -> SelectionSet {
            SelectionSet::new().scalar("ping")
        }
    }

    fn client(transport: StubTransport) -> GraphqlClient<StubTransport> {
        GraphqlClient::with_transport(
            EndpointUrl::new("https://api.example.com/graphql").unwrap(),
            transport,
        )
    }

    fn ctx() -> RequestContext {
        RequestContext::background()
    }

    // === Construction Tests ===

    #[test]
    fn test_graphql_client_new_uses_config_endpoint() {
        let config = ClientConfig::builder()
            .endpoint(EndpointUrl::new("https://api.example.com/graphql").unwrap())
            .build()
            .unwrap();

        let client = GraphqlClient::new(&config).unwrap();

        assert_eq!(client.endpoint().as_ref(), "https://api.example.com/graphql");
    }

    #[test]
    fn test_graphql_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GraphqlClient>();
    }

    // === Typed Flow ===

    #[tokio::test]
    async fn test_query_sends_wrapped_document_with_variables() {
        let client = client(StubTransport::ok(r#"{"data":{"user":{"id":"1","name":"Ann"}}}"#));
        let variables = Variables::new().with("id", Id::from("1")).unwrap();
        let mut target = UserQuery::default();

        client.query(&ctx(), &mut target, &variables).await.unwrap();

        let sent: Value = serde_json::from_str(&client.transport().last_body()).unwrap();
        assert_eq!(
            sent,
            serde_json::json!({
                "query": "query UserQuery($id:ID!){user(id:$id){id,name}}",
                "variables": {"id": "1"}
            })
        );
        assert_eq!(target.user.unwrap().name, "Ann");

        let requests = client.transport().requests.lock().unwrap();
        assert_eq!(requests[0].0, "https://api.example.com/graphql");
        assert_eq!(requests[0].1, "application/json");
    }

    #[tokio::test]
    async fn test_mutate_without_variables_omits_variables_key() {
        let client = client(StubTransport::ok(r#"{"data":{"ping":"pong"}}"#));
        let mut target = PingMutation::default();

        client
            .mutate(&ctx(), &mut target, &Variables::new())
            .await
            .unwrap();

        let sent: Value = serde_json::from_str(&client.transport().last_body()).unwrap();
        assert_eq!(
            sent,
            serde_json::json!({"query": "mutation PingMutation{ping}"})
        );
        assert_eq!(target.ping, "pong");
    }

    #[tokio::test]
    async fn test_typed_status_error_skips_decoding() {
        let client = client(StubTransport::status(
            500,
            "500 Internal Server Error",
            "internal error",
        ));
        let mut target = UserQuery::default();

        let error = client
            .query(&ctx(), &mut target, &Variables::new())
            .await
            .unwrap_err();

        let message = error.to_string();
        assert!(message.contains("500"));
        assert!(message.contains("internal error"));
        assert!(matches!(
            error,
            GraphqlError::Http(HttpError::Status(HttpStatusError { code: 500, .. }))
        ));
        assert_eq!(target, UserQuery::default());
    }

    #[tokio::test]
    async fn test_typed_transport_error_is_propagated() {
        let client = client(StubTransport::failing(|| HttpError::Cancelled));
        let mut target = UserQuery::default();

        let error = client
            .query(&ctx(), &mut target, &Variables::new())
            .await
            .unwrap_err();

        assert!(matches!(error, GraphqlError::Http(HttpError::Cancelled)));
    }

    // === Untyped Flow ===

    #[tokio::test]
    async fn test_query_raw_posts_raw_document() {
        let client = client(StubTransport::ok(r#"{"data":{"user":{"id":"1","name":"Ann"}}}"#));
        let variables = Variables::new().with("id", Id::from("1")).unwrap();

        let data = client
            .query_raw::<User>(&ctx(), "user", &variables)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(client.transport().last_body(), r#"{user(id:"1"){id,name}}"#);
        assert_eq!(data["user"]["name"], "Ann");
    }

    #[tokio::test]
    async fn test_query_raw_status_error() {
        let client = client(StubTransport::status(404, "404 Not Found", "nope"));

        let error = client
            .query_raw::<User>(&ctx(), "user", &Variables::new())
            .await
            .unwrap_err();

        assert_eq!(
            error.to_string(),
            r#"non-200 OK status code: 404 Not Found body: "nope""#
        );
    }

    #[tokio::test]
    async fn test_query_raw_errors_discard_data() {
        let client = client(StubTransport::ok(
            r#"{"data":{"user":{"id":"1","name":"Ann"}},"errors":[{"message":"first"},{"message":"second"}]}"#,
        ));

        let error = client
            .query_raw::<User>(&ctx(), "user", &Variables::new())
            .await
            .unwrap_err();

        assert_eq!(error.to_string(), "first");
        assert_eq!(error.response_errors().unwrap().len(), 2);
    }
}
