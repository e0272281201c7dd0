//! Request and response envelopes, and the strategies that interpret them.
//!
//! Both client flavours share one classification routine; what differs is
//! how a `200 OK` body is turned into a result. [`UntypedResult`] reads the
//! envelope as an open map and gives `errors` priority over `data`.
//! [`TypedResult`] reads a fixed envelope, decodes `data` into the caller's
//! shape first and only then reports `errors`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use serde_json::{Map, Value};

use crate::clients::graphql::{GraphqlError, ResponseErrors};
use crate::decode::decode_into;
use crate::query::Variables;

/// Content type of every request body.
pub(crate) const CONTENT_TYPE: &str = "application/json";

/// `{"query": ..., "variables": ...}`, with `variables` left out when empty.
#[derive(Debug, Serialize)]
pub(crate) struct RequestEnvelope<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<&'a Variables>,
}

impl<'a> RequestEnvelope<'a> {
    pub(crate) fn new(query: &'a str, variables: &'a Variables) -> Self {
        Self {
            query,
            variables: (!variables.is_empty()).then_some(variables),
        }
    }
}

/// Turns a `200 OK` response body into a call result.
pub(crate) trait ResponseStrategy {
    type Output;

    fn interpret(self, body: &[u8]) -> Result<Self::Output, GraphqlError>;
}

/// Untyped flow: `errors` wins over `data`; `data` becomes a plain map.
///
/// A `data` member that is not an object yields no result rather than an
/// error.
#[derive(Debug, Default)]
pub(crate) struct UntypedResult;

impl ResponseStrategy for UntypedResult {
    type Output = Option<Map<String, Value>>;

    fn interpret(self, body: &[u8]) -> Result<Self::Output, GraphqlError> {
        let mut envelope: Map<String, Value> =
            serde_json::from_slice(body).map_err(GraphqlError::Envelope)?;

        if let Some(errors) = envelope.remove("errors") {
            let errors: Option<ResponseErrors> =
                serde_json::from_value(errors).map_err(GraphqlError::Envelope)?;
            return Err(errors.unwrap_or_default().into());
        }

        match envelope.remove("data") {
            Some(Value::Object(data)) => Ok(Some(data)),
            _ => Ok(None),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ResponseEnvelope {
    #[serde(default)]
    data: Option<Box<RawValue>>,
    #[serde(default)]
    errors: Option<ResponseErrors>,
}

/// Typed flow: decode `data` into the target, then report `errors`.
#[derive(Debug)]
pub(crate) struct TypedResult<'a, T> {
    target: &'a mut T,
}

impl<'a, T> TypedResult<'a, T> {
    pub(crate) fn new(target: &'a mut T) -> Self {
        Self { target }
    }
}

impl<T: DeserializeOwned> ResponseStrategy for TypedResult<'_, T> {
    type Output = ();

    fn interpret(self, body: &[u8]) -> Result<(), GraphqlError> {
        let envelope: ResponseEnvelope =
            serde_json::from_slice(body).map_err(GraphqlError::Envelope)?;

        if let Some(data) = &envelope.data {
            decode_into(data, self.target)?;
        }

        match envelope.errors {
            Some(errors) if !errors.is_empty() => Err(errors.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct User {
        id: String,
        name: String,
    }

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct UserQuery {
        user: Option<User>,
    }

    // === Request Envelope ===

    #[test]
    fn test_request_envelope_omits_empty_variables() {
        let variables = Variables::new();
        let json = serde_json::to_value(RequestEnvelope::new("query Q{a}", &variables)).unwrap();

        assert_eq!(json, json!({"query": "query Q{a}"}));
    }

    #[test]
    fn test_request_envelope_includes_variables() {
        let variables = Variables::new().with("id", "1").unwrap();
        let json = serde_json::to_value(RequestEnvelope::new("query Q($id:String!){a}", &variables))
            .unwrap();

        assert_eq!(
            json,
            json!({"query": "query Q($id:String!){a}", "variables": {"id": "1"}})
        );
    }

    // === Untyped Strategy ===

    #[test]
    fn test_untyped_returns_data_map() {
        let result = UntypedResult
            .interpret(br#"{"data":{"user":{"id":"1","name":"Ann"}}}"#)
            .unwrap();

        let map = result.unwrap();
        assert_eq!(Value::Object(map), json!({"user": {"id": "1", "name": "Ann"}}));
    }

    #[test]
    fn test_untyped_errors_take_priority_over_data() {
        let error = UntypedResult
            .interpret(br#"{"data":{"user":null},"errors":[{"message":"boom"}]}"#)
            .unwrap_err();

        assert_eq!(error.to_string(), "boom");
        assert!(matches!(error, GraphqlError::Response(_)));
    }

    #[test]
    fn test_untyped_without_data_or_errors_is_none() {
        assert_eq!(UntypedResult.interpret(b"{}").unwrap(), None);
        assert_eq!(UntypedResult.interpret(br#"{"data":null}"#).unwrap(), None);
        assert_eq!(
            UntypedResult.interpret(br#"{"extensions":{"cost":1}}"#).unwrap(),
            None
        );
    }

    #[test]
    fn test_untyped_present_but_empty_errors_still_fails() {
        let error = UntypedResult
            .interpret(br#"{"data":{"a":1},"errors":[]}"#)
            .unwrap_err();

        assert!(error.response_errors().unwrap().is_empty());
    }

    #[test]
    fn test_untyped_malformed_errors_is_envelope_error() {
        let error = UntypedResult
            .interpret(br#"{"errors":"not a list"}"#)
            .unwrap_err();

        assert!(matches!(error, GraphqlError::Envelope(_)));
    }

    #[test]
    fn test_untyped_non_object_data_is_none() {
        assert_eq!(UntypedResult.interpret(br#"{"data":[1,2]}"#).unwrap(), None);
        assert_eq!(UntypedResult.interpret(br#"{"data":"oops"}"#).unwrap(), None);
    }

    #[test]
    fn test_untyped_lenient_error_entries_are_response_errors() {
        let error = UntypedResult
            .interpret(br#"{"errors":[{"message":"boom","locations":null}]}"#)
            .unwrap_err();
        assert_eq!(error.to_string(), "boom");

        let error = UntypedResult
            .interpret(br#"{"errors":[{"locations":[{"line":1,"column":1}]}]}"#)
            .unwrap_err();
        assert_eq!(error.response_errors().unwrap().len(), 1);
    }

    #[test]
    fn test_untyped_malformed_body_is_envelope_error() {
        assert!(matches!(
            UntypedResult.interpret(b"not json"),
            Err(GraphqlError::Envelope(_))
        ));
        assert!(matches!(
            UntypedResult.interpret(b"[]"),
            Err(GraphqlError::Envelope(_))
        ));
    }

    // === Typed Strategy ===

    #[test]
    fn test_typed_populates_target() {
        let mut target = UserQuery::default();
        TypedResult::new(&mut target)
            .interpret(br#"{"data":{"user":{"id":"1","name":"Ann"}}}"#)
            .unwrap();

        assert_eq!(
            target.user,
            Some(User {
                id: "1".to_string(),
                name: "Ann".to_string()
            })
        );
    }

    #[test]
    fn test_typed_partial_success_populates_and_errors() {
        let mut target = UserQuery::default();
        let error = TypedResult::new(&mut target)
            .interpret(br#"{"data":{"user":{"id":"1","name":"Ann"}},"errors":[{"message":"partial"}]}"#)
            .unwrap_err();

        assert_eq!(error.to_string(), "partial");
        assert_eq!(target.user.unwrap().name, "Ann");
    }

    #[test]
    fn test_typed_partial_success_with_null_locations() {
        let mut target = UserQuery::default();
        let error = TypedResult::new(&mut target)
            .interpret(br#"{"data":{"user":{"id":"1","name":"Ann"}},"errors":[{"message":"partial","locations":null}]}"#)
            .unwrap_err();

        assert!(matches!(error, GraphqlError::Response(_)));
        assert_eq!(error.to_string(), "partial");
        assert_eq!(target.user.unwrap().id, "1");
    }

    #[test]
    fn test_typed_errors_without_data_leave_target() {
        let mut target = UserQuery::default();
        let error = TypedResult::new(&mut target)
            .interpret(br#"{"errors":[{"message":"field not found","locations":[{"line":2,"column":5}]}]}"#)
            .unwrap_err();

        assert_eq!(error.to_string(), "field not found");
        assert_eq!(target, UserQuery::default());
    }

    #[test]
    fn test_typed_decode_failure_wins_over_errors() {
        let mut target = UserQuery::default();
        let error = TypedResult::new(&mut target)
            .interpret(br#"{"data":{"user":{"id":1}},"errors":[{"message":"ignored"}]}"#)
            .unwrap_err();

        assert!(matches!(error, GraphqlError::Decode(_)));
    }

    #[test]
    fn test_typed_empty_or_null_errors_are_success() {
        let mut target = UserQuery::default();
        TypedResult::new(&mut target)
            .interpret(br#"{"data":{"user":null},"errors":[]}"#)
            .unwrap();
        TypedResult::new(&mut target)
            .interpret(br#"{"data":null,"errors":null}"#)
            .unwrap();
        assert_eq!(target, UserQuery::default());
    }

    #[test]
    fn test_typed_malformed_body_is_envelope_error() {
        let mut target = UserQuery::default();
        let error = TypedResult::new(&mut target)
            .interpret(b"<html>")
            .unwrap_err();

        assert!(matches!(error, GraphqlError::Envelope(_)));
    }
}
