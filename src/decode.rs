//! Structural decoding of `data` payloads into caller shapes.
//!
//! The payload of a successful response mirrors the selection set the shape
//! requested, so decoding is a plain `serde` deserialization of the raw JSON
//! into the shape's type: response keys map to fields (use
//! `#[serde(rename = "...")]` for aliases and camelCase names, and
//! `#[serde(flatten)]` for inline fragments on unions and interfaces).
//!
//! Decoding is all-or-nothing: the target is overwritten only once the whole
//! payload has been decoded, so a failure never leaves it half-written.

use serde::de::DeserializeOwned;
use serde_json::value::RawValue;
use thiserror::Error;

/// Error returned when a `data` payload does not fit the target shape.
#[derive(Debug, Error)]
#[error("Failed to decode response data into {type_name}: {source}")]
pub struct DecodeError {
    /// Rust type name of the target.
    pub type_name: &'static str,
    /// The underlying deserialization error, with line and column.
    #[source]
    pub source: serde_json::Error,
}

/// Decodes `raw` into `target`, replacing its contents on success.
///
/// On failure `target` is left untouched.
///
/// # Errors
///
/// Returns [`DecodeError`] if `raw` cannot be deserialized as `T`.
///
/// # Example
///
/// ```rust
/// use graphql_shape::decode::decode_into;
/// use serde::Deserialize;
/// use serde_json::value::RawValue;
///
/// #[derive(Debug, Default, Deserialize, PartialEq)]
/// struct User {
///     id: String,
///     name: String,
/// }
///
/// let raw = RawValue::from_string(r#"{"id":"1","name":"Ann"}"#.to_string()).unwrap();
/// let mut user = User::default();
/// decode_into(&raw, &mut user).unwrap();
/// assert_eq!(user.name, "Ann");
/// ```
pub fn decode_into<T: DeserializeOwned>(raw: &RawValue, target: &mut T) -> Result<(), DecodeError> {
    let decoded = serde_json::from_str::<T>(raw.get()).map_err(|source| DecodeError {
        type_name: std::any::type_name::<T>(),
        source,
    })?;
    *target = decoded;
    Ok(())
}
