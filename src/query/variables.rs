//! Operation variables and their declared GraphQL types.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::query::Shape;

/// Errors raised while adding variables.
#[derive(Debug, Error)]
pub enum VariablesError {
    /// The name is not a valid GraphQL name.
    #[error("Invalid variable name '{name}'. Names must match [_A-Za-z][_0-9A-Za-z]*.")]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// The value could not be converted to JSON.
    #[error("Failed to serialize variable '{name}': {source}")]
    Serialize {
        /// The variable being inserted.
        name: String,
        /// The underlying serialization error.
        #[source]
        source: serde_json::Error,
    },
}

/// Maps a Rust type to the GraphQL input type used in variable declarations.
///
/// Non-null by default; `Option<T>` drops the trailing `!` and `Vec<T>`
/// becomes a non-null list.
///
/// ```rust
/// use graphql_shape::query::{GraphqlType, Id};
///
/// assert_eq!(String::graphql_type(), "String!");
/// assert_eq!(<Option<i32>>::graphql_type(), "Int");
/// assert_eq!(<Vec<Id>>::graphql_type(), "[ID!]!");
/// ```
pub trait GraphqlType {
    /// The declared type, e.g. `String!` or `[Int!]`.
    fn graphql_type() -> String;
}

macro_rules! named_type {
    ($name:literal => $($ty:ty),+ $(,)?) => {
        $(
            impl GraphqlType for $ty {
                fn graphql_type() -> String {
                    concat!($name, "!").to_string()
                }
            }
        )+
    };
}

named_type!("String" => String, str);
named_type!("Boolean" => bool);
named_type!("Int" => i8, i16, i32, i64, u8, u16, u32, u64);
named_type!("Float" => f32, f64);
named_type!("ID" => Id);

impl<T: GraphqlType + ?Sized> GraphqlType for &T {
    fn graphql_type() -> String {
        T::graphql_type()
    }
}

impl<T: GraphqlType> GraphqlType for Option<T> {
    fn graphql_type() -> String {
        let inner = T::graphql_type();
        match inner.strip_suffix('!') {
            Some(nullable) => nullable.to_string(),
            None => inner,
        }
    }
}

impl<T: GraphqlType> GraphqlType for Vec<T> {
    fn graphql_type() -> String {
        format!("[{}]!", T::graphql_type())
    }
}

impl<T: GraphqlType> GraphqlType for [T] {
    fn graphql_type() -> String {
        format!("[{}]!", T::graphql_type())
    }
}

/// The GraphQL `ID` scalar.
///
/// Serializes as a plain string but declares `ID!` instead of `String!`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    /// Creates an ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl Shape for Id {
    const TYPE_NAME: &'static str = "ID";
}

impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Id {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for Id {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A variable's declared type and JSON value.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    type_name: String,
    value: Value,
}

impl Variable {
    /// The declared GraphQL type.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The JSON value sent to the server.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }
}

/// Variables of one operation, kept sorted by name.
///
/// Serializes as a JSON object of name to value.
///
/// # Example
///
/// ```rust
/// use graphql_shape::query::{Id, Variables};
///
/// let variables = Variables::new()
///     .with("id", Id::from("1"))
///     .unwrap()
///     .with("first", 10)
///     .unwrap();
///
/// assert_eq!(variables.declarations(), "$first:Int!$id:ID!");
/// assert_eq!(
///     serde_json::to_string(&variables).unwrap(),
///     r#"{"first":10,"id":"1"}"#
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Variables {
    entries: BTreeMap<String, Variable>,
}

impl Variables {
    /// Creates an empty set of variables.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Inserts a variable, deriving its declared type from `T`.
    ///
    /// Returns the previous variable with the same name, if any.
    ///
    /// # Errors
    ///
    /// Returns [`VariablesError`] if the name is invalid or the value cannot
    /// be serialized.
    pub fn insert<T>(
        &mut self,
        name: impl Into<String>,
        value: T,
    ) -> Result<Option<Variable>, VariablesError>
    where
        T: GraphqlType + Serialize,
    {
        let name = name.into();
        let value = serde_json::to_value(&value).map_err(|source| VariablesError::Serialize {
            name: name.clone(),
            source,
        })?;
        self.insert_typed(name, T::graphql_type(), value)
    }

    /// Inserts a variable with an explicit declared type, for enums, input
    /// objects and custom scalars.
    ///
    /// # Errors
    ///
    /// Returns [`VariablesError::InvalidName`] if the name is invalid.
    pub fn insert_typed(
        &mut self,
        name: impl Into<String>,
        type_name: impl Into<String>,
        value: Value,
    ) -> Result<Option<Variable>, VariablesError> {
        let name = name.into();
        if !is_valid_name(&name) {
            return Err(VariablesError::InvalidName { name });
        }
        Ok(self.entries.insert(
            name,
            Variable {
                type_name: type_name.into(),
                value,
            },
        ))
    }

    /// Builder-style [`insert`](Self::insert).
    ///
    /// # Errors
    ///
    /// See [`insert`](Self::insert).
    pub fn with<T>(mut self, name: impl Into<String>, value: T) -> Result<Self, VariablesError>
    where
        T: GraphqlType + Serialize,
    {
        self.insert(name, value)?;
        Ok(self)
    }

    /// Builder-style [`insert_typed`](Self::insert_typed).
    ///
    /// # Errors
    ///
    /// See [`insert_typed`](Self::insert_typed).
    pub fn with_typed(
        mut self,
        name: impl Into<String>,
        type_name: impl Into<String>,
        value: Value,
    ) -> Result<Self, VariablesError> {
        self.insert_typed(name, type_name, value)?;
        Ok(self)
    }

    /// Returns the variable with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.entries.get(name)
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over variables sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variable)> {
        self.entries.iter().map(|(name, var)| (name.as_str(), var))
    }

    /// Variable declarations, e.g. `$first:Int!$id:ID!`.
    ///
    /// Commas are insignificant in GraphQL and are left out.
    #[must_use]
    pub fn declarations(&self) -> String {
        self.entries
            .iter()
            .map(|(name, var)| format!("${name}:{}", var.type_name))
            .collect()
    }

    /// Variables written as inline arguments, e.g. `first:10,id:"1"`.
    #[must_use]
    pub fn inline_arguments(&self) -> String {
        let mut out = String::new();
        for (i, (name, var)) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(name);
            out.push(':');
            write_literal(&mut out, &var.value);
        }
        out
    }
}

impl Serialize for Variables {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, var) in &self.entries {
            map.serialize_entry(name, &var.value)?;
        }
        map.end()
    }
}

/// Writes a JSON value as a GraphQL input literal.
fn write_literal(out: &mut String, value: &Value) {
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            // JSON scalar syntax, including string escapes, is valid GraphQL.
            out.push_str(&value.to_string());
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_literal(out, item);
            }
            out.push(']');
        }
        Value::Object(fields) => {
            out.push('{');
            for (i, (key, item)) in fields.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(key);
                out.push(':');
                write_literal(out, item);
            }
            out.push('}');
        }
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c == '_' || c.is_ascii_alphabetic())
        && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}
