//! GraphQL document construction from result shapes.
//!
//! A document is derived from two inputs: a [`Shape`] type, whose
//! [`SelectionSet`] becomes the operation's selection, and [`Variables`],
//! whose names and declared types become the variable declarations.
//!
//! Two forms are produced:
//!
//! - **Wrapped** ([`construct_query`], [`construct_mutation`]): a named
//!   operation such as `query UserQuery($id:ID!){user(id:$id){id,name}}`,
//!   sent inside a JSON envelope alongside a separate `variables` member.
//! - **Raw** ([`construct_raw`]): no operation keyword or name, e.g.
//!   `{user(id:"1"){id,name}}`. The raw form is posted verbatim as the request
//!   body, so variable values are inlined as arguments of the named field.
//!
//! Output is minified and deterministic: the same shape and variables always
//! produce the same text.

mod selection;
mod variables;

pub use selection::{Field, Selection, SelectionSet, Shape};
pub use variables::{GraphqlType, Id, Variable, Variables, VariablesError};

use std::fmt;

/// The kind of GraphQL operation.
///
/// Subscriptions are not supported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// A read-only query.
    Query,
    /// A mutation.
    Mutation,
}

impl OperationKind {
    /// The operation keyword as written in a document.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Builds a named query operation for `S`.
///
/// ```rust
/// use graphql_shape::query::{construct_query, Field, SelectionSet, Shape, Variables, Id};
///
/// struct Viewer;
/// impl Shape for Viewer {
///     const TYPE_NAME: &'static str = "Viewer";
///     fn selection_set() -> SelectionSet {
///         SelectionSet::new().field(Field::new("node").argument("id", "$id").selection(
///             SelectionSet::new().scalar("id"),
///         ))
///     }
/// }
///
/// let variables = Variables::new().with("id", Id::from("1")).unwrap();
/// assert_eq!(
///     construct_query::<Viewer>(&variables),
///     "query Viewer($id:ID!){node(id:$id){id}}"
/// );
/// ```
#[must_use]
pub fn construct_query<S: Shape + ?Sized>(variables: &Variables) -> String {
    construct_operation::<S>(OperationKind::Query, variables)
}

/// Builds a named mutation operation for `S`.
#[must_use]
pub fn construct_mutation<S: Shape + ?Sized>(variables: &Variables) -> String {
    construct_operation::<S>(OperationKind::Mutation, variables)
}

/// Builds a named operation of the given kind for `S`.
#[must_use]
pub fn construct_operation<S: Shape + ?Sized>(kind: OperationKind, variables: &Variables) -> String {
    let selection = S::selection_set();
    if variables.is_empty() {
        format!("{kind} {}{selection}", S::TYPE_NAME)
    } else {
        format!(
            "{kind} {}({}){selection}",
            S::TYPE_NAME,
            variables.declarations()
        )
    }
}

/// Builds a raw document selecting `field_name` with `S`'s selection set.
///
/// No operation keyword, name or variable declarations are written. Each
/// variable becomes an inline argument of `field_name`.
///
/// ```rust
/// use graphql_shape::query::{construct_raw, SelectionSet, Shape, Variables};
///
/// struct Order;
/// impl Shape for Order {
///     const TYPE_NAME: &'static str = "Order";
///     fn selection_set() -> SelectionSet {
///         SelectionSet::new().scalar("id").scalar("total")
///     }
/// }
///
/// let variables = Variables::new().with("status", "OPEN").unwrap();
/// assert_eq!(
///     construct_raw::<Order>("orders", &variables),
///     r#"{orders(status:"OPEN"){id,total}}"#
/// );
/// ```
#[must_use]
pub fn construct_raw<S: Shape + ?Sized>(field_name: &str, variables: &Variables) -> String {
    let selection = S::selection_set();
    let mut document = String::from("{");
    document.push_str(field_name);
    if !variables.is_empty() {
        document.push('(');
        document.push_str(&variables.inline_arguments());
        document.push(')');
    }
    if !selection.is_empty() {
        document.push_str(&selection.to_string());
    }
    document.push('}');
    document
}
