//! Result shapes and the selection sets they request.

use std::fmt;

/// A type whose structure determines a GraphQL selection set.
///
/// Leaf types (scalars) keep the default empty selection set. Object types
/// list the fields they want; those fields are written in the same order into
/// the document, and the server's response keys land on the same-named
/// fields when the shape is deserialized.
///
/// # Example
///
/// ```rust
/// use graphql_shape::query::{Field, SelectionSet, Shape};
///
/// struct User {
///     id: String,
///     name: String,
/// }
///
/// impl Shape for User {
///     const TYPE_NAME: &'static str = "User";
///
///     fn selection_set() -> SelectionSet {
///         SelectionSet::new().scalar("id").scalar("name")
///     }
/// }
///
/// struct UserQuery {
///     user: User,
/// }
///
/// impl Shape for UserQuery {
///     const TYPE_NAME: &'static str = "UserQuery";
///
///     fn selection_set() -> SelectionSet {
///         SelectionSet::new().field(Field::of::<User>("user").argument("id", "$id"))
///     }
/// }
///
/// assert_eq!(
///     UserQuery::selection_set().to_string(),
///     "{user(id:$id){id,name}}"
/// );
/// ```
pub trait Shape {
    /// GraphQL type name. Wrapped operations are named after their root shape.
    const TYPE_NAME: &'static str;

    /// Fields requested by this shape. Empty for leaf types.
    #[must_use]
    fn selection_set() -> SelectionSet {
        SelectionSet::new()
    }
}

macro_rules! leaf_shape {
    ($name:literal => $($ty:ty),+ $(,)?) => {
        $(
            impl Shape for $ty {
                const TYPE_NAME: &'static str = $name;
            }
        )+
    };
}

leaf_shape!("String" => String);
leaf_shape!("Boolean" => bool);
leaf_shape!("Int" => i8, i16, i32, i64, u8, u16, u32, u64);
leaf_shape!("Float" => f32, f64);
leaf_shape!("JSON" => serde_json::Value);

impl<T: Shape> Shape for Option<T> {
    const TYPE_NAME: &'static str = T::TYPE_NAME;

    fn selection_set() -> SelectionSet {
        T::selection_set()
    }
}

impl<T: Shape> Shape for Vec<T> {
    const TYPE_NAME: &'static str = T::TYPE_NAME;

    fn selection_set() -> SelectionSet {
        T::selection_set()
    }
}

impl<T: Shape> Shape for Box<T> {
    const TYPE_NAME: &'static str = T::TYPE_NAME;

    fn selection_set() -> SelectionSet {
        T::selection_set()
    }
}

/// A single field selection, optionally aliased and with arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    name: String,
    alias: Option<String>,
    arguments: Vec<(String, String)>,
    selection: SelectionSet,
}

impl Field {
    /// Creates a leaf field.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            arguments: Vec::new(),
            selection: SelectionSet::new(),
        }
    }

    /// Creates a field whose sub-selection is taken from `S`.
    #[must_use]
    pub fn of<S: Shape + ?Sized>(name: impl Into<String>) -> Self {
        Self {
            selection: S::selection_set(),
            ..Self::new(name)
        }
    }

    /// Requests the field under a different response key.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Adds an argument. `value` is written verbatim, e.g. `$id` or `10`.
    #[must_use]
    pub fn argument(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.arguments.push((name.into(), value.into()));
        self
    }

    /// Replaces the sub-selection.
    #[must_use]
    pub fn selection(mut self, selection: SelectionSet) -> Self {
        self.selection = selection;
        self
    }

    /// The field name as known to the schema.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The key this field appears under in the response.
    #[must_use]
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(alias) = &self.alias {
            write!(f, "{alias}:")?;
        }
        f.write_str(&self.name)?;
        if !self.arguments.is_empty() {
            f.write_str("(")?;
            for (i, (name, value)) in self.arguments.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{name}:{value}")?;
            }
            f.write_str(")")?;
        }
        if !self.selection.is_empty() {
            write!(f, "{}", self.selection)?;
        }
        Ok(())
    }
}

/// One entry of a selection set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    /// A field, possibly with its own sub-selection.
    Field(Field),
    /// `... on TypeCondition { ... }`, used for unions and interfaces.
    InlineFragment {
        /// The concrete type the fragment applies to.
        type_condition: String,
        /// Fields requested when the object has that type.
        selection: SelectionSet,
    },
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(field) => write!(f, "{field}"),
            Self::InlineFragment {
                type_condition,
                selection,
            } => write!(f, "... on {type_condition}{selection}"),
        }
    }
}

/// An ordered, minified GraphQL selection set.
///
/// Renders as `{a,b{c},... on T{d}}`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionSet {
    items: Vec<Selection>,
}

impl SelectionSet {
    /// Creates an empty selection set.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Appends a field.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.items.push(Selection::Field(field));
        self
    }

    /// Appends a leaf field.
    #[must_use]
    pub fn scalar(self, name: impl Into<String>) -> Self {
        self.field(Field::new(name))
    }

    /// Appends a field whose sub-selection comes from `S`.
    #[must_use]
    pub fn object<S: Shape + ?Sized>(self, name: impl Into<String>) -> Self {
        self.field(Field::of::<S>(name))
    }

    /// Appends `... on S::TYPE_NAME` with the selection of `S`.
    #[must_use]
    pub fn inline_fragment<S: Shape + ?Sized>(mut self) -> Self {
        self.items.push(Selection::InlineFragment {
            type_condition: S::TYPE_NAME.to_string(),
            selection: S::selection_set(),
        });
        self
    }

    /// Returns `true` if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of direct selections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterates over direct selections in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, Selection> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a SelectionSet {
    type Item = &'a Selection;
    type IntoIter = std::slice::Iter<'a, Selection>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Display for SelectionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{item}")?;
        }
        f.write_str("}")
    }
}
