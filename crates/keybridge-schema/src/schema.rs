//! Schema data types.

use std::collections::BTreeMap;

use serde_json::{Number, Value};
use strum::Display;

use crate::kind::ValueKind;

/// A type tag accepted by [`Schema::Type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum TypeMarker {
    /// `true` or `false`.
    Boolean,
    /// Any JSON number.
    Number,
    /// Any JSON string.
    String,
    /// Any JSON array, whatever its elements.
    List,
    /// Any JSON object, whatever its keys.
    Mapping,
}

impl TypeMarker {
    /// The value kind this marker accepts.
    #[must_use]
    pub const fn kind(self) -> ValueKind {
        match self {
            Self::Boolean => ValueKind::Boolean,
            Self::Number => ValueKind::Number,
            Self::String => ValueKind::String,
            Self::List => ValueKind::List,
            Self::Mapping => ValueKind::Mapping,
        }
    }

    /// Whether `value` is of this marker's type.
    #[must_use]
    pub const fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Self::Boolean, Value::Bool(_))
                | (Self::Number, Value::Number(_))
                | (Self::String, Value::String(_))
                | (Self::List, Value::Array(_))
                | (Self::Mapping, Value::Object(_))
        )
    }
}

/// A primitive value a [`Schema::Literal`] pins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// `null`.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(Number),
    /// A string.
    String(String),
}

impl Literal {
    /// Converts the literal to the JSON value it stands for.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(flag) => Value::Bool(*flag),
            Self::Number(number) => Value::Number(number.clone()),
            Self::String(text) => Value::String(text.clone()),
        }
    }

    /// Whether `value` equals this literal exactly.
    #[must_use]
    pub fn is_equal_to(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Null, Value::Null) => true,
            (Self::Bool(expected), Value::Bool(found)) => expected == found,
            (Self::Number(expected), Value::Number(found)) => expected == found,
            (Self::String(expected), Value::String(found)) => expected == found,
            _ => false,
        }
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<u64> for Literal {
    fn from(value: u64) -> Self {
        Self::Number(Number::from(value))
    }
}

/// A recursive description of acceptable JSON instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schema {
    /// The instance must equal this primitive exactly.
    Literal(Literal),
    /// The instance must be a value of this type.
    Type(TypeMarker),
    /// The instance must be an array of the same length whose elements match
    /// positionally.
    Sequence(Vec<Schema>),
    /// The instance must be an object with exactly these keys, each value
    /// matching its schema.
    Mapping(BTreeMap<String, Schema>),
}

impl Schema {
    /// Builds a literal schema.
    #[must_use]
    pub fn literal(value: impl Into<Literal>) -> Self {
        Self::Literal(value.into())
    }

    /// Builds a sequence schema.
    #[must_use]
    pub fn sequence(elements: impl IntoIterator<Item = Self>) -> Self {
        Self::Sequence(elements.into_iter().collect())
    }

    /// Builds a mapping schema.
    #[must_use]
    pub fn mapping<K>(entries: impl IntoIterator<Item = (K, Self)>) -> Self
    where
        K: Into<String>,
    {
        Self::Mapping(
            entries
                .into_iter()
                .map(|(key, schema)| (key.into(), schema))
                .collect(),
        )
    }

    /// Returns the pinned literal when this schema is a [`Schema::Literal`].
    #[must_use]
    pub const fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(literal) => Some(literal),
            _ => None,
        }
    }
}

impl From<TypeMarker> for Schema {
    fn from(marker: TypeMarker) -> Self {
        Self::Type(marker)
    }
}
