//! Untyped document tree handed from the parsers to the validator.

use std::collections::BTreeMap;

/// A parsed document before schema validation.
///
/// Keys iterate in sorted order regardless of source order, so both input
/// formats present the same view to the validator.
pub type RawDocument = BTreeMap<String, RawValue>;

/// One value in a [`RawDocument`].
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// `true` / `false`.
    Bool(bool),
    /// Signed integer.
    Integer(i64),
    /// Integer literal outside the `i64` range, as canonical decimal digits.
    OversizedInteger(String),
    /// Explicit null (`null` or `~`).
    Null,
    /// Any string scalar.
    String(String),
    /// Nested mapping.
    Map(RawDocument),
    /// Floating point number (TOML only).
    Float(f64),
    /// Date/time in its canonical text form (TOML only).
    Datetime(String),
    /// Array (TOML only).
    Array(Vec<RawValue>),
}

impl RawValue {
    /// Name of the value's type as shown in diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            RawValue::Bool(_) => "boolean",
            RawValue::Integer(_) | RawValue::OversizedInteger(_) => "integer",
            RawValue::Null => "null",
            RawValue::String(_) => "string",
            RawValue::Map(_) => "object",
            RawValue::Float(_) => "float",
            RawValue::Datetime(_) => "datetime",
            RawValue::Array(_) => "array",
        }
    }

    /// Whether this is an explicit null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    /// The nested mapping, if this is one.
    #[must_use]
    pub fn as_map(&self) -> Option<&RawDocument> {
        match self {
            RawValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// The string, if this is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RawValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The boolean, if this is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RawValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer, if this is one. Booleans are never integers.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            RawValue::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::String(value.to_string())
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Bool(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Integer(value)
    }
}

impl From<RawDocument> for RawValue {
    fn from(value: RawDocument) -> Self {
        RawValue::Map(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(RawValue::Bool(true).type_name(), "boolean");
        assert_eq!(RawValue::Integer(1).type_name(), "integer");
        assert_eq!(RawValue::OversizedInteger("1".repeat(30)).type_name(), "integer");
        assert_eq!(RawValue::Null.type_name(), "null");
        assert_eq!(RawValue::from("x").type_name(), "string");
        assert_eq!(RawValue::Map(RawDocument::new()).type_name(), "object");
        assert_eq!(RawValue::Array(vec![]).type_name(), "array");
    }

    #[test]
    fn test_bool_is_not_integer() {
        assert_eq!(RawValue::Bool(true).as_integer(), None);
        assert_eq!(RawValue::Integer(1).as_bool(), None);
    }
}
