//! Typed property values
//!
//! Every raw string entering the bootstrap (property files, system
//! properties, environment variables) is converted into a `PropertyValue`.

use std::fmt;

use serde::{Serialize, Serializer};

/// Separator used for list values
pub const LIST_SEPARATOR: char = ',';

/// String that marks an explicit absence of value
pub const NULL_VALUE: &str = "null";

/// A property value after type inference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// Plain string
    Str(String),
    /// `true` or `false`, in any case
    Bool(bool),
    /// Comma-delimited list
    List(Vec<String>),
    /// Explicit `null`
    Null,
}

impl PropertyValue {
    /// Infer the type of a raw string value.
    ///
    /// `null` (any case) is `Null`; a value containing a comma is a `List`;
    /// `true`/`false` (any case) is a `Bool`; anything else is a `Str`.
    pub fn infer(raw: &str) -> Self {
        if is_null_value(raw) {
            return PropertyValue::Null;
        }
        if is_list_value(raw) {
            return match list_value(raw) {
                Some(items) => PropertyValue::List(items),
                None => PropertyValue::Null,
            };
        }
        if is_boolean_value(raw) {
            return PropertyValue::Bool(raw.eq_ignore_ascii_case("true"));
        }
        PropertyValue::Str(raw.to_string())
    }

    /// Whether this is the explicit null value
    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    /// String form; lists are joined with `,` and `Null` has none
    pub fn as_string(&self) -> Option<String> {
        match self {
            PropertyValue::Str(s) => Some(s.clone()),
            PropertyValue::Bool(b) => Some(b.to_string()),
            PropertyValue::List(items) => Some(items.join(",")),
            PropertyValue::Null => None,
        }
    }

    /// Boolean form.
    ///
    /// Only `Bool(true)` and strings equal to `true` (any case) are true.
    pub fn as_bool(&self) -> bool {
        match self {
            PropertyValue::Bool(b) => *b,
            PropertyValue::Str(s) => s.trim().eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    /// Strict boolean form; `None` when the value is not a boolean
    pub fn to_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            PropertyValue::Str(s) if is_boolean_value(s.trim()) => {
                Some(s.trim().eq_ignore_ascii_case("true"))
            }
            _ => None,
        }
    }

    /// List form; a scalar is a one-item list and `Null` has none
    pub fn as_list(&self) -> Option<Vec<String>> {
        match self {
            PropertyValue::List(items) => Some(items.clone()),
            PropertyValue::Str(s) => Some(vec![s.clone()]),
            PropertyValue::Bool(b) => Some(vec![b.to_string()]),
            PropertyValue::Null => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_string() {
            Some(s) => write!(f, "{}", s),
            None => write!(f, "{}", NULL_VALUE),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(raw: &str) -> Self {
        PropertyValue::infer(raw)
    }
}

impl From<String> for PropertyValue {
    fn from(raw: String) -> Self {
        PropertyValue::infer(&raw)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Bool(b)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(items: Vec<String>) -> Self {
        if items.is_empty() {
            PropertyValue::Null
        } else {
            PropertyValue::List(items)
        }
    }
}

impl<T: Into<PropertyValue>> From<Option<T>> for PropertyValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(PropertyValue::Null, Into::into)
    }
}

impl Serialize for PropertyValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            PropertyValue::Str(s) => serializer.serialize_str(s),
            PropertyValue::Bool(b) => serializer.serialize_bool(*b),
            PropertyValue::List(items) => items.serialize(serializer),
            PropertyValue::Null => serializer.serialize_none(),
        }
    }
}

/// `null` in any case
pub fn is_null_value(value: &str) -> bool {
    value.eq_ignore_ascii_case(NULL_VALUE)
}

/// `true` or `false` in any case
pub fn is_boolean_value(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false")
}

/// Contains the list separator
pub fn is_list_value(value: &str) -> bool {
    value.contains(LIST_SEPARATOR)
}

/// Split a list value.
///
/// Items are trimmed and trailing empty items are dropped; `None` when
/// nothing is left.
pub fn list_value(value: &str) -> Option<Vec<String>> {
    let mut items: Vec<String> = value
        .split(LIST_SEPARATOR)
        .map(|item| item.trim().to_string())
        .collect();

    while items.last().map_or(false, |last| last.is_empty()) {
        items.pop();
    }

    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}
