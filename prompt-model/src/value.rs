//! Tagged value variant shared by payloads, contexts, and metadata.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Insertion-ordered string-keyed mapping of [`Value`]s.
pub type Mapping = IndexMap<String, Value>;

/// A dynamically typed value accepted as payload, context, or metadata.
///
/// The variant set is closed: every value a caller can hand the composer is
/// one of these kinds, with explicit truthiness and equality rules instead of
/// implicit coercion. Absence is represented by `Option<&Value>` at lookup
/// sites and is distinct from a present [`Value::Null`].
///
/// # Examples
///
/// ```
/// use prompt_model::Value;
///
/// let steps = Value::from(["Collect data", "Analyze"]);
/// assert!(steps.is_truthy());
///
/// let context = Value::from_iter([("locale", "pt-BR")]);
/// assert_eq!(context.as_mapping().unwrap().len(), 1);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Explicit null, rendered as nothing.
    #[default]
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Signed integer scalar.
    Int(i64),
    /// Floating-point scalar.
    Float(f64),
    /// Text scalar.
    String(String),
    /// Ordered sequence of values.
    Sequence(Vec<Value>),
    /// Unordered collection; sorted by string form before rendering.
    ///
    /// Never produced by deserialization (flat formats have no set kind) and
    /// serialized as a plain sequence.
    Set(Vec<Value>),
    /// Insertion-ordered mapping of string keys to values.
    Mapping(Mapping),
}

impl Value {
    /// Returns true under the dynamic truthiness convention: null, `false`,
    /// zero, and empty strings/containers are falsy, everything else truthy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(value) => *value,
            Self::Int(value) => *value != 0,
            Self::Float(value) => *value != 0.0,
            Self::String(value) => !value.is_empty(),
            Self::Sequence(items) | Self::Set(items) => !items.is_empty(),
            Self::Mapping(entries) => !entries.is_empty(),
        }
    }

    /// Returns true for the container kinds that render as nested lines.
    #[must_use]
    pub const fn is_nested(&self) -> bool {
        matches!(self, Self::Sequence(_) | Self::Set(_) | Self::Mapping(_))
    }

    /// Returns true for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the mapping entries when this value is a mapping.
    #[must_use]
    pub const fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Returns the text when this value is a string scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }
}

#[allow(clippy::float_cmp)]
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            // Integers and floats compare numerically, so 1 == 1.0.
            (Self::Int(a), Self::Float(b)) | (Self::Float(b), Self::Int(a)) => *b == *a as f64,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Sequence(a), Self::Sequence(b)) | (Self::Set(a), Self::Set(b)) => a == b,
            (Self::Mapping(a), Self::Mapping(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    /// The "string form" used for interpolation, scalar rendering, and
    /// deterministic set ordering. Containers display as compact JSON.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::String(value) => f.write_str(value),
            Self::Sequence(_) | Self::Set(_) | Self::Mapping(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Mapping> for Value {
    fn from(value: Mapping) -> Self {
        Self::Mapping(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Self::Sequence(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(value: [T; N]) -> Self {
        Self::Sequence(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<BTreeSet<T>> for Value {
    fn from(value: BTreeSet<T>) -> Self {
        Self::Set(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<HashSet<T>> for Value {
    fn from(value: HashSet<T>) -> Self {
        Self::Set(value.into_iter().map(Into::into).collect())
    }
}

/// Collects `(key, value)` pairs into a mapping, preserving iteration order.
impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::Mapping(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl From<serde_json::Value> for Value {
    /// Converts interchange JSON into the composer's value model. Mapping
    /// entries arrive in whatever order the [`serde_json::Value`] yields them.
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(inner) => Self::Bool(inner),
            serde_json::Value::Number(number) => number
                .as_i64()
                .map_or_else(|| Self::Float(number.as_f64().unwrap_or(0.0)), Self::Int),
            serde_json::Value::String(inner) => Self::String(inner),
            serde_json::Value::Array(items) => {
                Self::Sequence(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(entries) => Self::Mapping(
                entries
                    .into_iter()
                    .map(|(key, inner)| (key, Self::from(inner)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_containers_are_falsy() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::from(0).is_truthy());
        assert!(!Value::from(0.0).is_truthy());
        assert!(!Value::Sequence(Vec::new()).is_truthy());
        assert!(!Value::Mapping(Mapping::new()).is_truthy());
    }

    #[test]
    fn populated_values_are_truthy() {
        assert!(Value::from("x").is_truthy());
        assert!(Value::from(-1).is_truthy());
        assert!(Value::from(["a"]).is_truthy());
    }

    #[test]
    fn integers_equal_floats_with_same_magnitude() {
        assert_eq!(Value::from(1), Value::from(1.0));
        assert_ne!(Value::from(1), Value::from(1.5));
        assert_ne!(Value::from(1), Value::from(true));
    }

    #[test]
    fn sets_never_equal_sequences() {
        let items = vec![Value::from("a")];
        assert_ne!(Value::Set(items.clone()), Value::Sequence(items));
    }

    #[test]
    fn display_uses_compact_json_for_containers() {
        let value = Value::from_iter([("a", 1)]);
        assert_eq!(value.to_string(), r#"{"a":1}"#);
        assert_eq!(Value::from("text").to_string(), "text");
        assert_eq!(Value::Null.to_string(), "null");
    }

    #[test]
    fn round_trips_through_json() {
        let value = Value::from_iter([
            ("flag", Value::Bool(true)),
            ("count", Value::Int(3)),
            ("steps", Value::from(["one", "two"])),
        ]);
        let encoded = serde_json::to_string(&value).unwrap();
        let decoded: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(value, decoded);
    }

    #[test]
    fn converts_from_interchange_json() {
        let value = Value::from(serde_json::json!({"n": 2, "items": [null, "x"]}));
        let mapping = value.as_mapping().unwrap();
        assert_eq!(mapping["n"], Value::Int(2));
        assert_eq!(mapping["items"], Value::Sequence(vec![Value::Null, Value::from("x")]));
    }

    #[test]
    fn set_serializes_as_sequence() {
        let set = Value::Set(vec![Value::from("a"), Value::from("b")]);
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["a","b"]"#);
    }
}
