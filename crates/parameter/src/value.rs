//! Runtime value model: concrete types, duck-typing capabilities, and the
//! natural ordering used by bound and range checks.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;

/// Concrete type of a parameter value, used by `must_be` checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum ValueType {
    Null,
    Bool,
    Integer,
    Float,
    /// Any numeric value, integer or float.
    Number,
    String,
    List,
    Map,
}

impl ValueType {
    /// The concrete type of `value`. Never returns [`ValueType::Number`].
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(n) if n.is_f64() => Self::Float,
            Value::Number(_) => Self::Integer,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::List,
            Value::Object(_) => Self::Map,
        }
    }

    /// Whether `value` is an instance of this type.
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        let actual = Self::of(value);
        match self {
            Self::Number => matches!(actual, Self::Integer | Self::Float),
            other => *other == actual,
        }
    }

    /// String identifier for messages and logging.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Number => "number",
            Self::String => "string",
            Self::List => "list",
            Self::Map => "map",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "null" | "nil" | "nilclass" | "none" => Ok(Self::Null),
            "bool" | "boolean" | "trueclass" | "falseclass" => Ok(Self::Bool),
            "integer" | "int" | "fixnum" => Ok(Self::Integer),
            "float" | "double" => Ok(Self::Float),
            "number" | "numeric" => Ok(Self::Number),
            "string" | "str" | "text" => Ok(Self::String),
            "list" | "array" | "vec" => Ok(Self::List),
            "map" | "hash" | "object" | "dict" => Ok(Self::Map),
            _ => Err(format!("unknown value type `{s}`")),
        }
    }
}

impl TryFrom<String> for ValueType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// An operation a value must support, checked structurally.
///
/// Each capability maps to an explicit predicate over the value's shape
/// rather than to its declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Capability {
    /// Has a length: strings, lists, maps.
    Size,
    /// Can be iterated element by element: lists, maps.
    Each,
    /// Can be iterated as key/value pairs: maps.
    EachPair,
    /// Exposes its keys: maps.
    Keys,
    /// Supports indexed access: strings, lists, maps.
    Index,
    /// Has a natural ordering: numbers, strings.
    Compare,
    /// Supports `+`: numbers, strings, lists.
    Add,
}

impl Capability {
    /// Whether `value` supports this capability.
    #[must_use]
    pub fn supported_by(&self, value: &Value) -> bool {
        match self {
            Self::Size | Self::Index => {
                matches!(value, Value::String(_) | Value::Array(_) | Value::Object(_))
            }
            Self::Each => matches!(value, Value::Array(_) | Value::Object(_)),
            Self::EachPair | Self::Keys => value.is_object(),
            Self::Compare => matches!(value, Value::Number(_) | Value::String(_)),
            Self::Add => matches!(
                value,
                Value::Number(_) | Value::String(_) | Value::Array(_)
            ),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Size => "size",
            Self::Each => "each",
            Self::EachPair => "each_pair",
            Self::Keys => "keys",
            Self::Index => "index",
            Self::Compare => "compare",
            Self::Add => "add",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches(':') {
            "size" | "length" | "len" | "count" => Ok(Self::Size),
            "each" | "iter" => Ok(Self::Each),
            "each_pair" | "pairs" => Ok(Self::EachPair),
            "keys" => Ok(Self::Keys),
            "index" | "[]" => Ok(Self::Index),
            "compare" | "<=>" => Ok(Self::Compare),
            "add" | "+" => Ok(Self::Add),
            other => Err(format!("unknown capability `{other}`")),
        }
    }
}

impl TryFrom<String> for Capability {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Natural ordering of two values.
///
/// Numbers compare numerically (integers and floats may be mixed), strings
/// lexicographically. Every other pairing is incomparable.
#[must_use]
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                Some(x.cmp(&y))
            } else if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                Some(x.cmp(&y))
            } else {
                x.as_f64()?.partial_cmp(&y.as_f64()?)
            }
        }
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Equality used by discrete-set membership: numbers compare numerically.
#[must_use]
pub fn loosely_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => compare(a, b) == Some(Ordering::Equal),
        _ => a == b,
    }
}

/// Null, empty string, empty list, or empty map.
#[must_use]
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
