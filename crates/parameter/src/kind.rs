use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::ParameterError;

/// The primitive shape a parameter's stored value is forced into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoercionKind {
    /// Keep whatever the pipeline produced.
    #[default]
    None,
    String,
    List,
    Map,
    Integer,
    Float,
    Boolean,
}

impl CoercionKind {
    /// The value `null` is coerced into.
    #[must_use]
    pub fn canonical_empty(&self) -> Value {
        match self {
            Self::None => Value::Null,
            Self::String => Value::String(String::new()),
            Self::List => Value::Array(Vec::new()),
            Self::Map => Value::Object(Map::new()),
            Self::Integer => Value::Number(Number::from(0)),
            Self::Float => Number::from_f64(0.0).map_or(Value::Null, Value::Number),
            Self::Boolean => Value::Bool(false),
        }
    }

    /// Force `value` into this kind's shape.
    ///
    /// `key` only labels the error.
    pub fn coerce(&self, key: &str, value: Value) -> Result<Value, ParameterError> {
        if value.is_null() {
            return Ok(self.canonical_empty());
        }
        match self {
            Self::None => Ok(value),
            Self::String => Ok(Value::String(to_text(value))),
            Self::List => Ok(to_list(value)),
            Self::Map => to_map(key, value),
            Self::Integer => to_integer(key, value),
            Self::Float => to_float(key, value),
            Self::Boolean => to_boolean(key, value),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::String => "string",
            Self::List => "list",
            Self::Map => "map",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for CoercionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoercionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "string" | "str" => Ok(Self::String),
            "list" | "array" => Ok(Self::List),
            "map" | "hash" => Ok(Self::Map),
            "integer" | "int" => Ok(Self::Integer),
            "float" => Ok(Self::Float),
            "boolean" | "bool" => Ok(Self::Boolean),
            _ => Err(format!("unknown coercion kind `{s}`")),
        }
    }
}

fn to_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn to_list(value: Value) -> Value {
    match value {
        Value::Array(_) => value,
        Value::Object(map) => Value::Array(
            map.into_iter()
                .map(|(k, v)| Value::Array(vec![Value::String(k), v]))
                .collect(),
        ),
        scalar => Value::Array(vec![scalar]),
    }
}

fn to_map(key: &str, value: Value) -> Result<Value, ParameterError> {
    let items = match value {
        Value::Object(_) => return Ok(value),
        Value::Array(items) => items,
        other => {
            return Err(ParameterError::invalid(
                key,
                format!("cannot convert {} to map", crate::value::ValueType::of(&other)),
            ));
        }
    };

    let mut map = Map::with_capacity(items.len());
    for item in items {
        let Value::Array(mut pair) = item else {
            return Err(ParameterError::invalid(key, "map entries must be [key, value] pairs"));
        };
        if pair.len() != 2 {
            return Err(ParameterError::invalid(key, "map entries must be [key, value] pairs"));
        }
        let v = pair.pop().unwrap_or(Value::Null);
        let k = match pair.pop() {
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err(ParameterError::invalid(key, "map keys must be strings or numbers")),
        };
        map.insert(k, v);
    }
    Ok(Value::Object(map))
}

fn to_integer(key: &str, value: Value) -> Result<Value, ParameterError> {
    match value {
        Value::Number(n) if n.is_f64() => n
            .as_f64()
            .and_then(truncate_to_i64)
            .map(|i| Value::Number(Number::from(i)))
            .ok_or_else(|| ParameterError::invalid(key, format!("cannot convert {n} to integer"))),
        Value::Number(_) => Ok(value),
        Value::String(s) => {
            let trimmed = s.trim();
            if let Ok(i) = trimmed.parse::<i64>() {
                return Ok(Value::Number(Number::from(i)));
            }
            if let Ok(u) = trimmed.parse::<u64>() {
                return Ok(Value::Number(Number::from(u)));
            }
            trimmed
                .parse::<f64>()
                .ok()
                .and_then(truncate_to_i64)
                .map(|i| Value::Number(Number::from(i)))
                .ok_or_else(|| ParameterError::invalid(key, format!("cannot convert \"{s}\" to integer")))
        }
        other => Err(ParameterError::invalid(
            key,
            format!("cannot convert {} to integer", crate::value::ValueType::of(&other)),
        )),
    }
}

/// Truncate toward zero; `None` when the result does not fit an `i64`.
fn truncate_to_i64(f: f64) -> Option<i64> {
    let t = f.trunc();
    // `i64::MAX as f64` rounds up to 2^63, which is itself out of range.
    (t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64).then_some(t as i64)
}

fn to_float(key: &str, value: Value) -> Result<Value, ParameterError> {
    let parsed = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| ParameterError::invalid(key, format!("cannot convert {value} to float")))
}

fn to_boolean(key: &str, value: Value) -> Result<Value, ParameterError> {
    match value {
        Value::Bool(_) => Ok(value),
        Value::Number(n) => Ok(Value::Bool(n.as_f64().is_some_and(|f| f != 0.0))),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(Value::Bool(true)),
            "false" | "no" | "off" | "0" | "" => Ok(Value::Bool(false)),
            _ => Err(ParameterError::invalid(key, format!("cannot convert \"{s}\" to boolean"))),
        },
        other => Err(ParameterError::invalid(
            key,
            format!("cannot convert {} to boolean", crate::value::ValueType::of(&other)),
        )),
    }
}
