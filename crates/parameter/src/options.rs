use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::convert::Convert;
use crate::error::ParameterError;
use crate::kind::CoercionKind;
use crate::value::{self, Capability, ValueType};

/// Inclusion constraint checked after all transforms.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RangeRepr")]
pub enum ValueRange {
    /// Inclusive interval under the value's natural ordering.
    Interval { low: Value, high: Value },
    /// Explicit set of allowed values.
    OneOf(Vec<Value>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RangeRepr {
    List(Vec<Value>),
    Bounds { min: Value, max: Value },
}

impl TryFrom<RangeRepr> for ValueRange {
    type Error = String;

    fn try_from(repr: RangeRepr) -> Result<Self, Self::Error> {
        match repr {
            RangeRepr::Bounds { min, max } => Ok(Self::Interval { low: min, high: max }),
            RangeRepr::List(values) if values.is_empty() => {
                Err("`in` needs at least one value".to_owned())
            }
            // Exactly two values are interval endpoints; use `one_of` for a
            // two-element set.
            RangeRepr::List(mut values) if values.len() == 2 => {
                let high = values.pop().unwrap_or(Value::Null);
                let low = values.pop().unwrap_or(Value::Null);
                Ok(Self::Interval { low, high })
            }
            RangeRepr::List(values) => Ok(Self::OneOf(values)),
        }
    }
}

/// Declaration options for one parameter.
///
/// Deserializes from an options map (`{"default": 3, "min": 1, ...}`) and
/// doubles as a typed builder. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParameterOptions {
    /// Value returned by reads before any write.
    pub default: Value,

    /// Free-form help text.
    pub description: Option<String>,

    /// Acceptable concrete types of the raw value.
    #[serde(deserialize_with = "one_or_many")]
    pub must_be: Option<Vec<ValueType>>,

    /// Capabilities the raw value must support.
    #[serde(deserialize_with = "one_or_many")]
    pub must_respond_to: Option<Vec<Capability>>,

    /// Block writes while the owner is locked.
    pub lockable: bool,

    /// Reject `null`.
    pub not_nil: bool,

    /// Reject `null`, `""`, `[]` and `{}`.
    pub not_empty: bool,

    pub make_string: bool,
    pub make_array: bool,
    pub make_hash: bool,
    pub make_int: bool,
    pub make_float: bool,
    pub make_bool: bool,

    /// Coercion kind by name; must agree with any `make_*` flag.
    pub coerce: Option<CoercionKind>,

    /// Inclusive lower bound.
    pub min: Option<Value>,

    /// Inclusive upper bound.
    pub max: Option<Value>,

    /// Interval (two values or `{min, max}`) or discrete set (any other count).
    #[serde(rename = "in")]
    pub range: Option<ValueRange>,

    /// Discrete set of allowed values, whatever its size.
    #[serde(deserialize_with = "one_or_many")]
    pub one_of: Option<Vec<Value>>,

    /// Conversion applied to the raw value.
    pub convert: Option<Convert>,
}

impl ParameterOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an options map. `null` yields the defaults.
    pub fn from_json(key: &str, options: Value) -> Result<Self, ParameterError> {
        if options.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(options).map_err(|e| ParameterError::declaration(key, e.to_string()))
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = value.into();
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn must_be(mut self, types: impl IntoIterator<Item = ValueType>) -> Self {
        self.must_be = Some(types.into_iter().collect());
        self
    }

    pub fn must_respond_to(mut self, caps: impl IntoIterator<Item = Capability>) -> Self {
        self.must_respond_to = Some(caps.into_iter().collect());
        self
    }

    pub fn lockable(mut self) -> Self {
        self.lockable = true;
        self
    }

    pub fn not_nil(mut self) -> Self {
        self.not_nil = true;
        self
    }

    pub fn not_empty(mut self) -> Self {
        self.not_empty = true;
        self
    }

    pub fn coerce(mut self, kind: CoercionKind) -> Self {
        self.coerce = Some(kind);
        self
    }

    pub fn min(mut self, bound: impl Into<Value>) -> Self {
        self.min = Some(bound.into());
        self
    }

    pub fn max(mut self, bound: impl Into<Value>) -> Self {
        self.max = Some(bound.into());
        self
    }

    /// Inclusive interval constraint.
    pub fn within(mut self, low: impl Into<Value>, high: impl Into<Value>) -> Self {
        self.range = Some(ValueRange::Interval {
            low: low.into(),
            high: high.into(),
        });
        self
    }

    /// Discrete membership constraint.
    pub fn one_of<V: Into<Value>>(mut self, values: impl IntoIterator<Item = V>) -> Self {
        self.one_of = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Convert with a standalone function.
    pub fn convert_with<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.convert = Some(Convert::function(f));
        self
    }

    /// Convert by invoking `method` on the owner-delegate.
    pub fn convert_by(mut self, method: impl Into<String>) -> Self {
        self.convert = Some(Convert::method(method));
        self
    }

    /// The single coercion kind the options ask for.
    pub(crate) fn coercion(&self, key: &str) -> Result<CoercionKind, ParameterError> {
        let flagged: Vec<CoercionKind> = [
            (self.make_string, CoercionKind::String),
            (self.make_array, CoercionKind::List),
            (self.make_hash, CoercionKind::Map),
            (self.make_int, CoercionKind::Integer),
            (self.make_float, CoercionKind::Float),
            (self.make_bool, CoercionKind::Boolean),
        ]
        .into_iter()
        .filter_map(|(on, kind)| on.then_some(kind))
        .chain(self.coerce.filter(|k| *k != CoercionKind::None))
        .collect();

        match flagged.as_slice() {
            [] => Ok(CoercionKind::None),
            [first, rest @ ..] if rest.iter().all(|k| k == first) => Ok(*first),
            _ => Err(ParameterError::declaration(
                key,
                format!(
                    "conflicting coercions: {}",
                    flagged.iter().map(CoercionKind::as_str).collect::<Vec<_>>().join(", ")
                ),
            )),
        }
    }

    /// The range constraint, merging `in` and `one_of`.
    pub(crate) fn value_range(&self, key: &str) -> Result<Option<ValueRange>, ParameterError> {
        match (&self.range, &self.one_of) {
            (Some(_), Some(_)) => Err(ParameterError::declaration(
                key,
                "`in` and `one_of` cannot both be set",
            )),
            (_, Some(values)) if values.is_empty() => {
                Err(ParameterError::declaration(key, "`one_of` needs at least one value"))
            }
            (_, Some(values)) => Ok(Some(ValueRange::OneOf(values.clone()))),
            (Some(ValueRange::Interval { low, high }), None) => {
                check_ordered(key, "`in`", low, high)?;
                Ok(self.range.clone())
            }
            (range, None) => Ok(range.clone()),
        }
    }

    /// `min` must not exceed `max` when both are set.
    pub(crate) fn check_bounds(&self, key: &str) -> Result<(), ParameterError> {
        match (&self.min, &self.max) {
            (Some(min), Some(max)) => check_ordered(key, "`min`/`max`", min, max),
            _ => Ok(()),
        }
    }
}

fn check_ordered(key: &str, what: &str, low: &Value, high: &Value) -> Result<(), ParameterError> {
    match value::compare(low, high) {
        Some(std::cmp::Ordering::Greater) => Err(ParameterError::declaration(
            key,
            format!("{what} lower end {low} is above upper end {high}"),
        )),
        Some(_) => Ok(()),
        None => Err(ParameterError::declaration(
            key,
            format!("{what} ends {low} and {high} cannot be compared"),
        )),
    }
}

fn one_or_many<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    // `Many` first: an untagged `One(Value)` would swallow a whole list.
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<T>),
        One(T),
    }

    Ok(
        Option::<OneOrMany<T>>::deserialize(deserializer)?.map(|v| match v {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }),
    )
}
