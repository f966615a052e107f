//! The write pipeline: six ordered stages, short-circuiting on the first
//! failure.
//!
//! 1. presence: `not_nil` / `not_empty`
//! 2. structure: `must_be` / `must_respond_to`, checked on the raw value
//! 3. conversion: `convert`, function or delegate method
//! 4. coercion: force into the declared [`CoercionKind`](crate::kind::CoercionKind)
//! 5. bounds: inclusive `min` / `max`
//! 6. range: interval or discrete membership
//!
//! Bounds and range always see the value after every transform.

use std::cmp::Ordering;
use std::fmt;

use serde_json::Value;

use crate::convert::ConvertTarget;
use crate::def::ParameterDescriptor;
use crate::error::ParameterError;
use crate::options::ValueRange;
use crate::value::{ValueType, compare, is_empty, loosely_equal};

/// A pipeline stage, used to label trace events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stage {
    Presence,
    Structure,
    Conversion,
    Coercion,
    Bounds,
    Range,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Presence => "presence",
            Self::Structure => "structure",
            Self::Conversion => "conversion",
            Self::Coercion => "coercion",
            Self::Bounds => "bounds",
            Self::Range => "range",
        })
    }
}

/// Run `raw` through every stage for `descriptor`.
pub fn run(
    descriptor: &ParameterDescriptor,
    raw: Value,
    target: &dyn ConvertTarget,
) -> Result<Value, ParameterError> {
    let key = descriptor.name();

    check_presence(descriptor, &raw).inspect_err(|e| rejected(key, Stage::Presence, e))?;
    check_structure(descriptor, &raw).inspect_err(|e| rejected(key, Stage::Structure, e))?;

    let converted = match descriptor.convert() {
        Some(conv) => conv
            .apply(target, raw)
            .map_err(|reason| ParameterError::invalid(key, format!("conversion failed: {reason}")))
            .inspect_err(|e| rejected(key, Stage::Conversion, e))?,
        None => raw,
    };

    let value = descriptor
        .coercion()
        .coerce(key, converted)
        .inspect_err(|e| rejected(key, Stage::Coercion, e))?;

    check_bounds(descriptor, &value).inspect_err(|e| rejected(key, Stage::Bounds, e))?;
    check_range(descriptor, &value).inspect_err(|e| rejected(key, Stage::Range, e))?;

    tracing::trace!(parameter = key, value = %value, "value accepted");
    Ok(value)
}

fn rejected(key: &str, stage: Stage, err: &ParameterError) {
    tracing::trace!(parameter = key, %stage, error = %err, "value rejected");
}

fn check_presence(d: &ParameterDescriptor, value: &Value) -> Result<(), ParameterError> {
    if d.rejects_null() && value.is_null() {
        return Err(ParameterError::invalid(d.name(), "value must not be null"));
    }
    if d.rejects_empty() && is_empty(value) {
        return Err(ParameterError::invalid(d.name(), "value must not be empty"));
    }
    Ok(())
}

fn check_structure(d: &ParameterDescriptor, value: &Value) -> Result<(), ParameterError> {
    if let Some(types) = d.allowed_types()
        && !types.iter().any(|t| t.matches(value))
    {
        let expected: Vec<&str> = types.iter().map(ValueType::as_str).collect();
        return Err(ParameterError::invalid(
            d.name(),
            format!(
                "expected one of [{}], got {}",
                expected.join(", "),
                ValueType::of(value)
            ),
        ));
    }
    if let Some(caps) = d.required_capabilities()
        && let Some(missing) = caps.iter().find(|c| !c.supported_by(value))
    {
        return Err(ParameterError::invalid(
            d.name(),
            format!("{} does not support `{missing}`", ValueType::of(value)),
        ));
    }
    Ok(())
}

fn ordering(key: &str, value: &Value, bound: &Value) -> Result<Ordering, ParameterError> {
    compare(value, bound).ok_or_else(|| {
        ParameterError::invalid(
            key,
            format!(
                "cannot compare {} with {}",
                ValueType::of(value),
                ValueType::of(bound)
            ),
        )
    })
}

fn check_bounds(d: &ParameterDescriptor, value: &Value) -> Result<(), ParameterError> {
    let key = d.name();
    if let Some(min) = d.min()
        && ordering(key, value, min)? == Ordering::Less
    {
        return Err(ParameterError::out_of_range(
            key,
            format!("{value} is below minimum {min}"),
        ));
    }
    if let Some(max) = d.max()
        && ordering(key, value, max)? == Ordering::Greater
    {
        return Err(ParameterError::out_of_range(
            key,
            format!("{value} is above maximum {max}"),
        ));
    }
    Ok(())
}

fn check_range(d: &ParameterDescriptor, value: &Value) -> Result<(), ParameterError> {
    let key = d.name();
    match d.range() {
        None => Ok(()),
        Some(ValueRange::Interval { low, high }) => {
            if ordering(key, value, low)? == Ordering::Less
                || ordering(key, value, high)? == Ordering::Greater
            {
                return Err(ParameterError::out_of_range(
                    key,
                    format!("{value} is not within {low}..={high}"),
                ));
            }
            Ok(())
        }
        Some(ValueRange::OneOf(allowed)) => {
            if allowed.iter().any(|a| loosely_equal(value, a)) {
                return Ok(());
            }
            let listed: Vec<String> = allowed.iter().map(Value::to_string).collect();
            Err(ParameterError::out_of_range(
                key,
                format!("{value} is not one of [{}]", listed.join(", ")),
            ))
        }
    }
}
