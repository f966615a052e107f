use serde_json::Value;

use crate::convert::{Convert, ConvertTarget};
use crate::error::ParameterError;
use crate::kind::CoercionKind;
use crate::options::{ParameterOptions, ValueRange};
use crate::validation;
use crate::value::{Capability, ValueType};

/// Immutable validation and coercion rules for one parameter.
///
/// Built from [`ParameterOptions`] at declaration time; every write to the
/// parameter runs through [`validate`](Self::validate).
#[derive(Debug, Clone)]
pub struct ParameterDescriptor {
    name: String,
    description: Option<String>,
    default: Value,
    allowed_types: Option<Vec<ValueType>>,
    required_capabilities: Option<Vec<Capability>>,
    lockable: bool,
    reject_null: bool,
    reject_empty: bool,
    coercion: CoercionKind,
    min: Option<Value>,
    max: Option<Value>,
    range: Option<ValueRange>,
    convert: Option<Convert>,
}

impl ParameterDescriptor {
    /// Validate `name` and `options` and freeze them into a descriptor.
    pub fn new(name: impl Into<String>, options: ParameterOptions) -> Result<Self, ParameterError> {
        let name = name.into();
        validate_name(&name)?;

        let coercion = options.coercion(&name)?;
        let range = options.value_range(&name)?;
        options.check_bounds(&name)?;

        Ok(Self {
            coercion,
            range,
            name,
            description: options.description,
            default: options.default,
            allowed_types: options.must_be,
            required_capabilities: options.must_respond_to,
            lockable: options.lockable,
            reject_null: options.not_nil,
            reject_empty: options.not_empty,
            min: options.min,
            max: options.max,
            convert: options.convert,
        })
    }

    /// Run `raw` through the validation/coercion pipeline.
    ///
    /// `target` resolves a by-name conversion.
    pub fn validate(&self, raw: Value, target: &dyn ConvertTarget) -> Result<Value, ParameterError> {
        validation::run(self, raw, target)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn default_value(&self) -> &Value {
        &self.default
    }

    #[must_use]
    pub fn allowed_types(&self) -> Option<&[ValueType]> {
        self.allowed_types.as_deref()
    }

    #[must_use]
    pub fn required_capabilities(&self) -> Option<&[Capability]> {
        self.required_capabilities.as_deref()
    }

    #[must_use]
    pub fn is_lockable(&self) -> bool {
        self.lockable
    }

    #[must_use]
    pub fn rejects_null(&self) -> bool {
        self.reject_null
    }

    #[must_use]
    pub fn rejects_empty(&self) -> bool {
        self.reject_empty
    }

    #[must_use]
    pub fn coercion(&self) -> CoercionKind {
        self.coercion
    }

    #[must_use]
    pub fn min(&self) -> Option<&Value> {
        self.min.as_ref()
    }

    #[must_use]
    pub fn max(&self) -> Option<&Value> {
        self.max.as_ref()
    }

    #[must_use]
    pub fn range(&self) -> Option<&ValueRange> {
        self.range.as_ref()
    }

    #[must_use]
    pub fn convert(&self) -> Option<&Convert> {
        self.convert.as_ref()
    }
}

/// Names are identifiers: `[A-Za-z_][A-Za-z0-9_]*`.
fn validate_name(name: &str) -> Result<(), ParameterError> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(ParameterError::declaration(name, "name must not be empty"));
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(ParameterError::declaration(
            name,
            "name must start with a letter or underscore",
        ));
    }
    if let Some(bad) = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
        return Err(ParameterError::declaration(
            name,
            format!("name contains invalid character `{bad}`"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn options_map_onto_descriptor() {
        let d = ParameterDescriptor::new(
            "count",
            ParameterOptions::new()
                .with_default(10)
                .lockable()
                .not_nil()
                .coerce(CoercionKind::Integer)
                .min(1)
                .within(1, 100),
        )
        .unwrap();

        assert_eq!(d.name(), "count");
        assert_eq!(d.default_value(), &json!(10));
        assert!(d.is_lockable());
        assert!(d.rejects_null());
        assert!(!d.rejects_empty());
        assert_eq!(d.coercion(), CoercionKind::Integer);
        assert_eq!(d.min(), Some(&json!(1)));
        assert!(d.max().is_none());
        assert!(matches!(d.range(), Some(ValueRange::Interval { .. })));
    }

    #[test]
    fn default_is_null_when_unset() {
        let d = ParameterDescriptor::new("p", ParameterOptions::new()).unwrap();
        assert_eq!(d.default_value(), &Value::Null);
        assert_eq!(d.coercion(), CoercionKind::None);
    }

    #[test]
    fn invalid_names_are_rejected() {
        for bad in ["", "1abc", "with space", "dash-ed"] {
            let err = ParameterDescriptor::new(bad, ParameterOptions::new()).unwrap_err();
            assert_eq!(err.code(), "PARAM_INVALID_DECLARATION", "name {bad:?}");
        }
        assert!(ParameterDescriptor::new("_private9", ParameterOptions::new()).is_ok());
    }

    #[test]
    fn conflicting_options_surface_as_declaration_errors() {
        let opts = ParameterOptions {
            make_string: true,
            make_float: true,
            ..ParameterOptions::default()
        };
        let err = ParameterDescriptor::new("p", opts).unwrap_err();
        assert_eq!(err.key(), "p");
        assert_eq!(err.category(), "declaration");
    }
}
