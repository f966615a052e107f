/// Error type for parameter operations.
///
/// Covers declaration problems, lookups, and the three ways a write can be
/// refused: the value is invalid, it falls outside its bounds, or the
/// parameter is locked.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParameterError {
    /// Null, empty, wrong type, missing capability, or a failed conversion.
    #[error("invalid value for `{key}`: {reason}")]
    InvalidValue { key: String, reason: String },

    /// The value violates a `min`/`max` bound or a range constraint.
    #[error("value for `{key}` out of range: {reason}")]
    OutOfRange { key: String, reason: String },

    /// Write attempted on a lockable parameter while the store is locked.
    #[error("parameter `{key}` is locked")]
    Locked { key: String },

    /// No parameter with the given name has been declared.
    #[error("parameter not found: `{key}`")]
    NotFound { key: String },

    /// The declaration itself is malformed (bad name or conflicting options).
    #[error("invalid declaration for `{key}`: {reason}")]
    InvalidDeclaration { key: String, reason: String },
}

impl ParameterError {
    pub(crate) fn invalid(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_owned(),
            reason: reason.into(),
        }
    }

    pub(crate) fn out_of_range(key: &str, reason: impl Into<String>) -> Self {
        Self::OutOfRange {
            key: key.to_owned(),
            reason: reason.into(),
        }
    }

    pub(crate) fn declaration(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidDeclaration {
            key: key.to_owned(),
            reason: reason.into(),
        }
    }

    /// Name of the parameter the error refers to.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::InvalidValue { key, .. }
            | Self::OutOfRange { key, .. }
            | Self::Locked { key }
            | Self::NotFound { key }
            | Self::InvalidDeclaration { key, .. } => key,
        }
    }

    /// Broad error category for grouping in logs.
    #[must_use]
    pub fn category(&self) -> &str {
        match self {
            Self::InvalidValue { .. } => "value",
            Self::OutOfRange { .. } => "range",
            Self::Locked { .. } => "lock",
            Self::NotFound { .. } => "lookup",
            Self::InvalidDeclaration { .. } => "declaration",
        }
    }

    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::InvalidValue { .. } => "PARAM_INVALID_VALUE",
            Self::OutOfRange { .. } => "PARAM_OUT_OF_RANGE",
            Self::Locked { .. } => "PARAM_LOCKED",
            Self::NotFound { .. } => "PARAM_NOT_FOUND",
            Self::InvalidDeclaration { .. } => "PARAM_INVALID_DECLARATION",
        }
    }

    /// Whether the operation might succeed if retried with the same input.
    ///
    /// Parameter errors are deterministic: same input, same result.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_variants() -> Vec<ParameterError> {
        vec![
            ParameterError::InvalidValue {
                key: String::new(),
                reason: String::new(),
            },
            ParameterError::OutOfRange {
                key: String::new(),
                reason: String::new(),
            },
            ParameterError::Locked { key: String::new() },
            ParameterError::NotFound { key: String::new() },
            ParameterError::InvalidDeclaration {
                key: String::new(),
                reason: String::new(),
            },
        ]
    }

    #[test]
    fn display_messages() {
        let err = ParameterError::invalid("host", "value must not be null");
        assert_eq!(
            err.to_string(),
            "invalid value for `host`: value must not be null"
        );

        let err = ParameterError::out_of_range("count", "9 is below minimum 10");
        assert_eq!(
            err.to_string(),
            "value for `count` out of range: 9 is below minimum 10"
        );

        let err = ParameterError::Locked { key: "port".into() };
        assert_eq!(err.to_string(), "parameter `port` is locked");

        let err = ParameterError::NotFound { key: "email".into() };
        assert_eq!(err.to_string(), "parameter not found: `email`");

        let err = ParameterError::declaration("bad name", "must be an identifier");
        assert_eq!(
            err.to_string(),
            "invalid declaration for `bad name`: must be an identifier"
        );
    }

    #[test]
    fn key_accessor() {
        assert_eq!(ParameterError::invalid("a", "x").key(), "a");
        assert_eq!(ParameterError::Locked { key: "b".into() }.key(), "b");
    }

    #[test]
    fn codes_are_unique_per_variant() {
        let errors = all_variants();
        let codes: Vec<&str> = errors.iter().map(ParameterError::code).collect();

        for code in &codes {
            assert!(code.starts_with("PARAM_"), "code should start with PARAM_: {code}");
        }

        let mut sorted = codes.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), codes.len(), "codes should be unique");
    }

    #[test]
    fn categories_are_distinct() {
        let errors = all_variants();
        let mut cats: Vec<&str> = errors.iter().map(ParameterError::category).collect();
        cats.sort_unstable();
        cats.dedup();
        assert_eq!(cats.len(), errors.len());
    }

    #[test]
    fn none_are_retryable() {
        for err in &all_variants() {
            assert!(!err.is_retryable(), "should not be retryable: {err:?}");
        }
    }
}
