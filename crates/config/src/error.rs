//! Configuration error types

use thiserror::Error;
use tunable_parameter::ParameterError;

/// Result alias for loader operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while normalizing or applying a source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The input cannot be interpreted as a source
    #[error("unsupported source ({origin}): {reason}")]
    UnsupportedSource {
        /// What was supplied, e.g. `number` or a path
        origin: String,
        /// Why it was rejected
        reason: String,
    },

    /// Reading a file or stream failed
    #[error("failed to read {origin}: {message}")]
    Read {
        /// Path or stream description
        origin: String,
        /// Underlying I/O error text
        message: String,
    },

    /// The document is not valid in its format
    #[error("failed to parse {origin}: {message}")]
    Parse {
        /// Path or stream description
        origin: String,
        /// Parser error text
        message: String,
    },

    /// The format was compiled out
    #[error("configuration format not supported: {format}")]
    FormatNotSupported {
        /// Format name
        format: String,
    },

    /// A write was rejected by the parameter pipeline
    #[error(transparent)]
    Parameter(#[from] ParameterError),
}

impl ConfigError {
    /// Create an unsupported source error
    pub fn unsupported_source(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedSource {
            origin: origin.into(),
            reason: reason.into(),
        }
    }

    /// Create a read error
    pub fn read_error(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Read {
            origin: origin.into(),
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse_error(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            origin: origin.into(),
            message: message.into(),
        }
    }

    /// Create a format not supported error
    pub fn format_not_supported(format: impl Into<String>) -> Self {
        Self::FormatNotSupported {
            format: format.into(),
        }
    }

    #[must_use]
    pub fn is_unsupported_source(&self) -> bool {
        matches!(self, Self::UnsupportedSource { .. })
    }

    /// The pipeline error behind a rejected write, if that is what failed.
    #[must_use]
    pub fn parameter_error(&self) -> Option<&ParameterError> {
        match self {
            Self::Parameter(e) => Some(e),
            _ => None,
        }
    }

    /// Broad error category for grouping in logs.
    #[must_use]
    pub fn category(&self) -> &str {
        match self {
            Self::UnsupportedSource { .. } => "source",
            Self::Read { .. } => "io",
            Self::Parse { .. } | Self::FormatNotSupported { .. } => "parse",
            Self::Parameter(e) => e.category(),
        }
    }

    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::UnsupportedSource { .. } => "CONFIG_UNSUPPORTED_SOURCE",
            Self::Read { .. } => "CONFIG_READ",
            Self::Parse { .. } => "CONFIG_PARSE",
            Self::FormatNotSupported { .. } => "CONFIG_FORMAT_NOT_SUPPORTED",
            Self::Parameter(e) => e.code(),
        }
    }

    /// Loading is deterministic; nothing here is worth retrying as-is.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        false
    }
}
