//! Logger error types

/// Result type for logger operations
pub type LogResult<T> = Result<T, LogError>;

/// Error type for logger operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogError {
    /// The filter directives do not parse
    #[error("invalid filter `{filter}`: {message}")]
    Filter {
        /// Directives as given
        filter: String,
        /// Parser error text
        message: String,
    },

    /// Installing the global subscriber failed
    #[error("failed to install logger: {0}")]
    Init(String),
}
