//! # Tunable Log
//!
//! Logging bootstrap for tunable binaries and tests.
//!
//! ```rust
//! fn main() -> tunable_log::LogResult<()> {
//!     let _guard = tunable_log::auto_init()?;
//!     tunable_log::info!(sources = 2, "loading parameters");
//!     Ok(())
//! }
//! ```

mod builder;
mod config;
mod error;

pub use builder::{LoggerBuilder, LoggerGuard};
pub use config::{Config, DisplayConfig, Format};
pub use error::{LogError, LogResult};

/// Prelude for common imports
pub mod prelude {
    pub use crate::{Config, Format, LogResult, auto_init, init, init_with};
    pub use crate::{debug, error, info, trace, warn};
}

pub use tracing::{debug, error, info, trace, warn};

/// Pick a configuration from the environment and build type.
///
/// `TUNABLE_LOG` or `RUST_LOG` being set selects [`Config::from_env`];
/// otherwise debug builds get [`Config::development`] and release builds
/// [`Config::production`].
pub fn auto_init() -> LogResult<LoggerGuard> {
    if std::env::var_os("TUNABLE_LOG").is_some() || std::env::var_os("RUST_LOG").is_some() {
        init_with(Config::from_env())
    } else if cfg!(debug_assertions) {
        init_with(Config::development())
    } else {
        init_with(Config::production())
    }
}

/// Initialize with default configuration
pub fn init() -> LogResult<LoggerGuard> {
    init_with(Config::default())
}

/// Initialize with custom configuration
pub fn init_with(config: Config) -> LogResult<LoggerGuard> {
    LoggerBuilder::from_config(config).build()
}

/// Initialize for tests; safe to call from every test.
pub fn init_test() -> LogResult<LoggerGuard> {
    init_with(Config::test())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_test_is_idempotent() {
        let _first = init_test().unwrap();
        let second = init_test().unwrap();
        assert!(!second.is_installed());
        info!("still logging");
    }
}
