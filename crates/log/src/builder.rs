//! Logger builder implementation

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::config::{Config, Format};
use crate::error::{LogError, LogResult};

/// Logger builder
#[derive(Debug, Clone)]
pub struct LoggerBuilder {
    config: Config,
}

/// Guard returned by initialization.
///
/// A noop guard means another subscriber was already installed.
#[derive(Debug)]
#[must_use]
pub struct LoggerGuard {
    installed: bool,
}

impl LoggerGuard {
    /// Guard for a call that installed nothing.
    pub fn noop() -> Self {
        Self { installed: false }
    }

    /// Whether this call installed the global subscriber.
    pub fn is_installed(&self) -> bool {
        self.installed
    }
}

impl LoggerBuilder {
    /// Create builder from config
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse the filter directives.
    pub fn filter(&self) -> LogResult<EnvFilter> {
        EnvFilter::try_new(&self.config.level).map_err(|e| LogError::Filter {
            filter: self.config.level.clone(),
            message: e.to_string(),
        })
    }

    /// Build and install the global subscriber.
    ///
    /// Returns a noop guard if a global subscriber is already set.
    pub fn build(self) -> LogResult<LoggerGuard> {
        let filter = self.filter()?;

        if tracing::dispatcher::has_been_set() {
            return Ok(LoggerGuard::noop());
        }

        Registry::default()
            .with(self.fmt_layer())
            .with(filter)
            .try_init()
            .map_err(|e| LogError::Init(e.to_string()))?;

        tracing::debug!(level = %self.config.level, format = ?self.config.format, "logger installed");
        Ok(LoggerGuard { installed: true })
    }

    fn fmt_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let display = &self.config.display;
        let base = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(display.colors)
            .with_target(display.target)
            .with_file(display.source)
            .with_line_number(display.source)
            .with_thread_ids(display.thread_ids)
            .with_thread_names(display.thread_names);

        match (self.config.format, display.time) {
            (Format::Pretty, true) => base.pretty().boxed(),
            (Format::Pretty, false) => base.pretty().without_time().boxed(),
            (Format::Compact, true) => base.compact().boxed(),
            (Format::Compact, false) => base.compact().without_time().boxed(),
            (Format::Json, true) => base.json().flatten_event(display.flatten).boxed(),
            (Format::Json, false) => base
                .json()
                .flatten_event(display.flatten)
                .without_time()
                .boxed(),
        }
    }
}
