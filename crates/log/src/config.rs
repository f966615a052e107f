//! Configuration types and presets

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Filter directives (e.g., "info", "debug,tunable_config=trace")
    pub level: String,

    /// Output format
    pub format: Format,

    /// Display configuration
    pub display: DisplayConfig,
}

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Human-readable, multi-line
    Pretty,
    /// Compact single-line output
    #[default]
    Compact,
    /// Structured JSON output
    Json,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format `{other}`")),
        }
    }
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show timestamps
    pub time: bool,
    /// Show source location (file:line)
    pub source: bool,
    /// Show target module
    pub target: bool,
    /// Show thread IDs
    pub thread_ids: bool,
    /// Show thread names
    pub thread_names: bool,
    /// Use ANSI colors
    pub colors: bool,
    /// Flatten JSON events
    pub flatten: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: Format::Compact,
            display: DisplayConfig::default(),
        }
    }
}

impl Config {
    /// Create configuration from environment variables
    ///
    /// Reads `TUNABLE_LOG` (falling back to `RUST_LOG`), `TUNABLE_LOG_FORMAT`,
    /// `TUNABLE_LOG_TIME`, `TUNABLE_LOG_SOURCE` and `TUNABLE_LOG_COLORS`.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Same as [`Config::from_env`] with a custom variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(level) = lookup("TUNABLE_LOG").or_else(|| lookup("RUST_LOG")) {
            config.level = level;
        }

        if let Some(format) = lookup("TUNABLE_LOG_FORMAT") {
            config.format = format.parse().unwrap_or_default();
        }

        config.display.apply_vars(&lookup);
        config
    }

    /// Development configuration (pretty, debug level)
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            format: Format::Pretty,
            display: DisplayConfig {
                colors: true,
                source: true,
                ..DisplayConfig::default()
            },
        }
    }

    /// Production configuration (JSON, info level)
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            format: Format::Json,
            display: DisplayConfig {
                colors: false,
                source: false,
                flatten: true,
                ..DisplayConfig::default()
            },
        }
    }

    /// Test configuration (everything, no decoration)
    pub fn test() -> Self {
        Self {
            level: "trace".to_string(),
            format: Format::Compact,
            display: DisplayConfig {
                colors: false,
                time: false,
                ..DisplayConfig::default()
            },
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            time: true,
            source: cfg!(debug_assertions),
            target: true,
            thread_ids: false,
            thread_names: false,
            colors: std::io::IsTerminal::is_terminal(&std::io::stderr()),
            flatten: true,
        }
    }
}

impl DisplayConfig {
    fn apply_vars(&mut self, lookup: &impl Fn(&str) -> Option<String>) {
        let flag = |v: String| v != "0" && v != "false";
        if let Some(v) = lookup("TUNABLE_LOG_TIME") {
            self.time = flag(v);
        }
        if let Some(v) = lookup("TUNABLE_LOG_SOURCE") {
            self.source = flag(v);
        }
        if let Some(v) = lookup("TUNABLE_LOG_COLORS") {
            self.colors = flag(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(Config::from_vars(vars(&[])), Config::default());
    }

    #[test]
    fn tunable_log_wins_over_rust_log() {
        let config = Config::from_vars(vars(&[("TUNABLE_LOG", "trace"), ("RUST_LOG", "warn")]));
        assert_eq!(config.level, "trace");

        let config = Config::from_vars(vars(&[("RUST_LOG", "warn")]));
        assert_eq!(config.level, "warn");
    }

    #[test]
    fn format_and_display_flags() {
        let config = Config::from_vars(vars(&[
            ("TUNABLE_LOG_FORMAT", "JSON"),
            ("TUNABLE_LOG_TIME", "0"),
            ("TUNABLE_LOG_COLORS", "false"),
            ("TUNABLE_LOG_SOURCE", "1"),
        ]));
        assert_eq!(config.format, Format::Json);
        assert!(!config.display.time);
        assert!(!config.display.colors);
        assert!(config.display.source);
    }

    #[test]
    fn unknown_format_falls_back_to_compact() {
        let config = Config::from_vars(vars(&[("TUNABLE_LOG_FORMAT", "logfmt")]));
        assert_eq!(config.format, Format::Compact);
    }

    #[test]
    fn presets() {
        assert_eq!(Config::development().format, Format::Pretty);
        assert_eq!(Config::production().format, Format::Json);
        assert!(!Config::production().display.colors);
        assert_eq!(Config::test().level, "trace");
        assert!(!Config::test().display.time);
    }

    #[test]
    fn deserializes_partial_config() {
        let config: Config =
            serde_json::from_str(r#"{"level": "debug", "format": "pretty"}"#).unwrap();
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, Format::Pretty);
    }
}
