//! Structured-text parsing into JSON values.

use serde_json::Value;

use crate::error::{ConfigError, ConfigResult};
use crate::source::ConfigFormat;

/// Parse `content` as `format`. `origin` names the input in errors.
pub fn parse_document(content: &str, format: ConfigFormat, origin: &str) -> ConfigResult<Value> {
    match format {
        ConfigFormat::Json => serde_json::from_str(content)
            .map_err(|e| ConfigError::parse_error(origin, format!("JSON parse error: {e}"))),
        ConfigFormat::Yaml => parse_yaml(content, origin),
        ConfigFormat::Toml => parse_toml(content, origin),
    }
}

#[cfg(feature = "yaml")]
fn parse_yaml(content: &str, origin: &str) -> ConfigResult<Value> {
    // An empty document has no pairs.
    if content.trim().is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    serde_yaml::from_str::<Value>(content)
        .map_err(|e| ConfigError::parse_error(origin, format!("YAML parse error: {e}")))
}

#[cfg(not(feature = "yaml"))]
fn parse_yaml(_content: &str, _origin: &str) -> ConfigResult<Value> {
    Err(ConfigError::format_not_supported(ConfigFormat::Yaml.to_string()))
}

#[cfg(feature = "toml")]
fn parse_toml(content: &str, origin: &str) -> ConfigResult<Value> {
    toml::from_str::<Value>(content)
        .map_err(|e| ConfigError::parse_error(origin, format!("TOML parse error: {e}")))
}

#[cfg(not(feature = "toml"))]
fn parse_toml(_content: &str, _origin: &str) -> ConfigResult<Value> {
    Err(ConfigError::format_not_supported(ConfigFormat::Toml.to_string()))
}
