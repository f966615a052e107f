use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use serde_json::{Map, Value};
use tunable_config::{ConfigFormat, Configure, LoadOptions, Source, parse_document};
use tunable_parameter::{ParameterOptions, Parameters};

use crate::cli::{Command, NamesArgs, OutputFormat, ResolveArgs};

pub fn run(command: Command) -> Result<String> {
    match command {
        Command::Resolve(args) => resolve(args),
        Command::Names(args) => names(args),
    }
}

fn resolve(args: ResolveArgs) -> Result<String> {
    let mut params = load_schema(&args.schema.schema)?;

    let mut sources: Vec<Source> = args.sources.into_iter().map(Source::from).collect();
    if !args.overrides.is_empty() {
        sources.push(Source::Map(parse_overrides(&args.overrides)?));
    }

    let mut options = LoadOptions::new();
    if let Some(dir) = args.base_dir {
        options = options.with_base_dir(dir);
    }

    tracing::debug!(sources = sources.len(), "applying sources");
    params
        .apply_source_with(Source::List(sources), &options)
        .context("failed to load sources")?;

    render(&Value::Object(params.values()), args.format)
}

fn names(args: NamesArgs) -> Result<String> {
    let params = load_schema(&args.schema.schema)?;
    let lines: Vec<String> = params
        .param_names()
        .into_iter()
        .map(|name| match params.descriptor(&name) {
            Some(d) if args.describe => match d.description() {
                Some(text) => format!("{name}\t{text}"),
                None => name,
            },
            _ => name,
        })
        .collect();
    Ok(lines.join("\n"))
}

/// Declare every entry of a schema file on a fresh instance.
fn load_schema(path: &Path) -> Result<Parameters> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("cannot read schema {}", path.display()))?;
    let origin = path.display().to_string();
    let document = parse_document(&content, ConfigFormat::from_path(path), &origin)?;
    let Value::Object(entries) = document else {
        bail!("schema {origin} must map parameter names to options");
    };

    let mut params = Parameters::new();
    for (name, options) in entries {
        let options = ParameterOptions::from_json(&name, options)?;
        params.param(name, options)?;
    }
    tracing::debug!(schema = %origin, declared = params.param_names().len(), "schema loaded");
    Ok(params)
}

fn parse_overrides(overrides: &[String]) -> Result<Map<String, Value>> {
    overrides
        .iter()
        .map(|raw| {
            let (name, value) = raw
                .split_once('=')
                .ok_or_else(|| anyhow!("override `{raw}` is not NAME=VALUE"))?;
            // Bare words stay strings; numbers, booleans and lists are typed.
            let value = serde_yaml::from_str::<Value>(value)
                .unwrap_or_else(|_| Value::String(value.to_owned()));
            Ok((name.trim().to_owned(), value))
        })
        .collect()
}

fn render(values: &Value, format: OutputFormat) -> Result<String> {
    let text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(values)?,
        OutputFormat::Yaml => serde_yaml::to_string(values)?,
        OutputFormat::Toml => toml::to_string_pretty(&without_nulls(values))
            .context("values cannot be written as TOML")?,
    };
    Ok(text.trim_end().to_owned())
}

/// TOML has no null; unset entries are left out of the table.
fn without_nulls(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), without_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(without_nulls).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn overrides_are_typed() {
        let map = parse_overrides(&["a=1".into(), "b=true".into(), "c=hello".into()]).unwrap();
        assert_eq!(Value::Object(map), json!({"a": 1, "b": true, "c": "hello"}));
    }

    #[test]
    fn override_without_equals_is_an_error() {
        assert!(parse_overrides(&["nope".into()]).is_err());
    }

    #[test]
    fn render_formats() {
        let values = json!({"a": 1});
        assert_eq!(render(&values, OutputFormat::Json).unwrap(), "{\n  \"a\": 1\n}");
        assert_eq!(render(&values, OutputFormat::Yaml).unwrap(), "a: 1");
        assert_eq!(render(&values, OutputFormat::Toml).unwrap(), "a = 1");
    }

    #[test]
    fn toml_leaves_out_unset_values() {
        let values = json!({"host": "x", "tags": null, "db": {"user": null, "port": 5}});
        let toml = render(&values, OutputFormat::Toml).unwrap();
        assert!(toml.starts_with("host = \"x\""));
        assert!(toml.contains("[db]\nport = 5"));
        assert!(!toml.contains("tags") && !toml.contains("user"));
        assert_eq!(
            render(&values, OutputFormat::Json).unwrap(),
            serde_json::to_string_pretty(&values).unwrap()
        );
    }
}
